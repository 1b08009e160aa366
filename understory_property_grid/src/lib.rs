// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property Grid: a headless, categorized property editor.
//!
//! This crate turns [`understory_property`] descriptors into an editable
//! two-column (name / value) tree without committing to any widget toolkit.
//! A renderer reads the tree's role data and flags; edits come back as text,
//! modal picks or programmatic values.
//!
//! ## Core Concepts
//!
//! - [`PropertyGrid`]: the aggregate. Owns the tree, the editors and the change
//!   subscribers. Property names are unique; every value change runs through
//!   one path that refreshes the cached display before notifying.
//! - [`PropertyTree`]: an arena of root, category and property nodes. Category
//!   nodes are created on first use and can be hidden, flattening the visible
//!   tree without touching the underlying structure.
//! - [`PropertyContext`]: a property bound to its current value, an optional
//!   source object and a weak back-reference to its grid.
//! - [`PropertyEditor`]: a strategy that renders, parses and advises on editing
//!   a value. The [`EditorRegistry`] resolves the first editor that claims a
//!   context, falling back to [`DefaultEditor`].
//! - [`ObjectPropertyGrid`]: mirrors one or more [`Inspectable`] objects,
//!   showing only their common members and writing edits back to all of them.
//!
//! [`Inspectable`]: understory_property::Inspectable
//!
//! ## Example
//!
//! ```rust
//! use understory_property::{Category, Color, Property, ReadOnly, Value, ValueType};
//! use understory_property_grid::{Column, EditStyle, PropertyGrid};
//!
//! let mut grid = PropertyGrid::new();
//! grid.add_property(
//!     Property::new("tint", ValueType::Color).with_attribute(Category::new("Look")),
//!     Value::Color(Color::rgb(255, 0, 0)),
//! );
//! grid.add_property(
//!     Property::new("id", ValueType::Int).with_attribute(ReadOnly(true)),
//!     Value::Int(42),
//! );
//!
//! assert_eq!(grid.display_text("tint"), "255, 0, 0, (255)");
//! assert_eq!(grid.edit_style("tint"), EditStyle::Modal);
//!
//! // Text edits are parsed by the resolved editor.
//! grid.commit_text("tint", "0, 0, 255").unwrap();
//! assert_eq!(grid.property_context("tint").value(), &Value::Color(Color::BLUE));
//!
//! // Read-only properties refuse edits.
//! assert!(grid.commit_text("id", "7").is_err());
//!
//! // Hiding categories flattens the visible tree.
//! let root = grid.tree().root();
//! assert_eq!(grid.tree().child_count(root), 2);
//! grid.set_show_categories(false);
//! assert_eq!(grid.tree().child_count(root), 2);
//! assert_eq!(grid.header_text(Column::Name), "Name");
//! ```

mod config;
mod context;
mod editor;
mod editors;
mod error;
mod grid;
mod object_grid;
mod tree;

pub use config::{GridConfig, GridConfigBuilder};
pub use context::{GridId, PropertyContext, ValueChangedSlot};
pub use editor::{
    DefaultEditor, DropDown, EditStyle, EditorRegistry, ModalPicker, ParseError, PreviewGlyph,
    PropertyEditor,
};
pub use editors::{
    BoolEditor, ColorEditor, CursorEditor, FONT_SAMPLE, FontEditor, ImagesEditor, RectEditor,
    SizeEditor,
};
pub use error::{EditError, SetValueError, WriteBackError};
pub use grid::{PropertyChangedCallback, PropertyGrid, SubscriptionId};
pub use object_grid::{
    MergedMember, ObjectHandle, ObjectPropertyGrid, WriteBackFailure, merge_members,
};
pub use tree::{Column, Insertion, ItemData, ItemFlags, NodeId, NodeKind, PropertyTree, Role};
