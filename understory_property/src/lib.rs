// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property: typed property descriptors for inspectors.
//!
//! This crate provides the data model behind a property grid: what a property
//! *is*, independent of any widget that edits it.
//!
//! ## Core Concepts
//!
//! ### Values
//!
//! [`Value`] is a closed sum over every type a property can declare (numbers,
//! text, dates, geometry, fonts, colors, images, cursors, ...) plus
//! [`Value::Invalid`], the "no value" sentinel used when a value is unknown or
//! differs across a multi-object selection. [`ValueType`] is the matching type
//! tag, and [`Value::convert`] defines which values are acceptable for a
//! property whose declared type differs from the value's own.
//!
//! ### Properties and attributes
//!
//! A [`Property`] is a name, a [`ValueType`] and a bag of attributes keyed by
//! kind. Built-in kinds are [`Description`], [`DefaultValue`], [`Category`] and
//! [`ReadOnly`]; hosts add their own by implementing the [`Attribute`] marker.
//! Reading an absent attribute yields its default, so
//! [`Property::has_attribute`] is the presence test.
//!
//! The [`AttributeRegistry`] is the only process-wide state: it learns how to
//! copy each attribute kind the first time that kind is attached, which is what
//! lets [`Property`] implement [`Clone`].
//!
//! ### Reflection
//!
//! [`Inspectable`] is the explicit capability a host type implements so that a
//! grid can enumerate its members ([`MemberInfo`]), read them and write them.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_property::{Category, Description, Property, ReadOnly, Value, ValueType};
//!
//! let count = Property::new("count", ValueType::Int)
//!     .with_attribute(Category::new("General"))
//!     .with_attribute(Description::new("How many"));
//!
//! assert_eq!(count.category(), Some("General"));
//! assert!(!count.is_read_only());
//!
//! // A string can be stored into an int property if it parses.
//! assert_eq!(
//!     Value::from("7").convert(count.value_type()),
//!     Some(Value::Int(7))
//! );
//!
//! // Clones are deep.
//! let frozen = count.clone().with_attribute(ReadOnly(true));
//! assert!(frozen.is_read_only());
//! assert!(!count.is_read_only());
//! ```

mod attribute;
mod object;
mod property;
mod types;
mod value;

pub use attribute::{
    Attribute, AttributeRegistry, BoxedAttribute, Category, DefaultValue, Description, ReadOnly,
};
pub use object::{Inspectable, MemberError, MemberInfo};
pub use property::Property;
pub use types::{
    BitArray, Color, CursorShape, FloatRect, Font, FontSize, FontStyle, Image, ImageKind, IntRect,
    IntSize, Url,
};
pub use value::{DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT, Value, ValueType};

// Re-exported so hosts can name the payload types without a direct dependency.
pub use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
pub use kurbo;
