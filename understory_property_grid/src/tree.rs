// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorized property tree.
//!
//! The tree has a fixed shape: a root, category nodes below it, and property
//! leaves below the categories. Category nodes are transient: the tree
//! synthesizes them on first use and they are not host-visible properties.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Hiding categories
//! does not restructure the arena; it only changes how the visible-tree
//! queries ([`PropertyTree::child_count`], [`PropertyTree::child`],
//! [`PropertyTree::row_of`], [`PropertyTree::visible_parent`]) traverse it,
//! splicing each category's children into the root's sequence.
//!
//! Each node carries two columns of role-keyed display data plus
//! [`ItemFlags`]. A role can be absent, set, or explicitly cleared; an absent
//! display role falls back to the edit value, a cleared one does not.

use std::borrow::Cow;

use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_property::{Color, Font, Value};

use crate::context::PropertyContext;
use crate::editor::{PreviewGlyph, format_value};

/// Identifier for a node in a [`PropertyTree`].
///
/// A slot index plus the tree's clear generation. Clearing the tree bumps
/// the generation, so ids handed out before a clear never alias nodes created
/// after it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: usize, generation: u32) -> Self {
        #[expect(clippy::cast_possible_truncation, reason = "node counts stay far below u32::MAX")]
        let idx = idx as u32;
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The invisible root.
    Root,
    /// A transient category grouping.
    Category,
    /// A host-declared property.
    Property,
}

/// One of the two display columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// Property or category name.
    Name,
    /// Property value.
    Value,
}

impl Column {
    /// Both columns, in display order.
    pub const ALL: [Self; 2] = [Self::Name, Self::Value];

    const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Value => 1,
        }
    }
}

/// Display roles a column can carry data for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Text shown in the cell.
    Display,
    /// Raw value being edited.
    Edit,
    /// Preview glyph shown beside the text.
    Decoration,
    /// Font override.
    Font,
    /// Background color.
    Background,
    /// Text color.
    Foreground,
}

/// Data stored under a [`Role`].
#[derive(Clone, Debug, PartialEq)]
pub enum ItemData {
    /// Text.
    Text(String),
    /// A raw value.
    Value(Value),
    /// A preview glyph.
    Glyph(PreviewGlyph),
    /// A font.
    Font(Font),
    /// A color.
    Color(Color),
}

impl ItemData {
    /// Returns the text, if this is [`ItemData::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Per-column interaction flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The cell can be selected.
        const SELECTABLE = 0b0000_0001;
        /// The cell is enabled.
        const ENABLED    = 0b0000_0010;
        /// The cell can be edited.
        const EDITABLE   = 0b0000_0100;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::SELECTABLE | Self::ENABLED
    }
}

/// Role data sorted by role; `None` marks an explicitly cleared role.
#[derive(Clone, Debug, Default)]
struct ColumnData {
    roles: SmallVec<[(Role, Option<ItemData>); 4]>,
    flags: ItemFlags,
}

impl ColumnData {
    fn entry(&self, role: Role) -> Option<&Option<ItemData>> {
        self.roles
            .binary_search_by_key(&role, |(r, _)| *r)
            .ok()
            .map(|i| &self.roles[i].1)
    }

    fn put(&mut self, role: Role, data: Option<ItemData>) {
        match self.roles.binary_search_by_key(&role, |(r, _)| *r) {
            Ok(i) => self.roles[i].1 = data,
            Err(i) => self.roles.insert(i, (role, data)),
        }
    }

    fn remove(&mut self, role: Role) {
        if let Ok(i) = self.roles.binary_search_by_key(&role, |(r, _)| *r) {
            self.roles.remove(i);
        }
    }
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    columns: [ColumnData; 2],
    context: Option<PropertyContext>,
}

impl Node {
    fn new(kind: NodeKind, name: String, parent: Option<usize>) -> Self {
        Self {
            kind,
            name,
            parent,
            children: Vec::new(),
            columns: [ColumnData::default(), ColumnData::default()],
            context: None,
        }
    }
}

/// Result of [`PropertyTree::add_property`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    /// The new property node.
    pub node: NodeId,
    /// The category node it was placed under.
    pub category: NodeId,
    /// Whether the category was created by this insertion.
    pub new_category: bool,
    /// Row of the property within its category.
    pub row: usize,
}

/// Arena-backed, categorized property tree with name and category indexes.
///
/// # Example
///
/// ```rust
/// use understory_property::{Category, Property, Value, ValueType};
/// use understory_property_grid::{PropertyContext, PropertyTree};
///
/// let mut tree = PropertyTree::new("Misc");
/// let property = Property::new("count", ValueType::Int).with_attribute(Category::new("General"));
/// let inserted = tree
///     .add_property(PropertyContext::new(property, Value::Int(5)))
///     .unwrap();
///
/// assert_eq!(tree.child_count(tree.root()), 1);
/// assert_eq!(tree.name(inserted.category), Some("General"));
///
/// tree.set_show_categories(false);
/// assert_eq!(tree.child(tree.root(), 0), Some(inserted.node));
/// ```
#[derive(Debug)]
pub struct PropertyTree {
    nodes: Vec<Node>,
    generation: u32,
    by_name: HashMap<String, usize>,
    categories: HashMap<String, usize>,
    default_category: String,
    show_categories: bool,
}

impl PropertyTree {
    const ROOT: usize = 0;

    /// Creates an empty tree placing uncategorized properties under `default_category`.
    #[must_use]
    pub fn new(default_category: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, String::new(), None)],
            generation: 1,
            by_name: HashMap::new(),
            categories: HashMap::new(),
            default_category: default_category.into(),
            show_categories: true,
        }
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.id(Self::ROOT)
    }

    /// Returns the category used for properties without a
    /// [`Category`](understory_property::Category).
    #[must_use]
    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Returns whether category nodes are shown.
    #[must_use]
    pub fn show_categories(&self) -> bool {
        self.show_categories
    }

    /// Shows or hides category nodes. The arena is not touched.
    pub fn set_show_categories(&mut self, show: bool) {
        self.show_categories = show;
    }

    /// Returns the number of property nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if the tree holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Returns the number of category nodes.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Empties the tree and both indexes.
    ///
    /// Ids handed out before the clear stop being alive.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT].children.clear();
        self.by_name.clear();
        self.categories.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns `true` if `node` refers to a node of the current generation.
    #[must_use]
    pub fn is_alive(&self, node: NodeId) -> bool {
        node.1 == self.generation && node.idx() < self.nodes.len()
    }

    /// Inserts a property leaf under its category, creating the category on
    /// first use.
    ///
    /// Returns `None`, leaving the tree unchanged, if the name is empty or
    /// already present. The value column is editable iff the property is not
    /// read-only.
    pub fn add_property(&mut self, context: PropertyContext) -> Option<Insertion> {
        let name = context.property().name();
        if name.is_empty() || self.by_name.contains_key(name) {
            return None;
        }
        let category_name = context
            .property()
            .category()
            .unwrap_or(self.default_category.as_str())
            .to_owned();
        let new_category = !self.categories.contains_key(&category_name);
        let category = self.category_node(&category_name);

        let name = context.property().name().to_owned();
        let read_only = context.property().is_read_only();
        let idx = self.nodes.len();
        let mut node = Node::new(NodeKind::Property, name.clone(), Some(category.idx()));
        if !read_only {
            node.columns[Column::Value.index()].flags |= ItemFlags::EDITABLE;
        }
        node.context = Some(context);
        self.nodes.push(node);

        let siblings = &mut self.nodes[category.idx()].children;
        siblings.push(idx);
        let row = siblings.len() - 1;
        self.by_name.insert(name, idx);

        Some(Insertion {
            node: self.id(idx),
            category,
            new_category,
            row,
        })
    }

    /// Returns the category node called `name`, creating it if needed.
    ///
    /// This is a side-effecting lookup; use [`PropertyTree::find_category`]
    /// for a pure query.
    pub fn category_node(&mut self, name: &str) -> NodeId {
        if let Some(&idx) = self.categories.get(name) {
            return self.id(idx);
        }
        let idx = self.nodes.len();
        self.nodes
            .push(Node::new(NodeKind::Category, name.to_owned(), Some(Self::ROOT)));
        self.nodes[Self::ROOT].children.push(idx);
        self.categories.insert(name.to_owned(), idx);
        tracing::debug!(category = name, "created category node");
        self.id(idx)
    }

    /// Returns the category node called `name`, if it exists.
    #[must_use]
    pub fn find_category(&self, name: &str) -> Option<NodeId> {
        self.categories.get(name).map(|&idx| self.id(idx))
    }

    /// Returns the property node called `name`.
    #[must_use]
    pub fn property_node(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).map(|&idx| self.id(idx))
    }

    /// Returns the context of a property node.
    #[must_use]
    pub fn context(&self, node: NodeId) -> Option<&PropertyContext> {
        self.node(node)?.context.as_ref()
    }

    /// Returns the context of a property node mutably.
    pub(crate) fn context_mut(&mut self, node: NodeId) -> Option<&mut PropertyContext> {
        self.node_mut(node)?.context.as_mut()
    }

    /// Returns the node kind.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    /// Returns `true` for category nodes.
    #[must_use]
    pub fn is_category(&self, node: NodeId) -> bool {
        self.kind(node) == Some(NodeKind::Category)
    }

    /// Returns the property or category name.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node)
            .filter(|n| n.kind != NodeKind::Root)
            .map(|n| n.name.as_str())
    }

    /// Returns the structural parent: the category for a property, the root
    /// for a category.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent.map(|idx| self.id(idx))
    }

    /// Iterates categories in creation order.
    pub fn categories(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[Self::ROOT]
            .children
            .iter()
            .map(|&idx| self.id(idx))
    }

    /// Iterates property nodes in tree order: categories in creation order,
    /// properties in insertion order within each.
    pub fn properties(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[Self::ROOT]
            .children
            .iter()
            .flat_map(|&cat| self.nodes[cat].children.iter())
            .map(|&idx| self.id(idx))
    }

    /// Returns role data for a cell.
    ///
    /// Display on the value column falls back to the text of the edit value
    /// when it was never set; display on the name column falls back to the
    /// node name.
    #[must_use]
    pub fn data(&self, node: NodeId, column: Column, role: Role) -> Option<Cow<'_, ItemData>> {
        let n = self.node(node)?;
        let col = &n.columns[column.index()];
        match col.entry(role) {
            Some(Some(data)) => Some(Cow::Borrowed(data)),
            Some(None) => None,
            None if role == Role::Display => match column {
                Column::Name if n.kind != NodeKind::Root => {
                    Some(Cow::Owned(ItemData::Text(n.name.clone())))
                }
                Column::Name => None,
                Column::Value => match col.entry(Role::Edit) {
                    Some(Some(ItemData::Value(value))) => {
                        Some(Cow::Owned(ItemData::Text(format_value(value))))
                    }
                    Some(Some(other)) => Some(Cow::Borrowed(other)),
                    _ => None,
                },
            },
            None => None,
        }
    }

    /// Returns the display text of a cell, or `""`.
    #[must_use]
    pub fn display_text(&self, node: NodeId, column: Column) -> String {
        match self.data(node, column, Role::Display) {
            Some(data) => data.as_text().unwrap_or_default().to_owned(),
            None => String::new(),
        }
    }

    /// Sets role data for a cell.
    pub fn set_data(&mut self, node: NodeId, column: Column, role: Role, data: ItemData) {
        if let Some(n) = self.node_mut(node) {
            n.columns[column.index()].put(role, Some(data));
        }
    }

    /// Sets role data on both columns.
    pub fn set_data_all_columns(&mut self, node: NodeId, role: Role, data: &ItemData) {
        for column in Column::ALL {
            self.set_data(node, column, role, data.clone());
        }
    }

    /// Marks a role as explicitly cleared; reads return `None` with no fallback.
    pub fn clear_data(&mut self, node: NodeId, column: Column, role: Role) {
        if let Some(n) = self.node_mut(node) {
            n.columns[column.index()].put(role, None);
        }
    }

    /// Forgets a role entirely so reads fall back again.
    pub fn unset_data(&mut self, node: NodeId, column: Column, role: Role) {
        if let Some(n) = self.node_mut(node) {
            n.columns[column.index()].remove(role);
        }
    }

    /// Returns a cell's flags; unknown nodes have none.
    #[must_use]
    pub fn flags(&self, node: NodeId, column: Column) -> ItemFlags {
        self.node(node)
            .map_or(ItemFlags::empty(), |n| n.columns[column.index()].flags)
    }

    /// Replaces a cell's flags.
    pub fn set_flags(&mut self, node: NodeId, column: Column, flags: ItemFlags) {
        if let Some(n) = self.node_mut(node) {
            n.columns[column.index()].flags = flags;
        }
    }

    /// Returns the number of visible children of `parent`.
    ///
    /// With categories hidden, the root's visible children are every
    /// category's properties and categories themselves have none.
    #[must_use]
    pub fn child_count(&self, parent: NodeId) -> usize {
        let Some(n) = self.node(parent) else {
            return 0;
        };
        match (n.kind, self.show_categories) {
            (NodeKind::Root, true) => n.children.len(),
            (NodeKind::Root, false) => n
                .children
                .iter()
                .map(|&cat| self.nodes[cat].children.len())
                .sum(),
            (NodeKind::Category, true) => n.children.len(),
            (NodeKind::Category, false) | (NodeKind::Property, _) => 0,
        }
    }

    /// Returns the visible child of `parent` at `row`.
    #[must_use]
    pub fn child(&self, parent: NodeId, row: usize) -> Option<NodeId> {
        let n = self.node(parent)?;
        let idx = match (n.kind, self.show_categories) {
            (NodeKind::Root, false) => n
                .children
                .iter()
                .flat_map(|&cat| self.nodes[cat].children.iter().copied())
                .nth(row)?,
            (NodeKind::Root | NodeKind::Category, true) => *n.children.get(row)?,
            _ => return None,
        };
        Some(self.id(idx))
    }

    /// Returns the visible parent of `node`, or `None` for the root and for
    /// hidden categories.
    #[must_use]
    pub fn visible_parent(&self, node: NodeId) -> Option<NodeId> {
        let n = self.node(node)?;
        match (n.kind, self.show_categories) {
            (NodeKind::Root, _) | (NodeKind::Category, false) => None,
            (NodeKind::Property, false) => Some(self.root()),
            _ => n.parent.map(|idx| self.id(idx)),
        }
    }

    /// Returns the row of `node` among its visible parent's children.
    #[must_use]
    pub fn row_of(&self, node: NodeId) -> Option<usize> {
        let parent = self.visible_parent(node)?;
        if self.show_categories {
            let siblings = &self.nodes[parent.idx()].children;
            siblings.iter().position(|&idx| idx == node.idx())
        } else {
            self.nodes[Self::ROOT]
                .children
                .iter()
                .flat_map(|&cat| self.nodes[cat].children.iter())
                .position(|&idx| idx == node.idx())
        }
    }

    /// Returns every visible node in depth-first display order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_visible(self.root(), &mut out);
        out
    }

    fn collect_visible(&self, parent: NodeId, out: &mut Vec<NodeId>) {
        for row in 0..self.child_count(parent) {
            if let Some(child) = self.child(parent, row) {
                out.push(child);
                self.collect_visible(child, out);
            }
        }
    }

    fn id(&self, idx: usize) -> NodeId {
        NodeId::new(idx, self.generation)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        if id.1 != self.generation {
            return None;
        }
        self.nodes.get(id.idx())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.1 != self.generation {
            return None;
        }
        self.nodes.get_mut(id.idx())
    }
}
