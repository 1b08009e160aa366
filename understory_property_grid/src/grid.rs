// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property grid aggregate.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use kurbo::Size;
use understory_property::{Property, Value, ValueType};

use crate::config::GridConfig;
use crate::context::{GridId, PropertyContext, ValueChangedSlot};
use crate::editor::{DropDown, EditStyle, EditorRegistry, ModalPicker, PreviewGlyph, PropertyEditor};
use crate::error::{EditError, SetValueError};
use crate::tree::{Column, ItemData, ItemFlags, NodeId, PropertyTree, Role};

/// Callback receiving the full context after a property value changed.
pub type PropertyChangedCallback = Box<dyn FnMut(&PropertyContext)>;

/// Handle returned by [`PropertyGrid::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A headless property grid.
///
/// Holds named, typed properties in a categorized [`PropertyTree`], keeps each
/// value's display text and decoration in sync through the resolved
/// [`PropertyEditor`], and notifies subscribers when a value actually changes.
///
/// Property names are unique within a grid. Insertions with an empty or
/// already-used name are ignored.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_property::{Category, Property, Value, ValueType};
/// use understory_property_grid::PropertyGrid;
///
/// let mut grid = PropertyGrid::new();
/// grid.add_property(
///     Property::new("count", ValueType::Int).with_attribute(Category::new("General")),
///     Value::Int(5),
/// );
/// assert_eq!(grid.display_text("count"), "5");
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// grid.subscribe(move |ctx| sink.borrow_mut().push(ctx.value().clone()));
///
/// grid.set_property_value("count", Value::Int(7)).unwrap();
/// grid.set_property_value("count", Value::Int(7)).unwrap();
/// assert_eq!(*seen.borrow(), vec![Value::Int(7)]);
/// ```
pub struct PropertyGrid {
    id: Rc<GridId>,
    config: GridConfig,
    tree: PropertyTree,
    editors: EditorRegistry,
    subscribers: Vec<(SubscriptionId, PropertyChangedCallback)>,
    next_subscription: u64,
    invalid: PropertyContext,
}

impl PropertyGrid {
    /// Creates a grid with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Creates a grid with `config`.
    #[must_use]
    pub fn with_config(config: GridConfig) -> Self {
        let mut tree = PropertyTree::new(config.default_category());
        tree.set_show_categories(config.show_categories());
        let editors = if config.builtin_editors() {
            EditorRegistry::with_builtin_editors()
        } else {
            EditorRegistry::new()
        };
        Self {
            id: Rc::new(GridId::next()),
            config,
            tree,
            editors,
            subscribers: Vec::new(),
            next_subscription: 0,
            invalid: PropertyContext::invalid(),
        }
    }

    /// Returns this grid's identity, as reported by its contexts.
    #[must_use]
    pub fn id(&self) -> GridId {
        *self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the underlying tree.
    #[must_use]
    pub fn tree(&self) -> &PropertyTree {
        &self.tree
    }

    // --- Properties ---

    /// Adds a property with its initial value.
    ///
    /// Returns `false`, leaving the grid unchanged, if the name is empty or
    /// already present.
    pub fn add_property(&mut self, property: Property, value: Value) -> bool {
        self.insert(property, value, None)
    }

    /// Adds a property bound to a source object, readable back through
    /// [`PropertyContext::object`].
    pub fn add_property_with_object(
        &mut self,
        property: Property,
        value: Value,
        object: Rc<dyn Any>,
    ) -> bool {
        self.insert(property, value, Some(object))
    }

    /// Adds a property whose type is inferred from `value`.
    ///
    /// An invalid value cannot be typed; the property is still added, with
    /// [`ValueType::Unknown`].
    pub fn add_value(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        let value_type = value.value_type();
        if value_type == ValueType::Unknown {
            tracing::warn!(property = %name, "cannot infer a type from an invalid value");
        }
        self.insert(Property::new(name, value_type), value, None)
    }

    fn insert(&mut self, property: Property, value: Value, object: Option<Rc<dyn Any>>) -> bool {
        if property.name().is_empty() {
            tracing::warn!("ignoring property with an empty name");
            return false;
        }
        if self.tree.property_node(property.name()).is_some() {
            tracing::warn!(property = property.name(), "property already exists");
            return false;
        }
        let read_only = property.is_read_only();
        tracing::debug!(
            property = property.name(),
            value_type = %property.value_type(),
            read_only,
            "adding property"
        );

        let context = PropertyContext::attached(property, value.clone(), object, &self.id);
        let Some(inserted) = self.tree.add_property(context) else {
            return false;
        };

        if inserted.new_category {
            let font = ItemData::Font(self.config.category_font().clone());
            let background = ItemData::Color(self.config.category_background());
            self.tree.set_data_all_columns(inserted.category, Role::Font, &font);
            self.tree
                .set_data_all_columns(inserted.category, Role::Background, &background);
        }
        if read_only {
            let foreground = ItemData::Color(self.config.read_only_foreground());
            self.tree
                .set_data_all_columns(inserted.node, Role::Foreground, &foreground);
        }

        self.update_value(inserted.node, value);
        true
    }

    /// Removes every property and category. Subscriptions are kept.
    pub fn clear_properties(&mut self) {
        tracing::debug!(count = self.tree.len(), "clearing properties");
        self.tree.clear();
    }

    /// Returns `true` if a property called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tree.property_node(name).is_some()
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the grid has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns property names in tree order.
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        self.tree
            .properties()
            .filter_map(|node| self.tree.name(node).map(str::to_owned))
            .collect()
    }

    /// Returns the live context for `name`, or an invalid context.
    #[must_use]
    pub fn property_context(&self, name: &str) -> &PropertyContext {
        self.tree
            .property_node(name)
            .and_then(|node| self.tree.context(node))
            .unwrap_or(&self.invalid)
    }

    /// Sets a property's value.
    ///
    /// The value must have the declared type or convert to it; the converted
    /// value is stored. Properties declared with [`ValueType::Unknown`] accept
    /// any value. Subscribers are notified only if the stored value changed.
    pub fn set_property_value(&mut self, name: &str, value: Value) -> Result<(), SetValueError> {
        let node = self.editable_node(name)?;
        self.apply(node, value)
    }

    fn editable_node(&self, name: &str) -> Result<NodeId, SetValueError> {
        if name.trim().is_empty() {
            return Err(SetValueError::BlankName);
        }
        let node = self
            .tree
            .property_node(name)
            .ok_or_else(|| SetValueError::UnknownProperty(name.to_owned()))?;
        if !self.tree.flags(node, Column::Value).contains(ItemFlags::EDITABLE) {
            return Err(SetValueError::ReadOnly(name.to_owned()));
        }
        Ok(node)
    }

    fn apply(&mut self, node: NodeId, value: Value) -> Result<(), SetValueError> {
        let Some(context) = self.tree.context(node) else {
            return Err(SetValueError::UnknownProperty(String::new()));
        };
        let expected = context.property().value_type();
        let found = value.value_type();
        let value = if expected == ValueType::Unknown || expected == found {
            value
        } else {
            value
                .convert(expected)
                .ok_or_else(|| SetValueError::IncompatibleType {
                    name: context.property().name().to_owned(),
                    expected,
                    found,
                })?
        };
        self.update_value(node, value);
        Ok(())
    }

    /// The single path every value change goes through: store, refresh the
    /// cached display, then notify if the value differs.
    fn update_value(&mut self, node: NodeId, value: Value) {
        let Some(context) = self.tree.context_mut(node) else {
            return;
        };
        let changed = context.value() != &value;
        context.set_value(value);
        self.refresh_display(node);
        if changed {
            self.emit(node);
        }
    }

    fn refresh_display(&mut self, node: NodeId) {
        let Some(context) = self.tree.context(node) else {
            return;
        };
        let editor = self.editors.resolve(context);
        let text = if context.value().is_valid() {
            editor.to_text(context)
        } else {
            String::new()
        };
        let glyph = editor.preview_glyph(context);
        let stored = context.value().clone();

        self.tree
            .set_data(node, Column::Value, Role::Edit, ItemData::Value(stored));
        self.tree
            .set_data(node, Column::Value, Role::Display, ItemData::Text(text));
        match glyph {
            Some(glyph) => self
                .tree
                .set_data(node, Column::Value, Role::Decoration, ItemData::Glyph(glyph)),
            None => self.tree.clear_data(node, Column::Value, Role::Decoration),
        }
    }

    fn refresh_all(&mut self) {
        let nodes: Vec<_> = self.tree.properties().collect();
        for node in nodes {
            self.refresh_display(node);
        }
    }

    fn emit(&mut self, node: NodeId) {
        let Some(context) = self.tree.context(node) else {
            return;
        };
        tracing::trace!(
            property = context.property().name(),
            value = ?context.value(),
            subscribers = self.subscribers.len(),
            "property value changed"
        );
        for (_, callback) in &mut self.subscribers {
            callback(context);
        }
    }

    // --- Categories ---

    /// Returns whether category nodes are shown.
    #[must_use]
    pub fn show_categories(&self) -> bool {
        self.tree.show_categories()
    }

    /// Shows or hides category nodes.
    pub fn set_show_categories(&mut self, show: bool) {
        self.tree.set_show_categories(show);
    }

    // --- Presentation ---

    /// Returns the caption of a column header.
    #[must_use]
    pub fn header_text(&self, column: Column) -> &str {
        self.config.header_text(column)
    }

    /// Returns the cached display text of a property's value, or `""`.
    #[must_use]
    pub fn display_text(&self, name: &str) -> String {
        self.tree
            .property_node(name)
            .map(|node| self.tree.display_text(node, Column::Value))
            .unwrap_or_default()
    }

    /// Returns the description attribute of a property, or `""`.
    #[must_use]
    pub fn description(&self, name: &str) -> &str {
        self.property_context(name).property().description()
    }

    /// Returns the cached preview glyph of a property.
    #[must_use]
    pub fn decoration(&self, name: &str) -> Option<PreviewGlyph> {
        let node = self.tree.property_node(name)?;
        match self.tree.data(node, Column::Value, Role::Decoration)?.into_owned() {
            ItemData::Glyph(glyph) => Some(glyph),
            _ => None,
        }
    }

    /// Returns the size the preview glyph occupies in the decoration box.
    #[must_use]
    pub fn decoration_size(&self, name: &str) -> Option<Size> {
        self.decoration(name)
            .map(|glyph| glyph.fitted_size(self.config.decoration_size()))
    }

    /// Returns `true` if the property's value column is editable.
    #[must_use]
    pub fn is_editable(&self, name: &str) -> bool {
        self.tree
            .property_node(name)
            .is_some_and(|node| self.tree.flags(node, Column::Value).contains(ItemFlags::EDITABLE))
    }

    // --- Editors ---

    /// Returns the editor registry.
    #[must_use]
    pub fn editors(&self) -> &EditorRegistry {
        &self.editors
    }

    /// Returns the editor that renders and parses `name`.
    ///
    /// Unknown names resolve against the invalid context, which yields the
    /// default editor unless a registered editor claims untyped properties.
    #[must_use]
    pub fn editor_for(&self, name: &str) -> &dyn PropertyEditor {
        self.editors.resolve(self.property_context(name))
    }

    /// Appends a default-constructed editor. Duplicates are ignored.
    pub fn add_editor<E: PropertyEditor + Default>(&mut self) -> bool {
        self.insert_editor(E::default())
    }

    /// Appends an editor instance. Duplicates are ignored.
    pub fn insert_editor<E: PropertyEditor>(&mut self, editor: E) -> bool {
        let added = self.editors.insert(editor);
        if added {
            self.refresh_all();
        }
        added
    }

    /// Replaces the `Old` editor with `editor` in place.
    pub fn replace_editor<Old: PropertyEditor, New: PropertyEditor>(
        &mut self,
        editor: New,
    ) -> bool {
        let replaced = self.editors.replace::<Old, New>(editor);
        if replaced {
            self.refresh_all();
        }
        replaced
    }

    /// Removes the `E` editor.
    pub fn remove_editor<E: PropertyEditor>(&mut self) -> bool {
        let removed = self.editors.remove::<E>();
        if removed {
            self.refresh_all();
        }
        removed
    }

    /// Returns how `name` should be edited.
    #[must_use]
    pub fn edit_style(&self, name: &str) -> EditStyle {
        let context = self.property_context(name);
        self.editors.resolve(context).edit_style(context)
    }

    /// Returns the drop-down content for `name`, if its editor has one.
    #[must_use]
    pub fn drop_down_options(&self, name: &str) -> Option<DropDown> {
        let context = self.property_context(name);
        if !context.is_valid() {
            return None;
        }
        self.editors.resolve(context).drop_down(context)
    }

    // --- Edit paths ---

    /// Parses `text` with the resolved editor and stores the result.
    ///
    /// Returns `Ok(true)` if the value changed and `Ok(false)` if the parsed
    /// value equals the current one. On error the value is left unchanged.
    pub fn commit_text(&mut self, name: &str, text: &str) -> Result<bool, EditError> {
        let node = self.editable_node(name)?;
        let Some(context) = self.tree.context(node) else {
            return Ok(false);
        };
        let parsed = self.editors.resolve(context).from_text(text, context)?;
        if &parsed == context.value() {
            return Ok(false);
        }
        self.apply(node, parsed)?;
        Ok(true)
    }

    /// Runs the resolved editor's modal picker and stores the picked value.
    ///
    /// Returns `Ok(false)` if the picker was cancelled or picked the current value.
    pub fn request_modal(
        &mut self,
        name: &str,
        picker: &mut dyn ModalPicker,
    ) -> Result<bool, EditError> {
        let node = self.editable_node(name)?;
        let Some(context) = self.tree.context(node) else {
            return Ok(false);
        };
        let editor = self.editors.resolve(context);
        if editor.edit_style(context) != EditStyle::Modal {
            return Ok(false);
        }
        let Some(picked) = editor.on_modal_requested(context, picker) else {
            return Ok(false);
        };
        if &picked == context.value() {
            return Ok(false);
        }
        self.apply(node, picked)?;
        Ok(true)
    }

    // --- Notifications ---

    /// Registers a callback run after every actual value change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PropertyContext) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Connects the single value-changed slot of `name`, replacing any
    /// previous slot. The slot runs on every store, changed or not.
    pub fn connect_value_changed<F>(&mut self, name: &str, slot: F) -> bool
    where
        F: FnMut(&Value) + 'static,
    {
        let Some(node) = self.tree.property_node(name) else {
            return false;
        };
        let Some(context) = self.tree.context_mut(node) else {
            return false;
        };
        let slot: ValueChangedSlot = Box::new(slot);
        context.connect_value_changed(slot);
        true
    }

    /// Disconnects the value-changed slot of `name`.
    pub fn disconnect_value_changed(&mut self, name: &str) -> bool {
        let Some(node) = self.tree.property_node(name) else {
            return false;
        };
        self.tree
            .context_mut(node)
            .is_some_and(PropertyContext::disconnect_value_changed)
    }
}

impl Default for PropertyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyGrid")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("editors", &self.editors)
            .field("subscribers", &self.subscribers.len())
            .field("next_subscription", &self.next_subscription)
            .field("invalid", &self.invalid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use understory_property::{Color, Description, ReadOnly};

    use super::*;
    use crate::editors::BoolEditor;

    #[test]
    fn rejects_empty_and_duplicate_names() {
        let mut grid = PropertyGrid::new();
        assert!(!grid.add_property(Property::new("", ValueType::Int), Value::Int(1)));
        assert!(grid.add_property(Property::new("a", ValueType::Int), Value::Int(1)));
        assert!(!grid.add_property(Property::new("a", ValueType::String), Value::from("x")));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.property_context("a").value(), &Value::Int(1));
    }

    #[test]
    fn initial_population_does_not_notify() {
        let mut grid = PropertyGrid::new();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        grid.subscribe(move |_| *sink.borrow_mut() += 1);
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(grid.display_text("a"), "1");
    }

    #[test]
    fn set_value_failures_leave_state_alone() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        assert_eq!(grid.set_property_value(" ", Value::Int(2)), Err(SetValueError::BlankName));
        assert_eq!(
            grid.set_property_value("b", Value::Int(2)),
            Err(SetValueError::UnknownProperty("b".into()))
        );
        assert!(matches!(
            grid.set_property_value("a", Value::Color(Color::RED)),
            Err(SetValueError::IncompatibleType { .. })
        ));
        assert_eq!(grid.property_context("a").value(), &Value::Int(1));
    }

    #[test]
    fn convertible_values_are_stored_converted() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        grid.set_property_value("a", Value::from("12")).unwrap();
        assert_eq!(grid.property_context("a").value(), &Value::Int(12));
    }

    #[test]
    fn read_only_properties_refuse_edits() {
        let mut grid = PropertyGrid::new();
        let property = Property::new("id", ValueType::Int).with_attribute(ReadOnly(true));
        grid.add_property(property, Value::Int(3));
        assert!(!grid.is_editable("id"));
        assert_eq!(
            grid.set_property_value("id", Value::Int(4)),
            Err(SetValueError::ReadOnly("id".into()))
        );
        assert!(matches!(
            grid.commit_text("id", "4"),
            Err(EditError::Set(SetValueError::ReadOnly(_)))
        ));
        assert_eq!(grid.display_text("id"), "3");
        let node = grid.tree().property_node("id").unwrap();
        assert_eq!(
            grid.tree()
                .data(node, Column::Name, Role::Foreground)
                .map(std::borrow::Cow::into_owned),
            Some(ItemData::Color(GridConfig::DEFAULT_READ_ONLY_FOREGROUND))
        );
    }

    #[test]
    fn category_rows_are_styled() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        let category = grid.tree().find_category("Misc").unwrap();
        let font = grid
            .tree()
            .data(category, Column::Value, Role::Font)
            .map(std::borrow::Cow::into_owned);
        assert_eq!(font, Some(ItemData::Font(grid.config().category_font().clone())));
        assert!(grid.tree().data(category, Column::Name, Role::Background).is_some());
    }

    #[test]
    fn commit_text_parses_with_resolved_editor() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("on", ValueType::Bool), Value::Bool(false));
        assert_eq!(grid.commit_text("on", "TRUE"), Ok(true));
        assert_eq!(grid.commit_text("on", "true"), Ok(false));
        assert!(matches!(grid.commit_text("on", "maybe"), Err(EditError::Parse(_))));
        assert_eq!(grid.property_context("on").value(), &Value::Bool(true));
        assert_eq!(grid.edit_style("on"), EditStyle::DropDown);
    }

    #[test]
    fn value_changed_slot_is_single() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        assert!(grid.connect_value_changed("a", move |v| {
            first.borrow_mut().push(("first", v.clone()));
        }));
        let second = Rc::clone(&log);
        assert!(grid.connect_value_changed("a", move |v| {
            second.borrow_mut().push(("second", v.clone()));
        }));
        grid.set_property_value("a", Value::Int(2)).unwrap();
        assert_eq!(*log.borrow(), vec![("second", Value::Int(2))]);
        assert!(grid.disconnect_value_changed("a"));
        assert!(!grid.disconnect_value_changed("a"));
        assert!(!grid.connect_value_changed("missing", |_| {}));
    }

    #[test]
    fn removing_an_editor_refreshes_display() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("on", ValueType::Bool), Value::Bool(true));
        assert!(grid.remove_editor::<BoolEditor>());
        assert_eq!(grid.display_text("on"), "true");
        assert_eq!(grid.edit_style("on"), EditStyle::None);
        assert!(grid.add_editor::<BoolEditor>());
        assert_eq!(grid.edit_style("on"), EditStyle::DropDown);
    }

    #[test]
    fn description_and_headers() {
        let mut grid = PropertyGrid::new();
        grid.add_property(
            Property::new("a", ValueType::Int).with_attribute(Description::new("An integer")),
            Value::Int(1),
        );
        assert_eq!(grid.description("a"), "An integer");
        assert_eq!(grid.description("missing"), "");
        assert_eq!(grid.header_text(Column::Value), "Value");
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("a", ValueType::Int), Value::Int(1));
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let id = grid.subscribe(move |_| *sink.borrow_mut() += 1);
        grid.set_property_value("a", Value::Int(2)).unwrap();
        assert!(grid.unsubscribe(id));
        assert!(!grid.unsubscribe(id));
        grid.set_property_value("a", Value::Int(3)).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn add_value_infers_type() {
        let mut grid = PropertyGrid::new();
        assert!(grid.add_value("ratio", Value::Double(0.5)));
        assert_eq!(grid.property_context("ratio").property().value_type(), ValueType::Double);
        assert!(grid.add_value("blank", Value::Invalid));
        assert_eq!(grid.display_text("blank"), "");
        grid.set_property_value("blank", Value::from("anything")).unwrap();
        assert_eq!(grid.display_text("blank"), "anything");
    }
}
