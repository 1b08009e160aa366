// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property descriptors.

use std::any::{Any, TypeId};
use std::fmt;

use hashbrown::HashMap;

use crate::attribute::{
    Attribute, AttributeRegistry, BoxedAttribute, Category, Description, ReadOnly,
};
use crate::value::ValueType;

/// A named, typed property descriptor carrying attribute metadata.
///
/// A `Property` holds no value; values live in the grid's context for it.
/// Construction performs no validation, an empty name is rejected later when
/// the property is inserted into a grid.
///
/// Attributes are keyed by kind: adding a second instance of the same kind
/// replaces the first.
///
/// # Example
///
/// ```rust
/// use understory_property::{Category, Description, Property, ReadOnly, ValueType};
///
/// let property = Property::new("count", ValueType::Int)
///     .with_attribute(Category::new("General"))
///     .with_attribute(Description::new("Number of items"));
///
/// assert_eq!(property.category(), Some("General"));
/// assert!(!property.is_read_only());
/// assert!(!property.has_attribute::<ReadOnly>());
///
/// // Absent attributes read back as their default.
/// assert_eq!(property.attribute::<ReadOnly>(), ReadOnly(true));
/// ```
pub struct Property {
    name: String,
    value_type: ValueType,
    attributes: HashMap<TypeId, BoxedAttribute>,
}

impl Property {
    /// Creates a property with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            attributes: HashMap::new(),
        }
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared value type.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Adds an attribute, builder style.
    #[must_use]
    pub fn with_attribute<K: Attribute>(mut self, attribute: K) -> Self {
        self.add_attribute(attribute);
        self
    }

    /// Adds an attribute, replacing any previous attribute of the same kind.
    ///
    /// The first time a kind is attached anywhere in the process it is
    /// recorded in the [`AttributeRegistry`].
    pub fn add_attribute<K: Attribute>(&mut self, attribute: K) {
        AttributeRegistry::register::<K>();
        self.attributes.insert(TypeId::of::<K>(), Box::new(attribute));
    }

    /// Removes the attribute of kind `K`, returning it if present.
    pub fn remove_attribute<K: Attribute>(&mut self) -> Option<K> {
        let boxed = self.attributes.remove(&TypeId::of::<K>())?;
        boxed.downcast::<K>().ok().map(|k| *k)
    }

    /// Returns a copy of the attribute of kind `K`, or `K::default()` if absent.
    ///
    /// Use [`Property::has_attribute`] to tell absence from a default value.
    #[must_use]
    pub fn attribute<K: Attribute>(&self) -> K {
        self.attribute_ref::<K>().cloned().unwrap_or_default()
    }

    /// Returns a reference to the attribute of kind `K`, if present.
    #[must_use]
    pub fn attribute_ref<K: Attribute>(&self) -> Option<&K> {
        self.attributes
            .get(&TypeId::of::<K>())
            .and_then(|boxed| boxed.downcast_ref::<K>())
    }

    /// Returns `true` if an attribute of kind `K` is attached.
    #[must_use]
    pub fn has_attribute<K: Attribute>(&self) -> bool {
        self.attributes.contains_key(&TypeId::of::<K>())
    }

    /// Returns the number of attached attributes.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if a [`ReadOnly`] attribute is attached and set.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.attribute_ref::<ReadOnly>().is_some_and(|r| r.0)
    }

    /// Returns the non-empty [`Category`] name, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.attribute_ref::<Category>()
            .map(|c| c.0.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Returns the [`Description`] text, or `""` if absent.
    #[must_use]
    pub fn description(&self) -> &str {
        self.attribute_ref::<Description>()
            .map_or("", |d| d.0.as_str())
    }
}

impl Clone for Property {
    /// Deep-copies every attribute through the [`AttributeRegistry`].
    ///
    /// Attributes whose kind is unknown to the registry are dropped.
    fn clone(&self) -> Self {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(kind, boxed)| {
                let any: &dyn Any = boxed.as_ref();
                AttributeRegistry::copy(*kind, any).map(|copy| (*kind, copy))
            })
            .collect();
        Self {
            name: self.name.clone(),
            value_type: self.value_type,
            attributes,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<_> = self
            .attributes
            .keys()
            .map(|kind| AttributeRegistry::kind_name(*kind).unwrap_or("?"))
            .collect();
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("attributes", &kinds)
            .finish()
    }
}
