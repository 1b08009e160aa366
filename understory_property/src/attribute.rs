// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute kinds and the process-wide attribute registry.
//!
//! An attribute is a piece of metadata attached to a [`Property`](crate::Property):
//! a description, a default value, a category, a read-only marker, or any
//! host-defined kind. Attributes are stored type-erased, keyed by their
//! [`TypeId`]. The [`AttributeRegistry`] records, per kind, how to deep-copy and
//! default-construct an instance so that properties can be cloned without the
//! attribute types sharing a clone method.
//!
//! Registration happens lazily the first time a kind is attached to a property.
//! Entries are never removed.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::value::Value;

/// A type-erased attribute instance.
pub type BoxedAttribute = Box<dyn Any + Send + Sync>;

/// Marker trait for attribute kinds.
///
/// Any `Clone + Default` type that is `Send + Sync` can be an attribute. The
/// default value doubles as the "absent" value returned by
/// [`Property::attribute`](crate::Property::attribute).
///
/// # Example
///
/// ```rust
/// use understory_property::{Attribute, Property, ValueType};
///
/// #[derive(Clone, Default, Debug, PartialEq)]
/// struct Unit(&'static str);
/// impl Attribute for Unit {}
///
/// let property = Property::new("width", ValueType::Double).with_attribute(Unit("px"));
/// assert_eq!(property.attribute::<Unit>(), Unit("px"));
/// ```
pub trait Attribute: Any + Clone + Default + Send + Sync {}

/// Human-readable description of a property, shown by the host as help text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Description(pub String);

impl Description {
    /// Creates a description.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Attribute for Description {}

/// The value a property resets to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultValue(pub Value);

impl Attribute for DefaultValue {}

/// The category a property is grouped under.
///
/// An empty category means "use the grid's default category".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Category(pub String);

impl Category {
    /// Creates a category attribute.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Attribute for Category {}

/// Marks a property as read-only.
///
/// Note that the default is `true`: attaching `ReadOnly::default()` makes a
/// property read-only. Absence of the attribute is what makes a property
/// editable, so use [`Property::is_read_only`](crate::Property::is_read_only)
/// rather than [`Property::attribute`](crate::Property::attribute) to test it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOnly(pub bool);

impl Default for ReadOnly {
    fn default() -> Self {
        Self(true)
    }
}

impl Attribute for ReadOnly {}

type CopyFn = fn(&dyn Any) -> Option<BoxedAttribute>;
type CreateFn = fn() -> BoxedAttribute;

#[derive(Clone, Copy)]
struct KindEntry {
    name: &'static str,
    copy: CopyFn,
    create: CreateFn,
}

fn copy_kind<K: Attribute>(instance: &dyn Any) -> Option<BoxedAttribute> {
    instance
        .downcast_ref::<K>()
        .map(|k| Box::new(k.clone()) as BoxedAttribute)
}

fn create_kind<K: Attribute>() -> BoxedAttribute {
    Box::new(K::default())
}

fn kinds() -> &'static RwLock<HashMap<TypeId, KindEntry>> {
    static KINDS: OnceLock<RwLock<HashMap<TypeId, KindEntry>>> = OnceLock::new();
    KINDS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Process-wide table of attribute kinds.
///
/// This is a zero-sized handle; all state lives in a lazily initialized global.
/// A poisoned lock is recovered rather than propagated, since entries are
/// plain function pointers and cannot be left half-written.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeRegistry;

impl AttributeRegistry {
    /// Records how to copy and default-construct `K`.
    ///
    /// Returns `true` if this call registered the kind, `false` if it was
    /// already known.
    pub fn register<K: Attribute>() -> bool {
        let id = TypeId::of::<K>();
        if Self::contains(id) {
            return false;
        }
        let mut table = kinds().write().unwrap_or_else(PoisonError::into_inner);
        if table.contains_key(&id) {
            return false;
        }
        let name = std::any::type_name::<K>();
        table.insert(
            id,
            KindEntry {
                name,
                copy: copy_kind::<K>,
                create: create_kind::<K>,
            },
        );
        tracing::debug!(kind = name, "registered attribute kind");
        true
    }

    /// Returns `true` if `K` has been registered.
    #[must_use]
    pub fn is_registered<K: Attribute>() -> bool {
        Self::contains(TypeId::of::<K>())
    }

    /// Returns `true` if the kind with the given id has been registered.
    #[must_use]
    pub fn contains(kind: TypeId) -> bool {
        kinds()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&kind)
    }

    /// Deep-copies `instance` using the closure recorded for `kind`.
    ///
    /// Returns `None` if `kind` was never registered or `instance` is not of
    /// that kind.
    #[must_use]
    pub fn copy(kind: TypeId, instance: &dyn Any) -> Option<BoxedAttribute> {
        let entry = Self::entry(kind)?;
        (entry.copy)(instance)
    }

    /// Default-constructs an instance of `kind`, if registered.
    #[must_use]
    pub fn create(kind: TypeId) -> Option<BoxedAttribute> {
        Self::entry(kind).map(|entry| (entry.create)())
    }

    /// Returns the type name recorded for `kind`, if registered.
    #[must_use]
    pub fn kind_name(kind: TypeId) -> Option<&'static str> {
        Self::entry(kind).map(|entry| entry.name)
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len() -> usize {
        kinds().read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn entry(kind: TypeId) -> Option<KindEntry> {
        kinds()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .copied()
    }
}

impl fmt::Debug for KindEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
