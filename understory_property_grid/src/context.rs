// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live binding of a property to its current value.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use understory_property::{Property, Value};

/// Identity of a [`PropertyGrid`](crate::PropertyGrid) instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridId(u64);

impl GridId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked with the new value whenever a context's value is set.
pub type ValueChangedSlot = Box<dyn FnMut(&Value)>;

/// A [`Property`] bound to a current value, an optional source object and the
/// grid that owns it.
///
/// The owning grid is held weakly: once the grid is dropped,
/// [`PropertyContext::property_grid`] returns `None` for any context that
/// outlived it.
///
/// Each context has a single value-changed slot, connected by whichever editor
/// is currently showing the property. Connecting a new slot replaces the old
/// one. Clones start with no slot connected.
///
/// Only the grid mutates a context's value; the public surface is read-only.
pub struct PropertyContext {
    property: Property,
    value: Value,
    object: Option<Rc<dyn Any>>,
    grid: Weak<GridId>,
    value_changed: Option<ValueChangedSlot>,
}

impl PropertyContext {
    /// Creates a detached context that belongs to no grid.
    ///
    /// Useful for driving a [`PropertyEditor`](crate::PropertyEditor) directly.
    #[must_use]
    pub fn new(property: Property, value: Value) -> Self {
        Self {
            property,
            value,
            object: None,
            grid: Weak::new(),
            value_changed: None,
        }
    }

    /// Attaches a source-object back-reference, builder style.
    #[must_use]
    pub fn with_object(mut self, object: Rc<dyn Any>) -> Self {
        self.object = Some(object);
        self
    }

    /// Returns a detached copy of this context holding `value` instead.
    #[must_use]
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub(crate) fn attached(
        property: Property,
        value: Value,
        object: Option<Rc<dyn Any>>,
        grid: &Rc<GridId>,
    ) -> Self {
        Self {
            property,
            value,
            object,
            grid: Rc::downgrade(grid),
            value_changed: None,
        }
    }

    /// The canonical "not found" context: empty name, no value.
    pub(crate) fn invalid() -> Self {
        Self::new(Property::new("", understory_property::ValueType::Unknown), Value::Invalid)
    }

    /// Returns the property descriptor.
    #[must_use]
    #[inline]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Returns the current value.
    #[must_use]
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns `true` if the wrapped property has a non-empty name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.property.name().is_empty()
    }

    /// Returns the source object, if one was attached and it is a `T`.
    #[must_use]
    pub fn object<T: Any>(&self) -> Option<Rc<T>> {
        self.object.clone()?.downcast::<T>().ok()
    }

    /// Returns `true` if a source object is attached.
    #[must_use]
    pub fn has_object(&self) -> bool {
        self.object.is_some()
    }

    /// Returns the owning grid's id while that grid is alive.
    #[must_use]
    pub fn property_grid(&self) -> Option<GridId> {
        self.grid.upgrade().map(|id| *id)
    }

    /// Stores `value` and invokes the connected slot once with it.
    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
        if let Some(slot) = self.value_changed.as_mut() {
            slot(&self.value);
        }
    }

    pub(crate) fn connect_value_changed(&mut self, slot: ValueChangedSlot) {
        self.value_changed = Some(slot);
    }

    pub(crate) fn disconnect_value_changed(&mut self) -> bool {
        self.value_changed.take().is_some()
    }
}

impl Clone for PropertyContext {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            value: self.value.clone(),
            object: self.object.clone(),
            grid: self.grid.clone(),
            value_changed: None,
        }
    }
}

impl fmt::Debug for PropertyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyContext")
            .field("property", &self.property)
            .field("value", &self.value)
            .field("object", &self.object.is_some())
            .field("grid", &self.property_grid())
            .field("value_changed", &self.value_changed.is_some())
            .finish()
    }
}
