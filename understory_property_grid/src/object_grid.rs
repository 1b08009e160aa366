// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mirroring a selection of [`Inspectable`] objects into a grid.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use understory_property::{Inspectable, MemberInfo, Property, ReadOnly, Value};

use crate::config::GridConfig;
use crate::context::PropertyContext;
use crate::error::{SetValueError, WriteBackError};
use crate::grid::{PropertyGrid, SubscriptionId};

/// Shared, mutable handle to a selected object.
pub type ObjectHandle = Rc<RefCell<dyn Inspectable>>;

/// A member shared by every object of a selection.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedMember {
    /// The first object's description of the member; `writable` is true only
    /// if every object can write it.
    pub info: MemberInfo,
    /// The shared value, or [`Value::Invalid`] when the objects disagree.
    pub value: Value,
}

/// Computes the members common to all `objects` and their merged values.
///
/// A member is kept if it is readable on every object; order follows the first
/// object's declaration order. An empty slice yields no members.
///
/// # Example
///
/// ```rust
/// use understory_property::{Inspectable, MemberError, MemberInfo, Value, ValueType};
/// use understory_property_grid::merge_members;
///
/// struct Year(i32);
///
/// impl Inspectable for Year {
///     fn members(&self) -> Vec<MemberInfo> {
///         vec![MemberInfo::read_write("year", ValueType::Int)]
///     }
///     fn member(&self, name: &str) -> Option<Value> {
///         (name == "year").then_some(Value::Int(self.0))
///     }
///     fn set_member(&mut self, name: &str, _: &Value) -> Result<(), MemberError> {
///         Err(MemberError::UnknownMember(name.into()))
///     }
/// }
///
/// let (a, b) = (Year(2025), Year(2024));
/// let merged = merge_members(&[&a, &b]);
/// assert_eq!(merged[0].value, Value::Invalid);
/// assert_eq!(merge_members(&[&a, &a])[0].value, Value::Int(2025));
/// ```
#[must_use]
pub fn merge_members(objects: &[&dyn Inspectable]) -> Vec<MergedMember> {
    let Some((first, rest)) = objects.split_first() else {
        return Vec::new();
    };
    first
        .members()
        .into_iter()
        .filter(|info| info.readable)
        .filter_map(|mut info| {
            for other in rest {
                let shared = other.member_info(&info.name)?;
                if !shared.readable {
                    return None;
                }
                info.writable &= shared.writable;
            }
            let mut values = objects
                .iter()
                .map(|object| object.member(&info.name).unwrap_or_default());
            let first_value = values.next().unwrap_or_default();
            let value = if values.all(|value| value == first_value) {
                first_value
            } else {
                Value::Invalid
            };
            Some(MergedMember { info, value })
        })
        .collect()
}

/// A failed write of an edited value to one selected object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteBackFailure {
    /// Index of the object in the selection.
    pub object: usize,
    /// Name of the edited property.
    pub property: String,
    /// What went wrong.
    pub error: WriteBackError,
}

/// A [`PropertyGrid`] populated from the members of selected objects.
///
/// Edits made through the grid are written back to every selected object.
/// Write-back is best-effort: each object is attempted, failures are logged
/// and kept until the next edit, and nothing is rolled back.
///
/// With a single selected object, every property context carries the object's
/// handle, readable through `context.object::<ObjectHandle>()`.
pub struct ObjectPropertyGrid {
    grid: PropertyGrid,
    selection: Vec<ObjectHandle>,
    failures: Rc<RefCell<Vec<WriteBackFailure>>>,
    subscription: Option<SubscriptionId>,
}

impl ObjectPropertyGrid {
    /// Creates an empty object grid with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
    }

    /// Creates an empty object grid with `config`.
    #[must_use]
    pub fn with_config(config: GridConfig) -> Self {
        Self {
            grid: PropertyGrid::with_config(config),
            selection: Vec::new(),
            failures: Rc::new(RefCell::new(Vec::new())),
            subscription: None,
        }
    }

    /// Replaces the selection and rebuilds the grid from it.
    pub fn set_selection(&mut self, objects: Vec<ObjectHandle>) {
        self.selection = objects;
        self.rebuild();
    }

    /// Selects a single object, or nothing.
    pub fn set_selected_object(&mut self, object: Option<ObjectHandle>) {
        self.set_selection(object.into_iter().collect());
    }

    /// Returns the first selected object.
    #[must_use]
    pub fn selected_object(&self) -> Option<&ObjectHandle> {
        self.selection.first()
    }

    /// Returns the whole selection.
    #[must_use]
    pub fn selected_objects(&self) -> &[ObjectHandle] {
        &self.selection
    }

    /// Re-reads members and values from the current selection.
    pub fn refresh(&mut self) {
        self.rebuild();
    }

    /// Sets a property through the grid, writing it back to the selection.
    pub fn set_property_value(&mut self, name: &str, value: Value) -> Result<(), SetValueError> {
        self.grid.set_property_value(name, value)
    }

    /// Returns the failures of the most recent write-back.
    #[must_use]
    pub fn last_write_back_failures(&self) -> Vec<WriteBackFailure> {
        self.failures.borrow().clone()
    }

    /// Returns the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &PropertyGrid {
        &self.grid
    }

    /// Returns the underlying grid mutably, for edits and presentation changes.
    pub fn grid_mut(&mut self) -> &mut PropertyGrid {
        &mut self.grid
    }

    fn rebuild(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.grid.unsubscribe(id);
        }
        self.grid.clear_properties();
        self.failures.borrow_mut().clear();
        if self.selection.is_empty() {
            return;
        }

        let merged = {
            let Some(borrowed) = self
                .selection
                .iter()
                .map(|object| object.try_borrow().ok())
                .collect::<Option<Vec<_>>>()
            else {
                tracing::warn!("a selected object is mutably borrowed; leaving the grid empty");
                return;
            };
            let objects: Vec<&dyn Inspectable> = borrowed.iter().map(|object| &**object).collect();
            merge_members(&objects)
        };
        tracing::debug!(
            objects = self.selection.len(),
            members = merged.len(),
            "rebuilding object grid"
        );

        let single = match self.selection.as_slice() {
            [only] => Some(Rc::clone(only)),
            _ => None,
        };
        for MergedMember { info, value } in merged {
            let mut property = Property::new(info.name, info.value_type);
            if !info.writable {
                property.add_attribute(ReadOnly(true));
            }
            match &single {
                Some(object) => {
                    self.grid
                        .add_property_with_object(property, value, Rc::new(Rc::clone(object)));
                }
                None => {
                    self.grid.add_property(property, value);
                }
            }
        }

        let objects = self.selection.clone();
        let failures = Rc::clone(&self.failures);
        self.subscription = Some(
            self.grid
                .subscribe(move |context| write_back(&objects, context, &failures)),
        );
    }
}

fn write_back(
    objects: &[ObjectHandle],
    context: &PropertyContext,
    failures: &RefCell<Vec<WriteBackFailure>>,
) {
    let name = context.property().name();
    let mut failures = failures.borrow_mut();
    failures.clear();
    for (index, object) in objects.iter().enumerate() {
        let result = match object.try_borrow_mut() {
            Ok(mut object) => object
                .set_member(name, context.value())
                .map_err(WriteBackError::from),
            Err(_) => Err(WriteBackError::Busy),
        };
        if let Err(error) = result {
            tracing::warn!(property = name, object = index, %error, "write-back failed");
            failures.push(WriteBackFailure {
                object: index,
                property: name.to_owned(),
                error,
            });
        }
    }
}

impl Default for ObjectPropertyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectPropertyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPropertyGrid")
            .field("grid", &self.grid)
            .field("selection", &self.selection.len())
            .field("failures", &self.failures.borrow().len())
            .field("subscription", &self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use understory_property::{MemberError, ValueType};

    use super::*;

    struct Knob {
        label: String,
        turns: i32,
    }

    impl Inspectable for Knob {
        fn members(&self) -> Vec<MemberInfo> {
            vec![
                MemberInfo::read_write("label", ValueType::String),
                MemberInfo::read_only("turns", ValueType::Int),
            ]
        }

        fn member(&self, name: &str) -> Option<Value> {
            match name {
                "label" => Some(Value::String(self.label.clone())),
                "turns" => Some(Value::Int(self.turns)),
                _ => None,
            }
        }

        fn set_member(&mut self, name: &str, value: &Value) -> Result<(), MemberError> {
            match (name, value) {
                ("label", Value::String(label)) => {
                    self.label.clone_from(label);
                    Ok(())
                }
                ("turns", _) => Err(MemberError::ReadOnly(name.into())),
                _ => Err(MemberError::UnknownMember(name.into())),
            }
        }
    }

    fn handle(label: &str, turns: i32) -> ObjectHandle {
        Rc::new(RefCell::new(Knob {
            label: label.into(),
            turns,
        }))
    }

    #[test]
    fn single_object_is_mirrored_in_order() {
        let mut grid = ObjectPropertyGrid::new();
        let knob = handle("gain", 3);
        grid.set_selected_object(Some(Rc::clone(&knob)));
        assert_eq!(grid.grid().property_names(), vec!["label", "turns"]);
        assert!(grid.grid().is_editable("label"));
        assert!(!grid.grid().is_editable("turns"));
        let context = grid.grid().property_context("label");
        let bound = context.object::<ObjectHandle>().unwrap();
        assert!(Rc::ptr_eq(&*bound, &knob));
    }

    #[test]
    fn edits_fan_out_to_every_object() {
        let (a, b) = (handle("a", 1), handle("b", 1));
        let mut grid = ObjectPropertyGrid::new();
        grid.set_selection(vec![Rc::clone(&a), Rc::clone(&b)]);
        assert_eq!(grid.grid().property_context("label").value(), &Value::Invalid);
        assert_eq!(grid.grid().property_context("turns").value(), &Value::Int(1));

        grid.set_property_value("label", Value::from("both")).unwrap();
        for object in [&a, &b] {
            assert_eq!(object.borrow().member("label"), Some(Value::from("both")));
        }
        assert!(grid.last_write_back_failures().is_empty());
    }

    #[test]
    fn busy_objects_are_reported() {
        let (a, b) = (handle("a", 1), handle("b", 1));
        let mut grid = ObjectPropertyGrid::new();
        grid.set_selection(vec![Rc::clone(&a), Rc::clone(&b)]);
        {
            let _held = b.borrow();
            grid.set_property_value("label", Value::from("x")).unwrap();
        }
        assert_eq!(a.borrow().member("label"), Some(Value::from("x")));
        let failures = grid.last_write_back_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].object, 1);
        assert_eq!(failures[0].error, WriteBackError::Busy);
    }

    #[test]
    fn reselecting_keeps_a_single_subscription() {
        let mut grid = ObjectPropertyGrid::new();
        grid.set_selected_object(Some(handle("a", 1)));
        grid.set_selected_object(Some(handle("b", 2)));
        assert_eq!(grid.grid().subscriber_count(), 1);
        grid.set_selected_object(None);
        assert!(grid.grid().is_empty());
        assert_eq!(grid.grid().subscriber_count(), 0);
        assert!(grid.selected_object().is_none());
    }
}
