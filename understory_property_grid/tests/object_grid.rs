// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `ObjectPropertyGrid`: common members, merged values and
//! write-back across a selection.

use std::cell::RefCell;
use std::rc::Rc;

use understory_property::{Inspectable, MemberError, MemberInfo, Value, ValueType};
use understory_property_grid::{ObjectHandle, ObjectPropertyGrid, WriteBackError};

/// A calendar entry with a writable year, a read-only id and an optional note.
struct Entry {
    id: i32,
    year: i32,
    note: Option<String>,
}

impl Entry {
    fn new(id: i32, year: i32) -> Self {
        Self {
            id,
            year,
            note: None,
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }
}

impl Inspectable for Entry {
    fn members(&self) -> Vec<MemberInfo> {
        let mut members = vec![
            MemberInfo::read_only("id", ValueType::Int),
            MemberInfo::read_write("year", ValueType::Int),
        ];
        if self.note.is_some() {
            members.push(MemberInfo::read_write("note", ValueType::String));
        }
        members
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Int(self.id)),
            "year" => Some(Value::Int(self.year)),
            "note" => self.note.clone().map(Value::String),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: &Value) -> Result<(), MemberError> {
        match (name, value) {
            ("year", Value::Int(year)) if *year < 0 => Err(MemberError::Rejected {
                name: name.into(),
                reason: "negative year".into(),
            }),
            ("year", Value::Int(year)) => {
                self.year = *year;
                Ok(())
            }
            ("note", Value::String(note)) if self.note.is_some() => {
                self.note = Some(note.clone());
                Ok(())
            }
            ("id", _) => Err(MemberError::ReadOnly(name.into())),
            _ => Err(MemberError::UnknownMember(name.into())),
        }
    }
}

/// Exposes `year` but only for reading.
struct Archived;

impl Inspectable for Archived {
    fn members(&self) -> Vec<MemberInfo> {
        vec![MemberInfo::read_only("year", ValueType::Int)]
    }

    fn member(&self, name: &str) -> Option<Value> {
        (name == "year").then_some(Value::Int(1999))
    }

    fn set_member(&mut self, name: &str, _value: &Value) -> Result<(), MemberError> {
        Err(MemberError::ReadOnly(name.into()))
    }
}

fn handle(entry: Entry) -> Rc<RefCell<Entry>> {
    Rc::new(RefCell::new(entry))
}

fn select(grid: &mut ObjectPropertyGrid, objects: &[&Rc<RefCell<Entry>>]) {
    let handles: Vec<ObjectHandle> = objects
        .iter()
        .map(|object| Rc::clone(object) as ObjectHandle)
        .collect();
    grid.set_selection(handles);
}

#[test]
fn differing_years_show_blank() {
    let a = handle(Entry::new(1, 2025));
    let b = handle(Entry::new(2, 2024));
    let mut grid = ObjectPropertyGrid::new();
    select(&mut grid, &[&a, &b]);

    let year = grid.grid().property_context("year");
    assert!(year.is_valid());
    assert_eq!(year.value(), &Value::Invalid);
    assert_eq!(grid.grid().display_text("year"), "");
    assert_ne!(grid.grid().display_text("year"), "2025");
}

#[test]
fn equal_values_are_shown() {
    let a = handle(Entry::new(1, 2025));
    let b = handle(Entry::new(1, 2024));
    let mut grid = ObjectPropertyGrid::new();
    select(&mut grid, &[&a, &b]);
    assert_eq!(grid.grid().property_context("id").value(), &Value::Int(1));
    assert_eq!(grid.grid().display_text("id"), "1");
}

#[test]
fn only_common_members_are_listed() {
    let a = handle(Entry::new(1, 2025).with_note("hello"));
    let b = handle(Entry::new(2, 2025));
    let mut grid = ObjectPropertyGrid::new();

    select(&mut grid, &[&a]);
    assert_eq!(grid.grid().property_names(), vec!["id", "year", "note"]);

    select(&mut grid, &[&a, &b]);
    assert_eq!(grid.grid().property_names(), vec!["id", "year"]);
}

#[test]
fn writability_requires_every_object() {
    let a = handle(Entry::new(1, 2025));
    let mut grid = ObjectPropertyGrid::new();
    grid.set_selection(vec![
        Rc::clone(&a) as ObjectHandle,
        Rc::new(RefCell::new(Archived)) as ObjectHandle,
    ]);
    assert!(!grid.grid().is_editable("year"));
    assert!(!grid.grid().contains("id"));
}

#[test]
fn edits_are_written_to_the_whole_selection() {
    let a = handle(Entry::new(1, 2025));
    let b = handle(Entry::new(2, 2024));
    let mut grid = ObjectPropertyGrid::new();
    select(&mut grid, &[&a, &b]);

    assert_eq!(grid.grid_mut().commit_text("year", "2030"), Ok(true));
    assert_eq!(a.borrow().year, 2030);
    assert_eq!(b.borrow().year, 2030);
    assert_eq!(grid.grid().display_text("year"), "2030");
}

#[test]
fn rejected_writes_are_best_effort() {
    let a = handle(Entry::new(1, 2025));
    let b = handle(Entry::new(2, 2024));
    let mut grid = ObjectPropertyGrid::new();
    select(&mut grid, &[&a, &b]);

    grid.set_property_value("year", Value::Int(-5)).unwrap();
    let failures = grid.last_write_back_failures();
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].object, 0);
    assert_eq!(failures[1].object, 1);
    assert!(matches!(
        failures[0].error,
        WriteBackError::Member(MemberError::Rejected { .. })
    ));
    assert_eq!(a.borrow().year, 2025);

    grid.set_property_value("year", Value::Int(2000)).unwrap();
    assert!(grid.last_write_back_failures().is_empty());
    assert_eq!(b.borrow().year, 2000);
}

#[test]
fn refresh_picks_up_external_changes() {
    let a = handle(Entry::new(1, 2025));
    let mut grid = ObjectPropertyGrid::new();
    select(&mut grid, &[&a]);
    a.borrow_mut().year = 1990;
    assert_eq!(grid.grid().display_text("year"), "2025");
    grid.refresh();
    assert_eq!(grid.grid().display_text("year"), "1990");
}

#[test]
fn selection_accessors() {
    let a = handle(Entry::new(1, 2025));
    let mut grid = ObjectPropertyGrid::new();
    assert!(grid.selected_objects().is_empty());
    grid.set_selected_object(Some(Rc::clone(&a) as ObjectHandle));
    assert_eq!(grid.selected_objects().len(), 1);
    assert!(grid.selected_object().is_some());
    grid.set_selection(Vec::new());
    assert!(grid.grid().is_empty());
}
