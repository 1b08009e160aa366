// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for the grid.
//!
//! 1. Names are unique: later registrations of a name have no effect.
//! 2. Toggling categories off and on restores the visible tree exactly.
//! 3. Text committed through the int editor round-trips.
//! 4. Built-in editors parse back what they render, floating-point geometry included.
//! 5. Merged values equal the shared value, or blank when any object differs.

use proptest::prelude::*;
use understory_property::{
    Category, Color, FloatRect, Font, FontSize, Inspectable, IntRect, IntSize, MemberError,
    MemberInfo, Property, Value, ValueType,
};
use understory_property_grid::{
    ColorEditor, FontEditor, PropertyContext, PropertyEditor, PropertyGrid, RectEditor,
    SizeEditor, merge_members,
};

fn entry_strategy() -> impl Strategy<Value = (String, String, i32)> {
    (
        prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]),
        prop::sample::select(vec!["One", "Two", "Three"]),
        any::<i32>(),
    )
        .prop_map(|(name, category, value)| (name.to_owned(), category.to_owned(), value))
}

fn populate(entries: &[(String, String, i32)]) -> PropertyGrid {
    let mut grid = PropertyGrid::new();
    for (name, category, value) in entries {
        grid.add_property(
            Property::new(name.as_str(), ValueType::Int)
                .with_attribute(Category::new(category.as_str())),
            Value::Int(*value),
        );
    }
    grid
}

fn round_trips(editor: &dyn PropertyEditor, value_type: ValueType, value: Value) -> bool {
    let context = PropertyContext::new(Property::new("p", value_type), value.clone());
    let text = editor.to_text(&context);
    editor.from_text(&text, &context) == Ok(value)
}

struct Scalar(i32);

impl Inspectable for Scalar {
    fn members(&self) -> Vec<MemberInfo> {
        vec![MemberInfo::read_write("v", ValueType::Int)]
    }

    fn member(&self, name: &str) -> Option<Value> {
        (name == "v").then_some(Value::Int(self.0))
    }

    fn set_member(&mut self, name: &str, _value: &Value) -> Result<(), MemberError> {
        Err(MemberError::UnknownMember(name.into()))
    }
}

proptest! {
    #[test]
    fn names_are_unique(entries in prop::collection::vec(entry_strategy(), 0..24)) {
        let grid = populate(&entries);
        let mut first_seen: Vec<(&str, i32)> = Vec::new();
        for (name, _, value) in &entries {
            if !first_seen.iter().any(|(seen, _)| *seen == name.as_str()) {
                first_seen.push((name.as_str(), *value));
            }
        }
        prop_assert_eq!(grid.len(), first_seen.len());
        for (name, value) in first_seen {
            prop_assert_eq!(grid.property_context(name).value(), &Value::Int(value));
        }
    }

    #[test]
    fn category_toggle_round_trip(entries in prop::collection::vec(entry_strategy(), 0..24)) {
        let mut grid = populate(&entries);
        let before = grid.tree().visible_nodes();
        grid.set_show_categories(false);
        let flat = grid.tree().visible_nodes();
        prop_assert_eq!(flat.len(), grid.len());
        grid.set_show_categories(true);
        prop_assert_eq!(grid.tree().visible_nodes(), before);
    }

    #[test]
    fn int_text_round_trip(start in any::<i32>(), next in any::<i32>()) {
        let mut grid = PropertyGrid::new();
        grid.add_property(Property::new("n", ValueType::Int), Value::Int(start));
        let changed = grid.commit_text("n", &next.to_string()).unwrap();
        prop_assert_eq!(changed, start != next);
        prop_assert_eq!(grid.property_context("n").value(), &Value::Int(next));
        prop_assert_eq!(grid.display_text("n"), next.to_string());
    }

    #[test]
    fn color_editor_round_trip(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        a in any::<u8>(),
    ) {
        let value = Value::Color(Color::rgba(r, g, b, a));
        prop_assert!(round_trips(&ColorEditor, ValueType::Color, value));
    }

    #[test]
    fn geometry_editors_round_trip(
        x in -10_000_i32..10_000,
        y in -10_000_i32..10_000,
        w in 0_i32..10_000,
        h in 0_i32..10_000,
    ) {
        let size = Value::Size(IntSize::new(w, h));
        prop_assert!(round_trips(&SizeEditor, ValueType::Size, size));
        let rect = Value::Rect(IntRect::new(x, y, w, h));
        prop_assert!(round_trips(&RectEditor, ValueType::Rect, rect));
    }

    #[test]
    fn float_geometry_editors_round_trip(
        x in -1.0e6_f64..1.0e6,
        y in -1.0e6_f64..1.0e6,
        w in -1.0e6_f64..1.0e6,
        h in -1.0e6_f64..1.0e6,
    ) {
        let size = Value::SizeF(kurbo::Size::new(w, h));
        prop_assert!(round_trips(&SizeEditor, ValueType::SizeF, size));
        let rect = Value::RectF(FloatRect::new(x, y, w, h));
        prop_assert!(round_trips(&RectEditor, ValueType::RectF, rect));
    }

    #[test]
    fn widened_rects_keep_their_extent(
        x in -10_000_i32..10_000,
        y in -10_000_i32..10_000,
        w in -10_000_i32..10_000,
        h in -10_000_i32..10_000,
    ) {
        let rect = Value::Rect(IntRect::new(x, y, w, h));
        let widened = rect.convert(ValueType::RectF);
        prop_assert_eq!(widened.clone().and_then(|v| v.convert(ValueType::Rect)), Some(rect));
        let widened = widened.map(|v| v.to_string());
        prop_assert_eq!(widened, Some(format!("{x}, {y}, {w}, {h}")));
    }

    #[test]
    fn font_editor_round_trip(
        family in "[A-Za-z][A-Za-z ]{0,10}[A-Za-z]",
        points in 1_i32..200,
        pixels in any::<bool>(),
        weight in 1_u16..1000,
        underline in any::<bool>(),
        strike_out in any::<bool>(),
        kerning in any::<bool>(),
    ) {
        let size = if pixels { FontSize::Pixels(points) } else { FontSize::Points(points) };
        let mut font = Font::new(family, size);
        font.weight = weight;
        font.underline = underline;
        font.strike_out = strike_out;
        font.kerning = kerning;
        prop_assert_eq!(FontEditor::parse(&FontEditor::format(&font)), Ok(font.clone()));
        prop_assert!(round_trips(&FontEditor, ValueType::Font, Value::Font(font)));
    }

    #[test]
    fn merged_value_is_shared_or_blank(values in prop::collection::vec(0_i32..3, 1..6)) {
        let objects: Vec<Scalar> = values.iter().copied().map(Scalar).collect();
        let refs: Vec<&dyn Inspectable> =
            objects.iter().map(|o| o as &dyn Inspectable).collect();
        let merged = merge_members(&refs);
        prop_assert_eq!(merged.len(), 1);
        let expected = if values.iter().all(|v| *v == values[0]) {
            Value::Int(values[0])
        } else {
            Value::Invalid
        };
        prop_assert_eq!(&merged[0].value, &expected);
    }
}
