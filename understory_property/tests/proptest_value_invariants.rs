// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for values and property descriptors.
//!
//! 1. Numeric conversion succeeds iff the value fits the target type.
//! 2. Integers survive a trip through their text form.
//! 3. Bit arrays survive byte packing, padded to whole bytes with clear bits.
//! 4. Cloned properties carry equal, independent attributes.

use proptest::prelude::*;
use understory_property::{
    BitArray, Category, Description, Property, ReadOnly, Value, ValueType,
};

proptest! {
    #[test]
    fn narrowing_is_range_checked(v in any::<i64>()) {
        let converted = Value::Int64(v).convert(ValueType::Int);
        match i32::try_from(v) {
            Ok(narrow) => prop_assert_eq!(converted, Some(Value::Int(narrow))),
            Err(_) => prop_assert_eq!(converted, None),
        }
        prop_assert_eq!(Value::Int64(v).can_convert(ValueType::UInt64), v >= 0);
    }

    #[test]
    fn whole_doubles_convert_to_int(v in any::<i32>(), frac in 0.1_f64..0.9) {
        let whole = f64::from(v);
        prop_assert_eq!(Value::Double(whole).convert(ValueType::Int), Some(Value::Int(v)));
        prop_assert_eq!(Value::Double(whole + frac).convert(ValueType::Int), None);
    }

    #[test]
    fn integers_round_trip_through_text(v in any::<i64>()) {
        let text = Value::Int64(v).convert(ValueType::String);
        prop_assert_eq!(text.clone(), Some(Value::String(v.to_string())));
        let back = text.and_then(|t| t.convert(ValueType::Int64));
        prop_assert_eq!(back, Some(Value::Int64(v)));
    }

    #[test]
    fn bit_arrays_pack_and_unpack(bits in prop::collection::vec(any::<bool>(), 0..64)) {
        let array: BitArray = bits.iter().copied().collect();
        let bytes = array.to_bytes();
        prop_assert_eq!(bytes.len(), bits.len().div_ceil(8));
        let unpacked = BitArray::from_bytes(&bytes);
        prop_assert_eq!(unpacked.len(), bytes.len() * 8);
        for (i, bit) in unpacked.iter().enumerate() {
            prop_assert_eq!(bit, bits.get(i).copied().unwrap_or(false));
        }
    }

    #[test]
    fn clones_are_deep(category in "[A-Za-z]{1,12}", description in ".{0,24}") {
        let original = Property::new("p", ValueType::Int)
            .with_attribute(Category::new(category.as_str()))
            .with_attribute(Description::new(description.as_str()));
        let mut copy = original.clone();
        prop_assert_eq!(copy.category(), Some(category.as_str()));
        prop_assert_eq!(copy.description(), description.as_str());
        prop_assert_eq!(copy.attribute_count(), original.attribute_count());

        copy.add_attribute(ReadOnly(true));
        prop_assert!(copy.is_read_only());
        prop_assert!(!original.is_read_only());
    }
}
