// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types returned by grid operations.

use thiserror::Error;
use understory_property::{MemberError, ValueType};

use crate::editor::ParseError;

/// Why [`PropertyGrid::set_property_value`](crate::PropertyGrid::set_property_value) refused
/// a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetValueError {
    /// The name was empty or whitespace.
    #[error("property name is blank")]
    BlankName,
    /// No property with this name exists in the grid.
    #[error("no property named `{0}`")]
    UnknownProperty(String),
    /// The property is read-only.
    #[error("property `{0}` is read-only")]
    ReadOnly(String),
    /// The value neither has nor converts to the declared type.
    #[error("property `{name}` expects {expected}, got {found}")]
    IncompatibleType {
        /// Property name.
        name: String,
        /// Declared type.
        expected: ValueType,
        /// Type of the rejected value.
        found: ValueType,
    },
}

/// Why a text or modal edit was not applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    /// The text could not be parsed by the resolved editor.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parsed value was refused.
    #[error(transparent)]
    Set(#[from] SetValueError),
}

/// Why writing an edited value back to a selected object failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WriteBackError {
    /// The object refused the value.
    #[error(transparent)]
    Member(#[from] MemberError),
    /// The object was already borrowed elsewhere.
    #[error("object is already borrowed")]
    Busy,
}
