// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit reflection capability for host objects.
//!
//! A type implements [`Inspectable`] to expose an ordered list of named, typed
//! members that can be read and (optionally) written as [`Value`]s. This is the
//! entire surface a multi-object property grid needs from the objects it
//! mirrors.

use thiserror::Error;

use crate::value::{Value, ValueType};

/// Describes one reflectable member of an [`Inspectable`] object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member name, unique within the object.
    pub name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether [`Inspectable::member`] returns a value for it.
    pub readable: bool,
    /// Whether [`Inspectable::set_member`] may change it.
    pub writable: bool,
}

impl MemberInfo {
    /// A readable and writable member.
    #[must_use]
    pub fn read_write(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            readable: true,
            writable: true,
        }
    }

    /// A readable member that cannot be written.
    #[must_use]
    pub fn read_only(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            writable: false,
            ..Self::read_write(name, value_type)
        }
    }
}

/// Why a member write was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemberError {
    /// The object has no member with this name.
    #[error("no member named `{0}`")]
    UnknownMember(String),
    /// The member exists but is not writable.
    #[error("member `{0}` is read-only")]
    ReadOnly(String),
    /// The value's type cannot be stored in the member.
    #[error("member `{name}` expects {expected}, got {found}")]
    TypeMismatch {
        /// Member name.
        name: String,
        /// Declared member type.
        expected: ValueType,
        /// Type of the rejected value.
        found: ValueType,
    },
    /// The object refused the value for its own reasons.
    #[error("member `{name}` rejected the value: {reason}")]
    Rejected {
        /// Member name.
        name: String,
        /// Host-provided reason.
        reason: String,
    },
}

/// An object whose members can be enumerated, read and written by name.
///
/// # Example
///
/// ```rust
/// use understory_property::{Inspectable, MemberError, MemberInfo, Value, ValueType};
///
/// struct Book {
///     year: i32,
/// }
///
/// impl Inspectable for Book {
///     fn members(&self) -> Vec<MemberInfo> {
///         vec![MemberInfo::read_write("year", ValueType::Int)]
///     }
///
///     fn member(&self, name: &str) -> Option<Value> {
///         (name == "year").then(|| Value::Int(self.year))
///     }
///
///     fn set_member(&mut self, name: &str, value: &Value) -> Result<(), MemberError> {
///         match (name, value) {
///             ("year", Value::Int(year)) => {
///                 self.year = *year;
///                 Ok(())
///             }
///             ("year", other) => Err(MemberError::TypeMismatch {
///                 name: name.into(),
///                 expected: ValueType::Int,
///                 found: other.value_type(),
///             }),
///             _ => Err(MemberError::UnknownMember(name.into())),
///         }
///     }
/// }
///
/// let mut book = Book { year: 2024 };
/// book.set_member("year", &Value::Int(2025)).unwrap();
/// assert_eq!(book.member("year"), Some(Value::Int(2025)));
/// assert!(book.member_info("year").is_some_and(|m| m.writable));
/// ```
pub trait Inspectable {
    /// Returns the members in declaration order.
    fn members(&self) -> Vec<MemberInfo>;

    /// Reads a member, or `None` if unknown or unreadable.
    fn member(&self, name: &str) -> Option<Value>;

    /// Writes a member.
    fn set_member(&mut self, name: &str, value: &Value) -> Result<(), MemberError>;

    /// Looks up one member's description.
    fn member_info(&self, name: &str) -> Option<MemberInfo> {
        self.members().into_iter().find(|m| m.name == name)
    }
}
