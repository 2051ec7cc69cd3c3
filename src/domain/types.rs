//! Strongly-typed value objects used across the adapter.
//!
//! These wrappers enforce basic invariants (a well-formed object API name, a
//! 15- or 18-character record id) so that once a value reaches the query
//! compiler or the repository layer it can be treated as trusted.

use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided object name is not a valid API name.
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),
    /// Provided record id is not a 15- or 18-character identifier.
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}

/// API name of a remote object (`Account`, `My_Object__c`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ObjectName(String);

impl ObjectName {
    /// Validates an object API name: ASCII identifier characters only,
    /// starting with a letter.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, TypeConstraintError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let mut chars = name.chars();
        let head_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !head_ok || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TypeConstraintError::InvalidObjectName(name));
        }
        Ok(Self(name))
    }

    /// Borrow the name as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for ObjectName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ObjectName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ObjectName {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectName> for String {
    fn from(value: ObjectName) -> Self {
        value.0
    }
}

/// Identifier of a remote record, 15 (case-sensitive) or 18
/// (case-insensitive) alphanumeric characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Validates the id length and character set.
    pub fn new<S: Into<String>>(id: S) -> Result<Self, TypeConstraintError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        let len_ok = id.len() == 15 || id.len() == 18;
        if !len_ok || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TypeConstraintError::InvalidRecordId(id));
        }
        Ok(Self(id))
    }

    /// Borrow the id as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}
