//! Validation errors raised by value-type constructors.

use thiserror::Error;

/// A field failed its validity predicate at construction time.
///
/// The message is the human-readable constraint, meant to be shown verbatim
/// to the user by the command layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{constraint}")]
pub struct ValidationError {
    field: &'static str,
    constraint: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: &'static str) -> Self {
        Self { field, constraint }
    }

    /// Name of the field that was rejected (e.g. `"phone"`).
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The constraint the input violated.
    pub fn constraint(&self) -> &'static str {
        self.constraint
    }
}
