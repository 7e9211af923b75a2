//! Error types shared by every fallible operation in the crate.

use thiserror::Error;

use crate::property::ValueType;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by setters, construction, and trace management.
///
/// Every error is local to the call that produced it; state is left exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A setter rejected its input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An entity or trace identifier is already taken.
    #[error("identifier `{0}` is already in use")]
    DuplicateId(String),
    /// No trace exists under the identifier.
    #[error("no trace with identifier `{0}`")]
    NotFound(String),
}

/// A property value failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for `{property}`: {kind}")]
pub struct ValidationError {
    /// Property key that was being set.
    pub property: String,
    /// What was wrong with the value.
    pub kind: ValidationKind,
}

impl ValidationError {
    pub(crate) fn new(property: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            property: property.into(),
            kind,
        }
    }
}

/// Reason a value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationKind {
    /// A value had the wrong primitive type.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// Declared type.
        expected: ValueType,
        /// Type that was supplied.
        found: String,
    },
    /// The number of supplied values does not fit the setter shape.
    #[error("expected {expected} value(s), found {found}")]
    WrongArity {
        /// Human readable description of the accepted arity.
        expected: String,
        /// Number of values supplied.
        found: usize,
    },
    /// The value is not one of the allowed choices.
    #[error("`{value}` is not one of [{allowed}]")]
    NotAChoice {
        /// Supplied value.
        value: String,
        /// Comma separated allowed values.
        allowed: String,
    },
    /// The entity has no property with this key.
    #[error("unknown property{}", suggestion.as_ref().map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default())]
    UnknownProperty {
        /// Closest known key, if any.
        suggestion: Option<String>,
    },
    /// The value violates a range or ordering constraint.
    #[error("{0}")]
    Constraint(String),
}

impl Error {
    /// Check whether this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
