//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation failures are recoverable and always carry the offending
//!   field value.
//! - Validator misuse (e.g. a composite-unique column the row does not
//!   have) is a distinct, fatal error kind.
//! - Registry misses name the namespace and the unknown token.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field violated a validator's rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The raw field value that failed.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validator was used against data it was not configured for.
///
/// Not recoverable mid-pass: the schema is malformed relative to the
/// shape of the data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadValidatorError {
    /// `unique_with` names columns the row does not carry.
    #[error("unique_with columns missing from row: {}", .columns.join(", "))]
    MissingUniqueWith {
        /// The missing column names, sorted.
        columns: Vec<String>,
    },
}

/// Outcome of a failed `Validator::validate` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// The field failed the rule.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The validator itself is misconfigured for this data.
    #[error("bad validator: {0}")]
    BadValidator(#[from] BadValidatorError),
}

impl ValidatorError {
    /// Returns true for the recoverable, per-field kind.
    pub fn is_validation(&self) -> bool {
        matches!(self, ValidatorError::Validation(_))
    }
}

/// The parse tree did not have the shape a routine requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A bare token was handed to the flattener instead of a node.
    #[error("unexpected leaf at tree root: {token:?}")]
    LeafAtRoot {
        /// The offending token text.
        token: String,
    },

    /// The root node is not of the expected kind.
    #[error("expected root node '{expected}', found '{found}'")]
    UnexpectedRoot {
        /// Kind the compiler expects at the root.
        expected: String,
        /// Kind actually found.
        found: String,
    },
}

/// The two token vocabularies a registry lookup may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryNamespace {
    /// Schema DSL types and attribute names.
    Primary,
    /// Alternate (Spark-style) base types.
    Secondary,
}

impl fmt::Display for RegistryNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryNamespace::Primary => write!(f, "primary"),
            RegistryNamespace::Secondary => write!(f, "secondary"),
        }
    }
}

/// Registry lookup or validator construction failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The token is not part of the namespace's vocabulary.
    #[error("unknown {namespace} token '{token}'")]
    UnknownToken {
        /// Namespace that was searched.
        namespace: RegistryNamespace,
        /// The unrecognized token.
        token: String,
    },

    /// The token is known but its options cannot configure the validator.
    #[error("invalid options for '{token}': {reason}")]
    InvalidOptions {
        /// Token whose validator rejected the options.
        token: String,
        /// Why the options were rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_displays_message_only() {
        let err = ValidationError::new("x", "'x' is not an empty string");
        assert_eq!(err.to_string(), "'x' is not an empty string");
        assert_eq!(err.field, "x");
    }

    #[test]
    fn test_bad_validator_lists_columns() {
        let err = BadValidatorError::MissingUniqueWith {
            columns: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "unique_with columns missing from row: a, b");
    }

    #[test]
    fn test_validator_error_kind() {
        let v: ValidatorError = ValidationError::new("", "empty").into();
        assert!(v.is_validation());
        let b: ValidatorError = BadValidatorError::MissingUniqueWith { columns: vec![] }.into();
        assert!(!b.is_validation());
    }

    #[test]
    fn test_unknown_token_names_namespace() {
        let err = RegistryError::UnknownToken {
            namespace: RegistryNamespace::Secondary,
            token: "varchar".into(),
        };
        assert_eq!(err.to_string(), "unknown secondary token 'varchar'");
    }
}
