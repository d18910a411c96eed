//! # Compiler Error Types
//!
//! Every way a schema block can be malformed has its own variant, carrying
//! the entity and block position so the offending declaration can be found
//! in the source. Compilation never returns a partial schema.

use tabschema_core::{BadValidatorError, RegistryError, StructuralError};
use thiserror::Error;

/// Schema compilation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A `class`/`ent_attr` block has no usable class name.
    #[error("{kind} block #{block} is missing its class name")]
    MissingClassName {
        /// Node kind of the block (`class` or `ent_attr`).
        kind: String,
        /// Zero-based position among blocks of that kind.
        block: usize,
    },

    /// A column declaration lacks its name or its type.
    #[error(
        "column block #{block} of '{entity}' is missing its {field}{}",
        .name.as_ref().map(|n| format!(" (column '{n}')")).unwrap_or_default()
    )]
    MissingColumnField {
        /// Entity declaring the column.
        entity: String,
        /// Zero-based position among the entity's column declarations.
        block: usize,
        /// `"name"` or `"type"`.
        field: &'static str,
        /// The column name, when it was the type that was missing.
        name: Option<String>,
    },

    /// A validator/attribute block has no attribute name.
    #[error("validator block #{block} of '{entity}' is missing its attribute name")]
    MissingAttributeName {
        /// Entity (and column, when column-scoped) declaring the block.
        entity: String,
        /// Zero-based position among sibling validator blocks.
        block: usize,
    },

    /// Two blocks declare the same entity.
    #[error("entity '{entity}' is declared more than once")]
    DuplicateEntity {
        entity: String,
    },

    /// An entity declares the same column twice.
    #[error("column '{column}' is declared more than once in '{entity}'")]
    DuplicateColumn {
        entity: String,
        column: String,
    },

    /// An entity declares the same entity-level attribute twice.
    #[error("attribute '{attribute}' is declared more than once for '{entity}'")]
    DuplicateAttribute {
        entity: String,
        attribute: String,
    },

    /// A type or attribute token could not be turned into a validator.
    #[error("column '{entity}.{column}': {source}")]
    Registry {
        entity: String,
        column: String,
        #[source]
        source: RegistryError,
    },

    /// The tree does not have the expected overall shape.
    #[error("malformed parse tree: {0}")]
    Structural(#[from] StructuralError),
}

/// Applying a compiled schema to a row failed outright.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The schema has no entity of that name.
    #[error("unknown entity '{entity}'")]
    UnknownEntity {
        entity: String,
    },

    /// A validator is misconfigured for the row's shape.
    #[error("column '{entity}.{column}': {source}")]
    BadValidator {
        entity: String,
        column: String,
        #[source]
        source: BadValidatorError,
    },
}

/// Compiler configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML document did not parse into a configuration.
    #[error("invalid compiler config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
