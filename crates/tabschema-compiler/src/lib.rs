//! # tabschema-compiler — Schema Compilation & Row Validation
//!
//! Turns the parse tree of a schema-DSL document into executable,
//! per-entity validator chains, and runs rows through them.
//!
//! ## Dialects
//!
//! Three historical grammars share one compiler. The caller selects one
//! with [`Dialect`]:
//!
//! - [`Dialect::DirectColumns`]: `class`/`attribute`/`variable` blocks;
//!   each column carries its type validator only.
//! - [`Dialect::EntityAttributeComposed`]: entity-level attributes in
//!   `ent_attr` blocks, columns with composed validators and a visibility
//!   marker. Also yields the type schema and the attribute table.
//! - [`Dialect::TypedVisibilityGated`]: Spark-typed columns; only public
//!   columns compile. Also yields the type schema.
//!
//! ## Usage
//!
//! ```
//! use tabschema_compiler::{compile, Dialect, RowMode};
//! use tabschema_core::{ParseNode, Row};
//!
//! let tree: ParseNode = serde_json::from_value(serde_json::json!({
//!     "kind": "start",
//!     "children": [{"kind": "class", "children": [
//!         {"kind": "class_name", "children": ["users"]},
//!         {"kind": "attribute", "children": [{"kind": "variable", "children": [
//!             {"kind": "var", "children": ["id"]},
//!             {"kind": "type", "children": ["uuid"]}
//!         ]}]}
//!     ]}]
//! }))
//! .unwrap();
//!
//! let mut compiled = compile(&tree, Dialect::DirectColumns).unwrap();
//! let row: Row = [("id".to_string(), "not-a-uuid".to_string())].into();
//! let failures = compiled.schema.validate_row("users", &row, RowMode::CollectAll).unwrap();
//! assert_eq!(failures.len(), 1);
//! ```
//!
//! ## Crate Policy
//!
//! - Compilation is all-or-nothing; malformed blocks are named errors.
//! - Unknown type or attribute tokens are errors, never permissive
//!   defaults.

mod column;
pub mod compiler;
mod composed;
pub mod config;
mod direct;
pub mod error;
pub mod schema;
mod typed;

pub use compiler::{compile, Compiler, ROOT_KIND};
pub use config::{CompilerConfig, Dialect};
pub use error::{CompileError, ConfigError, SchemaError};
pub use schema::{
    Attribute, Column, ColumnShape, CompiledSchema, EntityAttributeTable, EntitySchema,
    EntityShape, FieldFailure, RowMode, Schema, TypeSchema, Visibility,
};
