//! # tabschema-core — Foundational Types
//!
//! This crate is the leaf of the tabschema workspace. It defines the types
//! shared by the validator library and the schema compiler.
//!
//! ## Key Design Principles
//!
//! 1. **Grammar-agnostic trees.** `ParseNode` is whatever the external
//!    grammar engine produced. `FlatNode` is its flattened, kind-keyed
//!    rendition. Neither type knows anything about schemas.
//!
//! 2. **One error hierarchy.** Per-field validation failures, validator
//!    misconfiguration, registry misses and structural tree errors are all
//!    distinct `thiserror` enums so callers can tell them apart.
//!
//! 3. **Rows are plain string maps.** A row is a mapping from column name
//!    to the raw field text. No coercion happens before validators run.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tabschema-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod tree;

use std::collections::HashMap;

pub use error::{
    BadValidatorError, RegistryError, RegistryNamespace, StructuralError, ValidationError,
    ValidatorError,
};
pub use tree::{flatten, FlatItem, FlatNode, ParseChild, ParseNode};

/// One record from the row source: column name → raw field value.
pub type Row = HashMap<String, String>;
