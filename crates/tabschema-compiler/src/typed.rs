//! Typed, visibility-gated dialect.
//!
//! ```text
//! start
//! └── class
//!     ├── class_name: NAME
//!     └── column*
//!         ├── name: COLUMN
//!         ├── type: SPARK_TYPE        (secondary registry)
//!         ├── option*: VALUE          (de-duplicated)
//!         ├── validator?: TOKEN       (primary registry, configured by the options)
//!         └── public?
//! ```
//!
//! Only columns carrying the `public` marker are compiled. Private columns
//! must still be well formed (name and type present) but are dropped
//! before any validator is built.

use tabschema_core::{FlatNode, RegistryNamespace};

use crate::column::ColumnSpec;
use crate::compiler::{class_name, CLASS, OPTION, VALIDATOR};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::schema::{Attribute, CompiledSchema, EntitySchema, Schema, TypeSchema, Visibility};

const PUBLIC: &str = "public";

pub(crate) fn compile(
    root: &FlatNode,
    config: &CompilerConfig,
) -> Result<CompiledSchema, CompileError> {
    let mut schema = Schema::default();
    let mut types = TypeSchema::new();
    for (block, class) in root.children_of(CLASS).enumerate() {
        let entity_name = class_name(class, block)?;
        let mut entity = EntitySchema::new(entity_name);
        let entity_types = types.entry(entity_name.to_string()).or_default();

        for (index, column) in class.children_of("column").enumerate() {
            let spec = ColumnSpec::require(
                entity_name,
                index,
                column.leaf_of("name"),
                column.leaf_of("type"),
                RegistryNamespace::Secondary,
            )?;
            if !is_public(column) {
                tracing::debug!(
                    entity = entity_name,
                    column = %spec.name,
                    "dropping private column"
                );
                continue;
            }

            let validators = column
                .leaf_of(VALIDATOR)
                .filter(|name| !name.is_empty())
                .map(|name| Attribute {
                    name: name.to_string(),
                    options: options(column),
                })
                .into_iter()
                .collect();
            let column = spec
                .with_validators(validators)
                .with_visibility(Some(Visibility::Public))
                .assemble(entity_name, config)?;
            entity_types.insert(column.name().to_string(), column.declared_type().to_string());
            entity.push(column)?;
        }

        tracing::debug!(entity = entity_name, columns = entity.columns().len(), "compiled entity");
        schema.insert(entity)?;
    }

    Ok(CompiledSchema {
        schema,
        types: Some(types),
        entity_attributes: None,
    })
}

/// A `public` child node, or a bare `public` token.
fn is_public(column: &FlatNode) -> bool {
    column.child(PUBLIC).is_some() || column.leaves().any(|token| token == PUBLIC)
}

/// Option values with duplicates removed, first occurrence kept.
fn options(column: &FlatNode) -> Vec<String> {
    let mut seen = Vec::new();
    for value in column.children_of(OPTION).flat_map(FlatNode::leaves) {
        if !seen.iter().any(|s: &String| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
