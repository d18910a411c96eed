//! Entity-attribute + validator composition dialect.
//!
//! ```text
//! start
//! ├── ent_attr
//! │   ├── class_name: NAME
//! │   └── validator*
//! │       ├── name: ATTRIBUTE
//! │       └── option*: VALUE…
//! └── class
//!     ├── class_name: NAME
//!     └── column*
//!         ├── name: COLUMN
//!         ├── type
//!         │   └── TYPE_TOKEN          (node kind; primary registry)
//!         ├── validator*              (as above; primary registry)
//!         └── visibility
//!             └── public | private
//! ```
//!
//! Two passes: entity-level attributes go into the attribute table; columns
//! become chains headed by their type validator. Visibility is recorded on
//! the column but never filters anything.

use std::collections::btree_map::Entry;

use tabschema_core::{FlatNode, RegistryNamespace};

use crate::column::ColumnSpec;
use crate::compiler::{class_name, parse_attribute, CLASS, VALIDATOR};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::schema::{
    CompiledSchema, EntityAttributeTable, EntitySchema, Schema, TypeSchema, Visibility,
};

const ENT_ATTR: &str = "ent_attr";

pub(crate) fn compile(
    root: &FlatNode,
    config: &CompilerConfig,
) -> Result<CompiledSchema, CompileError> {
    let entity_attributes = entity_attributes(root)?;

    let mut schema = Schema::default();
    let mut types = TypeSchema::new();
    for (block, class) in root.children_of(CLASS).enumerate() {
        let entity_name = class_name(class, block)?;
        let mut entity = EntitySchema::new(entity_name);
        let entity_types = types.entry(entity_name.to_string()).or_default();

        for (index, column) in class.children_of("column").enumerate() {
            let declared_type = column
                .child("type")
                .and_then(FlatNode::first_node)
                .map(FlatNode::kind);
            let spec = ColumnSpec::require(
                entity_name,
                index,
                column.leaf_of("name"),
                declared_type,
                RegistryNamespace::Primary,
            )?;
            let owner = format!("{entity_name}.{}", spec.name);
            let validators = column
                .children_of(VALIDATOR)
                .enumerate()
                .map(|(i, block)| parse_attribute(block, &owner, i))
                .collect::<Result<Vec<_>, _>>()?;
            let visibility = column
                .child("visibility")
                .and_then(FlatNode::first_node)
                .and_then(|marker| Visibility::from_marker(marker.kind()));

            let column = spec
                .with_validators(validators)
                .with_visibility(visibility)
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
        entity_attributes: Some(entity_attributes),
    })
}

/// First pass: `ent_attr` blocks into entity → attribute → options.
fn entity_attributes(root: &FlatNode) -> Result<EntityAttributeTable, CompileError> {
    let mut table = EntityAttributeTable::new();
    for (block, ent_attr) in root.children_of(ENT_ATTR).enumerate() {
        let entity_name = class_name(ent_attr, block)?;
        let attributes = table.entry(entity_name.to_string()).or_default();
        for (index, validator) in ent_attr.children_of(VALIDATOR).enumerate() {
            let attribute = parse_attribute(validator, entity_name, index)?;
            match attributes.entry(attribute.name) {
                Entry::Vacant(slot) => {
                    slot.insert(attribute.options);
                }
                Entry::Occupied(slot) => {
                    return Err(CompileError::DuplicateAttribute {
                        entity: entity_name.to_string(),
                        attribute: slot.key().clone(),
                    })
                }
            }
        }
    }
    Ok(table)
}
