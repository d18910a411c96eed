//! Direct-columns dialect.
//!
//! ```text
//! start
//! └── class
//!     ├── class_name: NAME
//!     └── attribute
//!         └── variable
//!             ├── var: COLUMN
//!             └── type: TOKEN        (primary registry)
//! ```
//!
//! Each column's chain is just its type validator. A variable missing its
//! name or type fails compilation.

use tabschema_core::{FlatNode, RegistryNamespace};

use crate::column::ColumnSpec;
use crate::compiler::{class_name, CLASS};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::schema::{CompiledSchema, EntitySchema, Schema};

pub(crate) fn compile(
    root: &FlatNode,
    config: &CompilerConfig,
) -> Result<CompiledSchema, CompileError> {
    let mut schema = Schema::default();
    for (block, class) in root.children_of(CLASS).enumerate() {
        let entity_name = class_name(class, block)?;
        let mut entity = EntitySchema::new(entity_name);

        let variables = class
            .children_of("attribute")
            .flat_map(|attribute| attribute.children_of("variable"));
        for (index, variable) in variables.enumerate() {
            let column = ColumnSpec::require(
                entity_name,
                index,
                variable.leaf_of("var"),
                variable.leaf_of("type"),
                RegistryNamespace::Primary,
            )?
            .assemble(entity_name, config)?;
            entity.push(column)?;
        }

        tracing::debug!(entity = entity_name, columns = entity.columns().len(), "compiled entity");
        schema.insert(entity)?;
    }
    Ok(CompiledSchema {
        schema,
        types: None,
        entity_attributes: None,
    })
}
