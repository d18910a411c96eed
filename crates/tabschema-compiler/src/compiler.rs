//! # Schema Compiler
//!
//! Entry point and the extraction helpers every dialect shares.
//!
//! ```text
//! ParseNode ──flatten──▶ FlatNode ──dialect──▶ ColumnSpec*
//!                                               └──assemble──▶ CompiledSchema
//! ```
//!
//! The caller picks the dialect. Compilation is all-or-nothing: the first
//! malformed block aborts it and no partial schema escapes.

use tabschema_core::{flatten, FlatNode, ParseChild, ParseNode, StructuralError};

use crate::config::{CompilerConfig, Dialect};
use crate::error::CompileError;
use crate::schema::{Attribute, CompiledSchema};
use crate::{composed, direct, typed};

/// Node kind every tree must have at its root.
pub const ROOT_KIND: &str = "start";

pub(crate) const CLASS: &str = "class";
pub(crate) const CLASS_NAME: &str = "class_name";
pub(crate) const VALIDATOR: &str = "validator";
pub(crate) const OPTION: &str = "option";

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles a parse tree under the configured dialect.
    ///
    /// # Errors
    ///
    /// Any [`CompileError`]; see the dialect modules for which block
    /// shapes produce which variant.
    pub fn compile(&self, tree: &ParseNode) -> Result<CompiledSchema, CompileError> {
        self.compile_flat(&tree.flatten())
    }

    /// As [`Compiler::compile`], for a tree item that may be a bare token.
    pub fn compile_item(&self, item: &ParseChild) -> Result<CompiledSchema, CompileError> {
        self.compile_flat(&flatten(item)?)
    }

    fn compile_flat(&self, root: &FlatNode) -> Result<CompiledSchema, CompileError> {
        if root.kind() != ROOT_KIND {
            return Err(StructuralError::UnexpectedRoot {
                expected: ROOT_KIND.to_string(),
                found: root.kind().to_string(),
            }
            .into());
        }
        let compiled = match self.config.dialect {
            Dialect::DirectColumns => direct::compile(root, &self.config)?,
            Dialect::EntityAttributeComposed => composed::compile(root, &self.config)?,
            Dialect::TypedVisibilityGated => typed::compile(root, &self.config)?,
        };
        tracing::debug!(
            dialect = ?self.config.dialect,
            entities = compiled.schema.len(),
            "schema compiled"
        );
        Ok(compiled)
    }
}

/// Compiles `tree` under `dialect` with default settings.
pub fn compile(tree: &ParseNode, dialect: Dialect) -> Result<CompiledSchema, CompileError> {
    Compiler::new(CompilerConfig::new(dialect)).compile(tree)
}

/// The non-empty class name of a `class`/`ent_attr` block.
pub(crate) fn class_name(block: &FlatNode, index: usize) -> Result<&str, CompileError> {
    block
        .leaf_of(CLASS_NAME)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CompileError::MissingClassName {
            kind: block.kind().to_string(),
            block: index,
        })
}

/// Reads a `validator` block: `[name:[ATTR], option:[OPT…]…]`.
///
/// The attribute name may also be given as the block's first bare token.
/// Options from every `option` child are concatenated in order.
pub(crate) fn parse_attribute(
    block: &FlatNode,
    owner: &str,
    index: usize,
) -> Result<Attribute, CompileError> {
    let name = block
        .leaf_of("name")
        .or_else(|| block.first_leaf())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CompileError::MissingAttributeName {
            entity: owner.to_string(),
            block: index,
        })?;
    let options = block
        .children_of(OPTION)
        .flat_map(FlatNode::leaves)
        .map(str::to_string)
        .collect();
    Ok(Attribute {
        name: name.to_string(),
        options,
    })
}
