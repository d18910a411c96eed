//! # Compiled Schemas
//!
//! A [`Schema`] maps each entity to its columns in declaration order, and
//! each column to its validator chain. Chains run left to right; the
//! declared type's validator always comes first.
//!
//! ## Per-pass state
//!
//! Validators accumulate state while rows flow through them. A schema
//! therefore belongs to one validation pass over one dataset. Compile a
//! fresh schema per pass, or call [`Schema::reset`] between passes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tabschema_core::{BadValidatorError, Row, ValidationError, ValidatorError};
use tabschema_validators::{Validator, ValidatorKind};

use crate::error::{CompileError, SchemaError};

/// Entity → column → declared type token.
pub type TypeSchema = BTreeMap<String, BTreeMap<String, String>>;

/// Entity → attribute name → options, for constraints declared at entity
/// scope rather than on a single column.
pub type EntityAttributeTable = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// A named constraint with its positional options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub options: Vec<String>,
}

/// Declared column visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Maps a marker node kind to a visibility.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// One compiled column.
#[derive(Debug)]
pub struct Column {
    name: String,
    declared_type: String,
    validators: Vec<Box<dyn Validator>>,
    visibility: Option<Visibility>,
}

impl Column {
    pub(crate) fn new(
        name: String,
        declared_type: String,
        validators: Vec<Box<dyn Validator>>,
        visibility: Option<Visibility>,
    ) -> Self {
        Self {
            name,
            declared_type,
            validators,
            visibility,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Visibility as declared. Recorded only; it does not gate validation.
    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }

    pub fn validator_kinds(&self) -> Vec<ValidatorKind> {
        self.validators.iter().map(|v| v.kind()).collect()
    }

    /// Runs the chain over one field.
    ///
    /// Validation failures are collected (all of them, or only the first
    /// under [`RowMode::FailFast`]). A misconfigured validator aborts with
    /// `Err`.
    pub fn validate(
        &mut self,
        field: &str,
        row: &Row,
        mode: RowMode,
        failures: &mut Vec<FieldFailure>,
    ) -> Result<(), BadValidatorError> {
        for validator in &mut self.validators {
            match validator.validate(field, row) {
                Ok(()) => {}
                Err(ValidatorError::Validation(error)) => {
                    failures.push(FieldFailure {
                        column: self.name.clone(),
                        validator: Some(validator.kind()),
                        error,
                    });
                    if mode == RowMode::FailFast {
                        break;
                    }
                }
                Err(ValidatorError::BadValidator(err)) => return Err(err),
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        for validator in &mut self.validators {
            validator.reset();
        }
    }

    pub fn shape(&self) -> ColumnShape {
        ColumnShape {
            name: self.name.clone(),
            declared_type: self.declared_type.clone(),
            validators: self.validator_kinds(),
            visibility: self.visibility,
        }
    }
}

/// How much of a row to check once something fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMode {
    /// Run every validator of every column.
    #[default]
    CollectAll,
    /// Stop at the first failure in the row.
    FailFast,
}

/// One failed check within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub column: String,
    /// `None` when the row did not carry the column at all.
    pub validator: Option<ValidatorKind>,
    pub error: ValidationError,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.validator {
            Some(kind) => write!(f, "{} [{kind}]: {}", self.column, self.error),
            None => write!(f, "{}: {}", self.column, self.error),
        }
    }
}

/// The columns of one entity, in declaration order.
#[derive(Debug)]
pub struct EntitySchema {
    name: String,
    columns: Vec<Column>,
}

impl EntitySchema {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, column: Column) -> Result<(), CompileError> {
        if self.column(column.name()).is_some() {
            return Err(CompileError::DuplicateColumn {
                entity: self.name.clone(),
                column: column.name,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Validates every declared column of `row`.
    ///
    /// A declared column missing from the row is reported as a failure of
    /// that column. Row fields with no declared column are not checked.
    ///
    /// # Errors
    ///
    /// [`SchemaError::BadValidator`] when a validator is misconfigured for
    /// the row's shape. The rest of the row is not checked.
    pub fn validate_row(
        &mut self,
        row: &Row,
        mode: RowMode,
    ) -> Result<Vec<FieldFailure>, SchemaError> {
        let mut failures = Vec::new();
        for column in &mut self.columns {
            if mode == RowMode::FailFast && !failures.is_empty() {
                break;
            }
            let Some(field) = row.get(&column.name) else {
                failures.push(FieldFailure {
                    column: column.name.clone(),
                    validator: None,
                    error: ValidationError::new(
                        "",
                        format!("column '{}' missing from row", column.name),
                    ),
                });
                continue;
            };
            if let Err(source) = column.validate(field, row, mode, &mut failures) {
                return Err(SchemaError::BadValidator {
                    entity: self.name.clone(),
                    column: column.name.clone(),
                    source,
                });
            }
        }
        Ok(failures)
    }

    pub fn reset(&mut self) {
        self.columns.iter_mut().for_each(Column::reset);
    }

    pub fn shape(&self) -> EntityShape {
        EntityShape {
            name: self.name.clone(),
            columns: self.columns.iter().map(Column::shape).collect(),
        }
    }
}

/// Entity name → ordered column chains.
#[derive(Debug, Default)]
pub struct Schema {
    entities: Vec<EntitySchema>,
}

impl Schema {
    pub(crate) fn insert(&mut self, entity: EntitySchema) -> Result<(), CompileError> {
        if self.entity(entity.name()).is_some() {
            return Err(CompileError::DuplicateEntity {
                entity: entity.name,
            });
        }
        self.entities.push(entity);
        Ok(())
    }

    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut EntitySchema> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Validates `row` against the named entity.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownEntity`] for an undeclared entity;
    /// [`SchemaError::BadValidator`] as for [`EntitySchema::validate_row`].
    pub fn validate_row(
        &mut self,
        entity: &str,
        row: &Row,
        mode: RowMode,
    ) -> Result<Vec<FieldFailure>, SchemaError> {
        self.entity_mut(entity)
            .ok_or_else(|| SchemaError::UnknownEntity {
                entity: entity.to_string(),
            })?
            .validate_row(row, mode)
    }

    /// Clears all accumulated validator state.
    pub fn reset(&mut self) {
        self.entities.iter_mut().for_each(EntitySchema::reset);
    }

    /// Structural description: names, types and validator kinds in order.
    /// Two compilations of the same tree have equal shapes.
    pub fn shape(&self) -> Vec<EntityShape> {
        self.entities.iter().map(EntitySchema::shape).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnShape {
    pub name: String,
    pub declared_type: String,
    pub validators: Vec<ValidatorKind>,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityShape {
    pub name: String,
    pub columns: Vec<ColumnShape>,
}

/// Everything a compilation produces.
#[derive(Debug)]
pub struct CompiledSchema {
    pub schema: Schema,
    /// Declared type per column; present for the composed and typed dialects.
    pub types: Option<TypeSchema>,
    /// Entity-level attributes; present for the composed dialect.
    pub entity_attributes: Option<EntityAttributeTable>,
}
