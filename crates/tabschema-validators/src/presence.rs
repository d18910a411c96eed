//! Empty / non-empty validation. Neither honours `empty_ok`: emptiness is
//! the rule itself.

use std::collections::HashSet;

use tabschema_core::{Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

/// Validates that a field is always empty.
#[derive(Debug, Clone)]
pub struct EmptyValidator {
    state: ValidatorState,
    nonempty: HashSet<String>,
}

impl EmptyValidator {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            state: ValidatorState::new(config),
            nonempty: HashSet::new(),
        }
    }
}

impl Validator for EmptyValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Empty
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if field.is_empty() {
            return Ok(());
        }
        self.nonempty.insert(field.to_string());
        Err(self.state.fail(field, format!("'{field}' is not an empty string")))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Values(&self.nonempty)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.nonempty.clear();
        self.state.reset();
    }
}

/// Validates that a field is never empty. Only records whether a failure
/// happened, since the offending value is always `""`.
#[derive(Debug, Clone)]
pub struct NotEmptyValidator {
    state: ValidatorState,
    failed: bool,
}

impl NotEmptyValidator {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            state: ValidatorState::new(config),
            failed: false,
        }
    }
}

impl Validator for NotEmptyValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::NotEmpty
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if !field.is_empty() {
            return Ok(());
        }
        self.failed = true;
        Err(self.state.fail(field, "row has empty field in column"))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Flag(self.failed)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.failed = false;
        self.state.reset();
    }
}
