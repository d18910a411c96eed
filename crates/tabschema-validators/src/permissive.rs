//! Validators that never fail.
//!
//! They reserve a type slot in a column's chain (JSON payloads, nulls,
//! columns flagged as not warehoused) without enforcing anything.

use tabschema_core::{Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

/// Which placeholder a [`PermissiveValidator`] stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Ignore,
    Json,
    /// JSON array whose item order is irrelevant.
    JsonSet,
    /// JSON array whose item order matters.
    JsonList,
    Null,
}

#[derive(Debug, Clone)]
pub struct PermissiveValidator {
    placeholder: Placeholder,
    state: ValidatorState,
}

impl PermissiveValidator {
    pub fn new(placeholder: Placeholder, config: &ValidatorConfig) -> Self {
        Self {
            placeholder,
            state: ValidatorState::new(config),
        }
    }

    pub fn ignore() -> Self {
        Self::new(Placeholder::Ignore, &ValidatorConfig::default())
    }
}

impl Validator for PermissiveValidator {
    fn kind(&self) -> ValidatorKind {
        match self.placeholder {
            Placeholder::Ignore => ValidatorKind::Ignore,
            Placeholder::Json => ValidatorKind::Json,
            Placeholder::JsonSet => ValidatorKind::JsonSet,
            Placeholder::JsonList => ValidatorKind::JsonList,
            Placeholder::Null => ValidatorKind::Null,
        }
    }

    fn validate(&mut self, _field: &str, _row: &Row) -> Result<(), ValidatorError> {
        Ok(())
    }

    fn bad(&self) -> Bad<'_> {
        Bad::None
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {}
}
