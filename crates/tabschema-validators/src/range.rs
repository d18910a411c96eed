//! Numeric range validation.

use std::collections::HashSet;

use tabschema_core::{Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

/// Validates that a field is a number within `[low, high]`.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    low: f64,
    high: f64,
    state: ValidatorState,
    outside: HashSet<String>,
}

impl RangeValidator {
    pub fn new(low: f64, high: f64, config: &ValidatorConfig) -> Self {
        Self {
            low,
            high,
            state: ValidatorState::new(config),
            outside: HashSet::new(),
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    fn contains(&self, field: &str) -> bool {
        field
            .trim()
            .parse::<f64>()
            .is_ok_and(|value| self.low <= value && value <= self.high)
    }
}

impl Validator for RangeValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Range
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if self.state.skips(field) || self.contains(field) {
            return Ok(());
        }
        self.outside.insert(field.to_string());
        let message = format!("'{field}' is not in range {} to {}", self.low, self.high);
        Err(self.state.fail(field, message))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Values(&self.outside)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.outside.clear();
        self.state.reset();
    }
}
