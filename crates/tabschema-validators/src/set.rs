//! Set-membership validation.

use std::collections::HashSet;

use tabschema_core::{Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::stringify::stringify_set;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

/// Maximum number of allowed values quoted in a failure message.
const MESSAGE_SAMPLE_LEN: usize = 100;

/// Whether element order is part of the declared contract.
///
/// Both orderings check plain membership today. They stay distinct so a
/// column declared order-significant keeps that intent when list
/// semantics are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOrdering {
    Unordered,
    Ordered,
}

/// Validates that a field is one of a fixed set of values.
#[derive(Debug, Clone)]
pub struct SetValidator {
    options: HashSet<String>,
    ordering: SetOrdering,
    state: ValidatorState,
    invalid: HashSet<String>,
}

impl SetValidator {
    /// With `empty_ok`, the empty string joins the allowed set.
    pub fn new<I, S>(options: I, ordering: SetOrdering, config: &ValidatorConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options: HashSet<String> = options.into_iter().map(Into::into).collect();
        if config.empty_ok {
            options.insert(String::new());
        }
        Self {
            options,
            ordering,
            state: ValidatorState::new(config),
            invalid: HashSet::new(),
        }
    }

    pub fn options(&self) -> &HashSet<String> {
        &self.options
    }

    pub fn ordering(&self) -> SetOrdering {
        self.ordering
    }
}

impl Validator for SetValidator {
    fn kind(&self) -> ValidatorKind {
        match self.ordering {
            SetOrdering::Unordered => ValidatorKind::Set,
            SetOrdering::Ordered => ValidatorKind::List,
        }
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if self.options.contains(field) {
            return Ok(());
        }
        self.invalid.insert(field.to_string());
        let allowed = stringify_set(&self.options, MESSAGE_SAMPLE_LEN);
        Err(self.state.fail(field, format!("'{field}' is not in {allowed}")))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Values(&self.invalid)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.invalid.clear();
        self.state.reset();
    }
}
