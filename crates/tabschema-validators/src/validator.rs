//! # The Validator Contract
//!
//! Every validator is a small state machine. `validate` either accepts the
//! field or records it in the validator's own accumulator and returns an
//! error; `bad` exposes the accumulator for reporting.
//!
//! ## Lifecycle
//!
//! Instances are built once per validation pass. State accumulates across
//! every row of that pass (uniqueness needs to remember everything it has
//! seen). Running a second, independent dataset through the same instance
//! contaminates the results unless [`Validator::reset`] is called first.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tabschema_core::{Row, ValidationError, ValidatorError};

use crate::kind::ValidatorKind;

/// Construction-time options shared by every validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Let an empty field bypass the check (most validators honour this).
    #[serde(default)]
    pub empty_ok: bool,
    /// Free-form caller annotation, carried through to reports.
    #[serde(default)]
    pub meta: Option<String>,
    /// Positional options: length bound, allowed values, unique-with
    /// columns, pattern, range bounds.
    #[serde(default)]
    pub options: Vec<String>,
}

impl ValidatorConfig {
    pub fn with_empty_ok(mut self, empty_ok: bool) -> Self {
        self.empty_ok = empty_ok;
        self
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Bookkeeping common to all validators.
#[derive(Debug, Clone, Default)]
pub struct ValidatorState {
    fail_count: usize,
    empty_ok: bool,
    meta: Option<String>,
}

impl ValidatorState {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            fail_count: 0,
            empty_ok: config.empty_ok,
            meta: config.meta.clone(),
        }
    }

    pub fn fail_count(&self) -> usize {
        self.fail_count
    }

    pub fn empty_ok(&self) -> bool {
        self.empty_ok
    }

    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// True when `field` is empty and the validator lets empties through.
    pub fn skips(&self, field: &str) -> bool {
        field.is_empty() && self.empty_ok
    }

    /// Counts a failure and builds the error to return.
    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> ValidatorError {
        self.fail_count += 1;
        ValidationError::new(field, message).into()
    }

    pub fn reset(&mut self) {
        self.fail_count = 0;
    }
}

/// Read-only view of a validator's accumulated offenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bad<'a> {
    /// The validator never records anything.
    None,
    /// Whether any failure occurred.
    Flag(bool),
    /// Offending field values.
    Values(&'a HashSet<String>),
    /// Offending composite keys (field followed by unique-with values).
    Keys(&'a HashSet<Vec<String>>),
}

impl Bad<'_> {
    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        match self {
            Bad::None => true,
            Bad::Flag(failed) => !failed,
            Bad::Values(values) => values.is_empty(),
            Bad::Keys(keys) => keys.is_empty(),
        }
    }

    /// Number of distinct offenders (a raised flag counts as one).
    pub fn len(&self) -> usize {
        match self {
            Bad::None => 0,
            Bad::Flag(failed) => usize::from(*failed),
            Bad::Values(values) => values.len(),
            Bad::Keys(keys) => keys.len(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        match self {
            Bad::Values(values) => values.contains(field),
            Bad::Keys(keys) => keys.iter().any(|key| key.first().is_some_and(|f| f == field)),
            Bad::None | Bad::Flag(_) => false,
        }
    }
}

/// A validator applied to one column's fields.
///
/// Calls take `&mut self`: concurrent use of one instance is impossible
/// without external serialization.
pub trait Validator: fmt::Debug + Send {
    /// Which behaviour this instance implements.
    fn kind(&self) -> ValidatorKind;

    /// Checks `field`, with the whole `row` available for context.
    ///
    /// # Errors
    ///
    /// [`ValidatorError::Validation`] when the field breaks the rule (the
    /// offender is recorded first); [`ValidatorError::BadValidator`] when
    /// the validator is misconfigured for this row shape.
    fn validate(&mut self, field: &str, row: &Row) -> Result<(), ValidatorError>;

    /// The accumulated offenders.
    fn bad(&self) -> Bad<'_>;

    fn state(&self) -> &ValidatorState;

    /// Clears accumulated state so the instance can serve a new pass.
    /// Configuration is kept.
    fn reset(&mut self);

    fn fail_count(&self) -> usize {
        self.state().fail_count()
    }

    fn empty_ok(&self) -> bool {
        self.state().empty_ok()
    }

    fn meta(&self) -> Option<&str> {
        self.state().meta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts_failures() {
        let mut state = ValidatorState::new(&ValidatorConfig::default().with_meta("users.id"));
        let err = state.fail("x", "nope");
        assert!(err.is_validation());
        assert_eq!(state.fail_count(), 1);
        assert_eq!(state.meta(), Some("users.id"));
        state.reset();
        assert_eq!(state.fail_count(), 0);
    }

    #[test]
    fn test_skips_only_empty_when_allowed() {
        let strict = ValidatorState::new(&ValidatorConfig::default());
        let lenient = ValidatorState::new(&ValidatorConfig::default().with_empty_ok(true));
        assert!(!strict.skips(""));
        assert!(lenient.skips(""));
        assert!(!lenient.skips(" "));
    }

    #[test]
    fn test_bad_views() {
        let mut values = HashSet::new();
        assert!(Bad::Values(&values).is_empty());
        values.insert("C".to_string());
        let bad = Bad::Values(&values);
        assert_eq!(bad.len(), 1);
        assert!(bad.contains("C"));
        assert!(Bad::None.is_empty());
        assert_eq!(Bad::Flag(true).len(), 1);
        assert!(Bad::Flag(false).is_empty());
    }
}
