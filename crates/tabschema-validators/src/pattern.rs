//! Regular-expression validation.
//!
//! Matching is anchored at the start of the field. A partial match accepts
//! any field with a matching prefix; a full match must consume the whole
//! field.

use std::collections::HashSet;

use regex::Regex;
use tabschema_core::{Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: String,
    full: bool,
    regex: Regex,
    state: ValidatorState,
    failures: HashSet<String>,
}

impl RegexValidator {
    /// # Errors
    ///
    /// Returns the regex crate's error when `pattern` does not compile.
    pub fn new(pattern: &str, full: bool, config: &ValidatorConfig) -> Result<Self, regex::Error> {
        let anchored = if full {
            format!(r"\A(?:{pattern})\z")
        } else {
            format!(r"\A(?:{pattern})")
        };
        Ok(Self {
            pattern: pattern.to_string(),
            full,
            regex: Regex::new(&anchored)?,
            state: ValidatorState::new(config),
            failures: HashSet::new(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_full(&self) -> bool {
        self.full
    }
}

impl Validator for RegexValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Regex
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if self.regex.is_match(field) || self.state.skips(field) {
            return Ok(());
        }
        self.failures.insert(field.to_string());
        let message = format!("'{field}' does not match pattern /{}/", self.pattern);
        Err(self.state.fail(field, message))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Values(&self.failures)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.failures.clear();
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(pattern: &str, full: bool) -> RegexValidator {
        RegexValidator::new(pattern, full, &ValidatorConfig::default()).unwrap()
    }

    #[test]
    fn test_partial_match_is_prefix_anchored() {
        let mut v = regex("ab", false);
        let row = Row::new();
        assert!(v.validate("abc", &row).is_ok());
        assert!(v.validate("cab", &row).is_err());
        assert!(v.bad().contains("cab"));
    }

    #[test]
    fn test_full_match() {
        let mut v = regex("ab", true);
        let row = Row::new();
        assert!(v.validate("ab", &row).is_ok());
        let err = v.validate("abc", &row).unwrap_err();
        assert_eq!(err.to_string(), "validation failed: 'abc' does not match pattern /ab/");
    }

    #[test]
    fn test_full_match_groups_alternation() {
        let mut v = regex("a|ab", true);
        assert!(v.validate("ab", &Row::new()).is_ok());
    }

    #[test]
    fn test_empty_ok() {
        let mut strict = regex("[0-9]+", false);
        assert!(strict.validate("", &Row::new()).is_err());
        let mut lenient =
            RegexValidator::new("[0-9]+", false, &ValidatorConfig::default().with_empty_ok(true))
                .unwrap();
        assert!(lenient.validate("", &Row::new()).is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexValidator::new("(", false, &ValidatorConfig::default()).is_err());
    }
}
