//! # Uniqueness Validation
//!
//! A field must not repeat within one validation pass. With `unique_with`
//! the uniqueness key becomes the tuple `(field, row[w₀], row[w₁], …)`.
//!
//! The first row seen triggers a one-time check that every `unique_with`
//! column exists in the row. A missing column is a schema/data mismatch
//! and is reported as [`BadValidatorError`], never as a per-row failure.

use std::collections::HashSet;

use tabschema_core::{BadValidatorError, Row, ValidatorError};

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

#[derive(Debug, Clone)]
pub struct UniqueValidator {
    unique_with: Vec<String>,
    state: ValidatorState,
    seen: HashSet<Vec<String>>,
    duplicates: HashSet<Vec<String>>,
    prechecked: bool,
}

impl UniqueValidator {
    pub fn new(unique_with: Vec<String>, config: &ValidatorConfig) -> Self {
        Self {
            unique_with,
            state: ValidatorState::new(config),
            seen: HashSet::new(),
            duplicates: HashSet::new(),
            prechecked: false,
        }
    }

    pub fn unique_with(&self) -> &[String] {
        &self.unique_with
    }

    fn missing_columns(&self, row: &Row) -> Vec<String> {
        let mut missing: Vec<String> = self
            .unique_with
            .iter()
            .filter(|column| !row.contains_key(column.as_str()))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    fn precheck(&mut self, row: &Row) -> Result<(), BadValidatorError> {
        let missing = self.missing_columns(row);
        if !missing.is_empty() {
            tracing::warn!(
                meta = self.state.meta().unwrap_or_default(),
                missing = ?missing,
                "unique_with columns absent from row"
            );
            return Err(BadValidatorError::MissingUniqueWith { columns: missing });
        }
        self.prechecked = true;
        Ok(())
    }

    fn key(&self, field: &str, row: &Row) -> Result<Vec<String>, BadValidatorError> {
        let mut key = Vec::with_capacity(self.unique_with.len() + 1);
        key.push(field.to_string());
        for column in &self.unique_with {
            match row.get(column) {
                Some(value) => key.push(value.clone()),
                None => {
                    return Err(BadValidatorError::MissingUniqueWith {
                        columns: self.missing_columns(row),
                    })
                }
            }
        }
        Ok(key)
    }
}

/// Renders the unique-with part of a key as a tuple: `('1', '2')`, or
/// `('1',)` for a single value.
fn render_companions(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    match quoted.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", quoted.join(", ")),
    }
}

impl Validator for UniqueValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Unique
    }

    fn validate(&mut self, field: &str, row: &Row) -> Result<(), ValidatorError> {
        if self.state.skips(field) {
            return Ok(());
        }
        if !self.unique_with.is_empty() && !self.prechecked {
            self.precheck(row)?;
        }

        let key = self.key(field, row)?;
        if !self.seen.contains(&key) {
            self.seen.insert(key);
            return Ok(());
        }

        let message = if self.unique_with.is_empty() {
            format!("'{field}' is already in the column")
        } else {
            format!(
                "'{field}' is already in the column (unique with: {})",
                render_companions(&key[1..])
            )
        };
        self.duplicates.insert(key);
        Err(self.state.fail(field, message))
    }

    fn bad(&self) -> Bad<'_> {
        Bad::Keys(&self.duplicates)
    }

    fn state(&self) -> &ValidatorState {
        &self.state
    }

    fn reset(&mut self) {
        self.seen.clear();
        self.duplicates.clear();
        self.prechecked = false;
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_duplicates() {
        let mut v = UniqueValidator::new(vec![], &ValidatorConfig::default());
        let r = Row::new();
        assert!(v.validate("x", &r).is_ok());
        assert!(v.validate("y", &r).is_ok());
        let err = v.validate("x", &r).unwrap_err();
        assert_eq!(err.to_string(), "validation failed: 'x' is already in the column");
        assert!(v.bad().contains("x"));
        assert_eq!(v.bad().len(), 1);
    }

    #[test]
    fn test_composite_key() {
        let mut v = UniqueValidator::new(vec!["b".into()], &ValidatorConfig::default());
        assert!(v.validate("x", &row(&[("a", "x"), ("b", "1")])).is_ok());
        let err = v.validate("x", &row(&[("a", "x"), ("b", "1")])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("(unique with: ('1',))"), "{err}");
        assert!(v.validate("x", &row(&[("a", "x"), ("b", "2")])).is_ok());
    }

    #[test]
    fn test_companions_render_as_tuples() {
        assert_eq!(render_companions(&["1".into()]), "('1',)");
        assert_eq!(render_companions(&["1".into(), "2".into()]), "('1', '2')");
    }

    #[test]
    fn test_missing_unique_with_is_bad_validator() {
        let mut v = UniqueValidator::new(vec!["missing_col".into()], &ValidatorConfig::default());
        let err = v.validate("x", &row(&[("a", "x")])).unwrap_err();
        assert_eq!(
            err,
            ValidatorError::BadValidator(BadValidatorError::MissingUniqueWith {
                columns: vec!["missing_col".into()],
            })
        );
        assert_eq!(v.fail_count(), 0);
    }

    #[test]
    fn test_precheck_runs_once() {
        let mut v = UniqueValidator::new(vec!["b".into()], &ValidatorConfig::default());
        assert!(v.validate("x", &row(&[("b", "1")])).is_ok());
        assert!(v.prechecked);
        // A later malformed row still cannot panic.
        let err = v.validate("y", &row(&[])).unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn test_empty_ok_skips_empties() {
        let mut v = UniqueValidator::new(vec![], &ValidatorConfig::default().with_empty_ok(true));
        assert!(v.validate("", &Row::new()).is_ok());
        assert!(v.validate("", &Row::new()).is_ok());
    }

    #[test]
    fn test_reset_forgets_seen_values() {
        let mut v = UniqueValidator::new(vec![], &ValidatorConfig::default());
        assert!(v.validate("x", &Row::new()).is_ok());
        v.reset();
        assert!(v.validate("x", &Row::new()).is_ok());
        assert!(v.bad().is_empty());
    }
}
