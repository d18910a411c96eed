//! # Validator Kinds
//!
//! The closed set of behaviours a schema can ask for. Registry tokens
//! resolve to a `ValidatorKind`; the kind builds the boxed instance from a
//! [`ValidatorConfig`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tabschema_core::RegistryError;

use crate::cast::{Cast, CastValidator, IntWidth};
use crate::pattern::RegexValidator;
use crate::permissive::{PermissiveValidator, Placeholder};
use crate::presence::{EmptyValidator, NotEmptyValidator};
use crate::range::RangeValidator;
use crate::set::{SetOrdering, SetValidator};
use crate::unique::UniqueValidator;
use crate::validator::{Validator, ValidatorConfig};

/// Option value that switches a regex to full-field matching.
pub const FULL_MATCH_FLAG: &str = "full";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Str,
    Float,
    Hex,
    Uuid,
    Date,
    Timestamp,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Len,
    /// Set membership, order not significant.
    Set,
    /// Set membership, order significant.
    List,
    Unique,
    Regex,
    Range,
    Empty,
    NotEmpty,
    Ignore,
    Json,
    JsonSet,
    JsonList,
    Null,
}

impl ValidatorKind {
    pub fn name(self) -> &'static str {
        match self {
            ValidatorKind::Str => "str",
            ValidatorKind::Float => "float",
            ValidatorKind::Hex => "hex",
            ValidatorKind::Uuid => "uuid",
            ValidatorKind::Date => "date",
            ValidatorKind::Timestamp => "timestamp",
            ValidatorKind::TinyInt => "tiny_int",
            ValidatorKind::SmallInt => "small_int",
            ValidatorKind::Int => "int",
            ValidatorKind::BigInt => "big_int",
            ValidatorKind::Len => "len",
            ValidatorKind::Set => "set",
            ValidatorKind::List => "list",
            ValidatorKind::Unique => "unique",
            ValidatorKind::Regex => "regex",
            ValidatorKind::Range => "range",
            ValidatorKind::Empty => "empty",
            ValidatorKind::NotEmpty => "not_empty",
            ValidatorKind::Ignore => "ignore",
            ValidatorKind::Json => "json",
            ValidatorKind::JsonSet => "json_set",
            ValidatorKind::JsonList => "json_list",
            ValidatorKind::Null => "null",
        }
    }

    /// Builds a fresh instance.
    ///
    /// Kinds that take no options ignore `config.options`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidOptions`] when the options cannot configure
    /// the kind: `len` needs one non-negative integer, `range` two numbers
    /// with `low <= high`, `regex` a compilable pattern.
    pub fn build(self, config: &ValidatorConfig) -> Result<Box<dyn Validator>, RegistryError> {
        let cast =
            |cast: Cast| -> Box<dyn Validator> { Box::new(CastValidator::new(cast, config)) };
        let placeholder = |p: Placeholder| -> Box<dyn Validator> {
            Box::new(PermissiveValidator::new(p, config))
        };
        let validator: Box<dyn Validator> = match self {
            ValidatorKind::Str => cast(Cast::Str),
            ValidatorKind::Float => cast(Cast::Float),
            ValidatorKind::Hex => cast(Cast::Hex),
            ValidatorKind::Uuid => cast(Cast::Uuid),
            ValidatorKind::Date => cast(Cast::Date),
            ValidatorKind::Timestamp => cast(Cast::Timestamp),
            ValidatorKind::TinyInt => cast(Cast::Int(IntWidth::Tiny)),
            ValidatorKind::SmallInt => cast(Cast::Int(IntWidth::Small)),
            ValidatorKind::Int => cast(Cast::Int(IntWidth::Int)),
            ValidatorKind::BigInt => cast(Cast::Int(IntWidth::Big)),
            ValidatorKind::Len => cast(Cast::Len {
                max_len: self.max_len(&config.options)?,
            }),
            ValidatorKind::Set => Box::new(SetValidator::new(
                config.options.iter().cloned(),
                SetOrdering::Unordered,
                config,
            )),
            ValidatorKind::List => Box::new(SetValidator::new(
                config.options.iter().cloned(),
                SetOrdering::Ordered,
                config,
            )),
            ValidatorKind::Unique => Box::new(UniqueValidator::new(config.options.clone(), config)),
            ValidatorKind::Regex => Box::new(self.regex(config)?),
            ValidatorKind::Range => {
                let (low, high) = self.bounds(&config.options)?;
                Box::new(RangeValidator::new(low, high, config))
            }
            ValidatorKind::Empty => Box::new(EmptyValidator::new(config)),
            ValidatorKind::NotEmpty => Box::new(NotEmptyValidator::new(config)),
            ValidatorKind::Ignore => placeholder(Placeholder::Ignore),
            ValidatorKind::Json => placeholder(Placeholder::Json),
            ValidatorKind::JsonSet => placeholder(Placeholder::JsonSet),
            ValidatorKind::JsonList => placeholder(Placeholder::JsonList),
            ValidatorKind::Null => placeholder(Placeholder::Null),
        };
        Ok(validator)
    }

    fn invalid(self, reason: impl Into<String>) -> RegistryError {
        RegistryError::InvalidOptions {
            token: self.name().to_string(),
            reason: reason.into(),
        }
    }

    fn max_len(self, options: &[String]) -> Result<usize, RegistryError> {
        match options {
            [bound] => bound.trim().parse().map_err(|_| {
                self.invalid(format!(
                    "length bound '{bound}' is not a non-negative integer"
                ))
            }),
            _ => Err(self.invalid(format!(
                "expected exactly one length bound, got {}",
                options.len()
            ))),
        }
    }

    fn bounds(self, options: &[String]) -> Result<(f64, f64), RegistryError> {
        let [low, high] = options else {
            return Err(self.invalid(format!(
                "expected low and high bounds, got {} options",
                options.len()
            )));
        };
        let parse = |s: &String| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(format!("bound '{s}' is not a number")))
        };
        let (low, high) = (parse(low)?, parse(high)?);
        if !(low <= high) {
            return Err(self.invalid(format!("low bound {low} exceeds high bound {high}")));
        }
        Ok((low, high))
    }

    fn regex(self, config: &ValidatorConfig) -> Result<RegexValidator, RegistryError> {
        let (pattern, flags) = match config.options.split_first() {
            Some(split) => split,
            None => return Err(self.invalid("missing pattern")),
        };
        let full = match flags {
            [] => false,
            [flag] if flag == FULL_MATCH_FLAG => true,
            _ => return Err(self.invalid(format!("unexpected regex flags {flags:?}"))),
        };
        RegexValidator::new(pattern, full, config).map_err(|e| self.invalid(e.to_string()))
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabschema_core::Row;

    fn config(options: &[&str]) -> ValidatorConfig {
        ValidatorConfig::default().with_options(options.iter().copied())
    }

    #[test]
    fn test_built_instance_reports_its_kind() {
        for kind in [
            ValidatorKind::Str,
            ValidatorKind::BigInt,
            ValidatorKind::Set,
            ValidatorKind::List,
            ValidatorKind::Unique,
            ValidatorKind::NotEmpty,
            ValidatorKind::JsonList,
        ] {
            assert_eq!(kind.build(&ValidatorConfig::default()).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_len_requires_one_integer() {
        assert!(ValidatorKind::Len.build(&config(&["5"])).is_ok());
        assert!(ValidatorKind::Len.build(&config(&[])).is_err());
        assert!(ValidatorKind::Len.build(&config(&["5", "6"])).is_err());
        let err = ValidatorKind::Len.build(&config(&["five"])).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidOptions { ref token, .. } if token == "len"));
    }

    #[test]
    fn test_range_bounds() {
        let mut v = ValidatorKind::Range.build(&config(&["1", "3"])).unwrap();
        assert!(v.validate("2", &Row::new()).is_ok());
        assert!(ValidatorKind::Range.build(&config(&["3", "1"])).is_err());
        assert!(ValidatorKind::Range.build(&config(&["1"])).is_err());
    }

    #[test]
    fn test_regex_options() {
        let mut partial = ValidatorKind::Regex.build(&config(&["ab"])).unwrap();
        assert!(partial.validate("abc", &Row::new()).is_ok());
        let mut full = ValidatorKind::Regex.build(&config(&["ab", "full"])).unwrap();
        assert!(full.validate("abc", &Row::new()).is_err());
        assert!(ValidatorKind::Regex.build(&config(&[])).is_err());
        assert!(ValidatorKind::Regex.build(&config(&["("])).is_err());
    }

    #[test]
    fn test_set_options_become_allowed_values() {
        let mut v = ValidatorKind::Set.build(&config(&["A", "B"])).unwrap();
        assert!(v.validate("A", &Row::new()).is_ok());
        assert!(v.validate("C", &Row::new()).is_err());
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(ValidatorKind::NotEmpty.to_string(), "not_empty");
        assert_eq!(ValidatorKind::TinyInt.name(), "tiny_int");
    }
}
