//! # Cast Validators
//!
//! A field passes when it converts to the target representation. Integer
//! casts also enforce a storage width: a value whose two's-complement
//! representation needs more bytes than the column allows fails even
//! though it parsed.

use std::collections::HashSet;
use std::num::IntErrorKind;

use chrono::{NaiveDate, NaiveDateTime};
use tabschema_core::{Row, ValidatorError};
use uuid::Uuid;

use crate::kind::ValidatorKind;
use crate::validator::{Bad, Validator, ValidatorConfig, ValidatorState};

/// Date fields are ISO dates followed by a literal `T`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT";

/// Timestamp fields carry fractional seconds and a `Z` suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const MAX_FRACTION_DIGITS: usize = 6;

/// Storage widths for integer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Tiny,
    Small,
    Int,
    Big,
}

impl IntWidth {
    /// Maximum number of bytes a value may need.
    pub fn bytes(self) -> u32 {
        match self {
            IntWidth::Tiny => 1,
            IntWidth::Small => 2,
            IntWidth::Int => 4,
            IntWidth::Big => 8,
        }
    }
}

/// Bytes required to store `n` as a signed integer:
/// `floor(log256(2·|n|)) + 1`, with zero needing one byte.
///
/// Computed on integers, so there is no floating-point rounding at the
/// powers of 256.
pub fn bytes_needed(n: i128) -> u32 {
    match n.unsigned_abs().checked_mul(2) {
        Some(0) => 1,
        // floor(log256(d)) == floor(log2(d)) / 8
        Some(doubled) => (127 - doubled.leading_zeros()) / 8 + 1,
        // 2·|i128::MIN| = 2^128
        None => 17,
    }
}

/// The conversion a [`CastValidator`] attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum Cast {
    /// Any text is a string.
    Str,
    Float,
    /// Base-16 integer with optional sign and `0x` prefix.
    Hex,
    Uuid,
    Date,
    Timestamp,
    Int(IntWidth),
    /// String no longer than `max_len` characters.
    Len { max_len: usize },
}

impl Cast {
    /// Attempts the conversion, describing the failure.
    fn apply(&self, field: &str) -> Result<(), String> {
        match self {
            Cast::Str => Ok(()),
            Cast::Float => strip_separators(field.trim(), char::is_ascii_digit)
                .and_then(|digits| digits.parse::<f64>().ok())
                .map(|_| ())
                .ok_or_else(|| format!("could not convert string to float: '{field}'")),
            Cast::Hex => {
                if is_hex_literal(field) {
                    Ok(())
                } else {
                    Err(format!("'{field}' is not a valid base-16 integer"))
                }
            }
            Cast::Uuid => parse_uuid(field)
                .map(|_| ())
                .ok_or_else(|| format!("'{field}' is not a valid UUID")),
            Cast::Date => check_date(field),
            Cast::Timestamp => check_timestamp(field),
            Cast::Int(width) => check_int(field, *width),
            Cast::Len { max_len } => {
                if field.chars().count() > *max_len {
                    Err(format!("'{field}' is longer than {max_len} characters"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn check_int(field: &str, width: IntWidth) -> Result<(), String> {
    let limit = width.bytes();
    let Some(digits) = strip_separators(field.trim(), char::is_ascii_digit) else {
        return Err(format!("invalid literal for int(): '{field}'"));
    };
    let needed = match digits.parse::<i128>() {
        Ok(n) => bytes_needed(n),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            17
        }
        Err(_) => return Err(format!("invalid literal for int(): '{field}'")),
    };
    if needed > limit {
        return Err(format!(
            "'{field}' needs {needed} bytes, exceeding the {limit}-byte limit"
        ));
    }
    Ok(())
}

fn is_hex_literal(field: &str) -> bool {
    let body = field.trim();
    let body = body.strip_prefix(['+', '-']).unwrap_or(body);
    let digits = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        // A separator may follow the base prefix: `0x_ff`.
        Some(rest) => rest.strip_prefix('_').unwrap_or(rest),
        None => body,
    };
    strip_separators(digits, char::is_ascii_hexdigit)
        .is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Removes `_` digit separators, each of which must sit between two digits
/// (`1_000`, `1e1_0`). Returns `None` for a misplaced separator.
fn strip_separators(text: &str, is_digit: fn(&char) -> bool) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if *c != '_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        if !(before.is_some_and(is_digit) && after.is_some_and(is_digit)) {
            return None;
        }
    }
    Some(text.replace('_', ""))
}

/// The year must be exactly four ASCII digits, unsigned.
fn check_year(field: &str, format: &str) -> Result<(), String> {
    let bytes = field.as_bytes();
    if bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-' {
        Ok(())
    } else {
        Err(format!("'{field}' does not match format '{format}': year must be four digits"))
    }
}

fn check_date(field: &str) -> Result<(), String> {
    check_year(field, DATE_FORMAT)?;
    NaiveDate::parse_from_str(field, DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| format!("'{field}' does not match format '{DATE_FORMAT}': {e}"))
}

/// `%.f` accepts no fraction and up to nine digits; timestamps need one to six.
fn check_timestamp(field: &str) -> Result<(), String> {
    check_year(field, TIMESTAMP_FORMAT)?;
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map_err(|e| format!("'{field}' does not match format '{TIMESTAMP_FORMAT}': {e}"))?;
    let fraction = field
        .strip_suffix('Z')
        .and_then(|rest| rest.rsplit_once('.'))
        .map(|(_, digits)| digits.len());
    match fraction {
        Some(1..=MAX_FRACTION_DIGITS) => Ok(()),
        Some(0) | None => Err(format!("'{field}' is missing fractional seconds")),
        Some(_) => Err(format!(
            "'{field}' has more than {MAX_FRACTION_DIGITS} fractional-second digits"
        )),
    }
}

/// Accepts the forms a UUID is commonly written in: braces, `urn:uuid:`
/// prefix, and hyphens in any position around 32 hex digits.
fn parse_uuid(field: &str) -> Option<Uuid> {
    let stripped = field.replace("urn:", "").replace("uuid:", "");
    let simple: String = stripped
        .trim_matches(|c| c == '{' || c == '}')
        .chars()
        .filter(|&c| c != '-')
        .collect();
    if simple.len() != 32 {
        return None;
    }
    Uuid::try_parse(&simple).ok()
}

/// Validates that a field can be cast to a target type.
#[derive(Debug, Clone)]
pub struct CastValidator {
    cast: Cast,
    state: ValidatorState,
    invalid: HashSet<String>,
}

impl CastValidator {
    pub fn new(cast: Cast, config: &ValidatorConfig) -> Self {
        Self {
            cast,
            state: ValidatorState::new(config),
            invalid: HashSet::new(),
        }
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }
}

impl Validator for CastValidator {
    fn kind(&self) -> ValidatorKind {
        match self.cast {
            Cast::Str => ValidatorKind::Str,
            Cast::Float => ValidatorKind::Float,
            Cast::Hex => ValidatorKind::Hex,
            Cast::Uuid => ValidatorKind::Uuid,
            Cast::Date => ValidatorKind::Date,
            Cast::Timestamp => ValidatorKind::Timestamp,
            Cast::Int(IntWidth::Tiny) => ValidatorKind::TinyInt,
            Cast::Int(IntWidth::Small) => ValidatorKind::SmallInt,
            Cast::Int(IntWidth::Int) => ValidatorKind::Int,
            Cast::Int(IntWidth::Big) => ValidatorKind::BigInt,
            Cast::Len { .. } => ValidatorKind::Len,
        }
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if self.state.skips(field) {
            return Ok(());
        }
        self.cast.apply(field).map_err(|message| {
            self.invalid.insert(field.to_string());
            self.state.fail(field, message)
        })
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
