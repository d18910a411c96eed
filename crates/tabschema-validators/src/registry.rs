//! # Validator Registry
//!
//! Static, read-only token tables. The primary namespace covers schema-DSL
//! types and attribute names; the secondary namespace covers the
//! Spark-style base types used by the typed dialect.
//!
//! Several tokens alias one kind (`uuid`/`key`, the `Ignore` family). The
//! `set`/`list` pair resolve to distinct kinds on purpose: both check
//! membership today, but `list` declares that order matters.
//!
//! Lookups never fall back to a permissive validator. An unknown token is
//! a [`RegistryError::UnknownToken`].

use tabschema_core::{RegistryError, RegistryNamespace};

use crate::kind::ValidatorKind;
use crate::validator::{Validator, ValidatorConfig};

const PRIMARY: &[(&str, ValidatorKind)] = &[
    ("deident", ValidatorKind::Int),
    ("from", ValidatorKind::Int),
    ("tenant_id", ValidatorKind::Int),
    ("softdelete", ValidatorKind::Str),
    ("created_at", ValidatorKind::Timestamp),
    ("len", ValidatorKind::Len),
    ("key", ValidatorKind::Uuid),
    ("nodwh", ValidatorKind::Ignore),
    ("nostaging", ValidatorKind::Ignore),
    ("nocompare", ValidatorKind::Ignore),
    ("deprecated", ValidatorKind::Ignore),
    ("size", ValidatorKind::Ignore),
    ("mode", ValidatorKind::Ignore),
    ("changes", ValidatorKind::Ignore),
    ("deletion", ValidatorKind::Ignore),
    ("uuid", ValidatorKind::Uuid),
    ("decimal", ValidatorKind::Int),
    ("tinyint", ValidatorKind::TinyInt),
    ("smallint", ValidatorKind::SmallInt),
    ("bigint", ValidatorKind::BigInt),
    ("hex", ValidatorKind::Hex),
    ("float", ValidatorKind::Float),
    ("date", ValidatorKind::Date),
    ("json", ValidatorKind::Json),
    ("str", ValidatorKind::Str),
    ("regexp", ValidatorKind::Regex),
    ("null", ValidatorKind::Null),
    ("json_set", ValidatorKind::JsonSet),
    ("json_list", ValidatorKind::JsonList),
    ("set", ValidatorKind::Set),
    ("list", ValidatorKind::List),
    ("unique", ValidatorKind::Unique),
    ("range", ValidatorKind::Range),
    ("empty", ValidatorKind::Empty),
    ("not_empty", ValidatorKind::NotEmpty),
];

const SECONDARY: &[(&str, ValidatorKind)] = &[
    ("string", ValidatorKind::Str),
    ("tinyint", ValidatorKind::TinyInt),
    ("smallint", ValidatorKind::SmallInt),
    ("int", ValidatorKind::Int),
    ("bigint", ValidatorKind::BigInt),
    ("timestamp", ValidatorKind::Timestamp),
    ("date", ValidatorKind::Date),
    // TODO: enforce single-precision range once float and double diverge.
    ("float", ValidatorKind::Float),
    ("double", ValidatorKind::Float),
];

fn table(namespace: RegistryNamespace) -> &'static [(&'static str, ValidatorKind)] {
    match namespace {
        RegistryNamespace::Primary => PRIMARY,
        RegistryNamespace::Secondary => SECONDARY,
    }
}

/// Resolves `token` in `namespace`.
///
/// # Errors
///
/// [`RegistryError::UnknownToken`] when the namespace has no such token.
pub fn lookup(namespace: RegistryNamespace, token: &str) -> Result<ValidatorKind, RegistryError> {
    table(namespace)
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| RegistryError::UnknownToken {
            namespace,
            token: token.to_string(),
        })
}

/// Resolves `token` and builds a fresh validator from `config`.
///
/// # Errors
///
/// [`RegistryError::UnknownToken`] for unknown tokens,
/// [`RegistryError::InvalidOptions`] (naming `token`) when the options do
/// not fit the resolved kind.
pub fn instantiate(
    namespace: RegistryNamespace,
    token: &str,
    config: &ValidatorConfig,
) -> Result<Box<dyn Validator>, RegistryError> {
    let kind = lookup(namespace, token)?;
    tracing::trace!(%namespace, token, %kind, "instantiating validator");
    kind.build(config).map_err(|err| match err {
        RegistryError::InvalidOptions { reason, .. } => RegistryError::InvalidOptions {
            token: token.to_string(),
            reason,
        },
        other => other,
    })
}

/// All tokens of a namespace, in table order.
pub fn tokens(namespace: RegistryNamespace) -> impl Iterator<Item = &'static str> {
    table(namespace).iter().map(|(name, _)| *name)
}
