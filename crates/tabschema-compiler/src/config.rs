//! Compiler configuration.
//!
//! The dialect is chosen by the caller from the schema source it holds;
//! the compiler never guesses it from the tree.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The schema-DSL grammar a tree was parsed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `class` blocks of `attribute`/`variable` declarations.
    #[default]
    DirectColumns,
    /// `ent_attr` blocks plus `class` blocks of `column` declarations with
    /// composed validators.
    EntityAttributeComposed,
    /// `class` blocks of Spark-typed columns; only public columns compile.
    TypedVisibilityGated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub dialect: Dialect,
    /// Passed to every validator the compiler builds.
    pub empty_ok: bool,
}

impl CompilerConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_empty_ok(mut self, empty_ok: bool) -> Self {
        self.empty_ok = empty_ok;
        self
    }

    /// Parses a YAML document such as:
    ///
    /// ```yaml
    /// dialect: typed_visibility_gated
    /// empty_ok: true
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.dialect, Dialect::DirectColumns);
        assert!(!config.empty_ok);
    }

    #[test]
    fn test_from_yaml() {
        let config =
            CompilerConfig::from_yaml_str("dialect: entity_attribute_composed\nempty_ok: true\n")
                .unwrap();
        assert_eq!(
            config,
            CompilerConfig::new(Dialect::EntityAttributeComposed).with_empty_ok(true)
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = CompilerConfig::from_yaml_str("empty_ok: true").unwrap();
        assert_eq!(config.dialect, Dialect::DirectColumns);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(CompilerConfig::from_yaml_str("dialect: direct_columns\nstrict: yes").is_err());
        assert!(CompilerConfig::from_yaml_str("dialect: lark").is_err());
    }
}
