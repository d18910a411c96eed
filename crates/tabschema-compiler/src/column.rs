//! Column assembly shared by every dialect.
//!
//! Dialects differ only in how they dig names, types and validator
//! declarations out of the tree. Once extracted, every column is built the
//! same way: the declared type's validator first, then the named
//! validators in declaration order.

use tabschema_core::RegistryNamespace;
use tabschema_validators::{instantiate, Validator, ValidatorConfig};

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::schema::{Attribute, Column, Visibility};

/// A column declaration pulled out of a tree, before instantiation.
#[derive(Debug, Clone)]
pub(crate) struct ColumnSpec {
    pub name: String,
    pub declared_type: String,
    /// Where the declared type is resolved. Named validators always
    /// resolve in the primary namespace.
    pub type_namespace: RegistryNamespace,
    pub validators: Vec<Attribute>,
    pub visibility: Option<Visibility>,
}

impl ColumnSpec {
    /// Checks that a declaration carries both a name and a type.
    ///
    /// Empty tokens count as missing.
    pub fn require(
        entity: &str,
        block: usize,
        name: Option<&str>,
        declared_type: Option<&str>,
        type_namespace: RegistryNamespace,
    ) -> Result<Self, CompileError> {
        let name = name.filter(|n| !n.is_empty());
        let declared_type = declared_type.filter(|t| !t.is_empty());
        match (name, declared_type) {
            (Some(name), Some(declared_type)) => Ok(Self {
                name: name.to_string(),
                declared_type: declared_type.to_string(),
                type_namespace,
                validators: Vec::new(),
                visibility: None,
            }),
            (None, _) => Err(CompileError::MissingColumnField {
                entity: entity.to_string(),
                block,
                field: "name",
                name: None,
            }),
            (Some(name), None) => Err(CompileError::MissingColumnField {
                entity: entity.to_string(),
                block,
                field: "type",
                name: Some(name.to_string()),
            }),
        }
    }

    pub fn with_validators(mut self, validators: Vec<Attribute>) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_visibility(mut self, visibility: Option<Visibility>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Instantiates the validator chain.
    pub fn assemble(self, entity: &str, config: &CompilerConfig) -> Result<Column, CompileError> {
        let base = ValidatorConfig::default()
            .with_empty_ok(config.empty_ok)
            .with_meta(format!("{entity}.{}", self.name));
        let registry_error = |source| CompileError::Registry {
            entity: entity.to_string(),
            column: self.name.clone(),
            source,
        };

        let mut chain: Vec<Box<dyn Validator>> = Vec::with_capacity(self.validators.len() + 1);
        chain.push(
            instantiate(self.type_namespace, &self.declared_type, &base).map_err(registry_error)?,
        );
        for attribute in &self.validators {
            let config = base.clone().with_options(attribute.options.iter().cloned());
            chain.push(
                instantiate(RegistryNamespace::Primary, &attribute.name, &config)
                    .map_err(registry_error)?,
            );
        }

        Ok(Column::new(self.name, self.declared_type, chain, self.visibility))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabschema_core::RegistryError;
    use tabschema_validators::ValidatorKind;

    #[test]
    fn test_type_validator_leads_chain() {
        let spec = ColumnSpec::require(
            "users",
            0,
            Some("name"),
            Some("str"),
            RegistryNamespace::Primary,
        )
        .unwrap()
            .with_validators(vec![
                Attribute {
                    name: "len".into(),
                    options: vec!["5".into()],
                },
                Attribute {
                    name: "unique".into(),
                    options: vec![],
                },
            ]);
        let column = spec.assemble("users", &CompilerConfig::default()).unwrap();
        assert_eq!(
            column.validator_kinds(),
            vec![ValidatorKind::Str, ValidatorKind::Len, ValidatorKind::Unique]
        );
        assert!(column.validators().iter().all(|v| v.meta() == Some("users.name")));
    }

    #[test]
    fn test_empty_ok_propagates() {
        let spec =
            ColumnSpec::require("t", 0, Some("c"), Some("int"), RegistryNamespace::Secondary)
                .unwrap();
        let config = CompilerConfig::default().with_empty_ok(true);
        let column = spec.assemble("t", &config).unwrap();
        assert!(column.validators()[0].empty_ok());
    }

    #[test]
    fn test_missing_fields() {
        let err = ColumnSpec::require("t", 3, None, Some("int"), RegistryNamespace::Primary)
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingColumnField { field: "name", block: 3, .. }));
        let err = ColumnSpec::require("t", 1, Some("c"), Some(""), RegistryNamespace::Primary)
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingColumnField { field: "type", .. }));
    }

    #[test]
    fn test_unknown_validator_token() {
        let spec = ColumnSpec::require("t", 0, Some("c"), Some("str"), RegistryNamespace::Primary)
            .unwrap()
            .with_validators(vec![Attribute {
                name: "maxlength".into(),
                options: vec![],
            }]);
        let err = spec.assemble("t", &CompilerConfig::default()).unwrap_err();
        match err {
            CompileError::Registry { column, source, .. } => {
                assert_eq!(column, "c");
                assert!(matches!(
                    source,
                    RegistryError::UnknownToken { ref token, .. } if token == "maxlength"
                ));
            }
            other => panic!("expected registry error, got {other:?}"),
        }
    }
}
