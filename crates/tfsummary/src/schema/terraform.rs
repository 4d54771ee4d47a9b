use super::{attribute, nested_blocks, SchemaError};
use crate::normalize::{as_string, as_string_list, as_string_map};
use indexmap::IndexMap;
use serde::Serialize;

pub(super) const KEYWORD: &str = "terraform";
const REQUIRED_PROVIDERS: &str = "required_providers";

/// Settings of a `terraform` block
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct TerraformSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub required_version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub experiments: Vec<String>,
    /// Provider requirements keyed by local provider name, in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub required_providers: IndexMap<String, RequiredProvider>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RequiredProvider {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl TerraformSettings {
    pub fn decode(source: &str, block: &hcl_edit::structure::Block) -> Result<Self, SchemaError> {
        if !block.labels.is_empty() {
            return Err(SchemaError::LabelsNotAllowed { keyword: KEYWORD });
        }

        let body = &block.body;
        let mut settings = TerraformSettings {
            required_version: attribute(body, "required_version")
                .map(|expr| as_string(source, expr))
                .unwrap_or_default(),
            experiments: attribute(body, "experiments")
                .map(|expr| as_string_list(source, expr))
                .unwrap_or_default(),
            required_providers: IndexMap::new(),
        };

        for providers in nested_blocks(body, REQUIRED_PROVIDERS) {
            for provider in providers.body.attributes() {
                let mut config = as_string_map(source, &provider.value);
                settings.required_providers.insert(
                    provider.key.value().as_str().to_owned(),
                    RequiredProvider {
                        source: config.swap_remove("source").unwrap_or_default(),
                        version: config.swap_remove("version").unwrap_or_default(),
                    },
                );
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::test::first_block;
    use pretty_assertions::assert_eq;

    fn decode(source: &str) -> Result<TerraformSettings, SchemaError> {
        TerraformSettings::decode(source, &first_block(source))
    }

    #[test]
    fn required_providers() {
        let settings = decode(
            r#"
            terraform {
              required_version = ">= 1.0.0"

              required_providers {
                aws = {
                  source  = "hashicorp/aws"
                  version = "~> 5.0"
                }
                azurerm = {
                  source  = "hashicorp/azurerm"
                  version = "~> 3.0"
                }
              }

              experiments = ["module_variable_optional_attrs", "config_driven_move"]
            }
            "#,
        )
        .unwrap();

        assert_eq!(settings.required_version, ">= 1.0.0");
        assert_eq!(
            settings.experiments,
            vec!["module_variable_optional_attrs", "config_driven_move"]
        );
        assert_eq!(
            settings.required_providers.get("aws"),
            Some(&RequiredProvider {
                source: "hashicorp/aws".into(),
                version: "~> 5.0".into(),
            })
        );
        assert_eq!(
            settings.required_providers.get("azurerm"),
            Some(&RequiredProvider {
                source: "hashicorp/azurerm".into(),
                version: "~> 3.0".into(),
            })
        );
        assert_eq!(
            settings.required_providers.keys().collect::<Vec<_>>(),
            vec!["aws", "azurerm"]
        );
    }

    #[test]
    fn partial_provider_requirements() {
        let settings = decode(
            r#"
            terraform {
              required_providers {
                random = {
                  version = ">= 3"
                }
                legacy = "~> 1.0"
              }
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.required_providers.get("random"),
            Some(&RequiredProvider {
                source: String::new(),
                version: ">= 3".into(),
            })
        );
        assert_eq!(
            settings.required_providers.get("legacy"),
            Some(&RequiredProvider::default())
        );
    }

    #[test]
    fn minimal() {
        let settings = decode("terraform {}").unwrap();
        assert_eq!(settings, TerraformSettings::default());
    }

    #[test]
    fn labels_are_not_allowed() {
        assert_eq!(
            decode(r#"terraform "x" {}"#).unwrap_err(),
            SchemaError::LabelsNotAllowed {
                keyword: "terraform"
            }
        );
    }

    #[test]
    fn unknown_nested_blocks_are_ignored() {
        let settings = decode(
            r#"
            terraform {
              backend "s3" {
                bucket = "state"
              }
              cloud {}
            }
            "#,
        )
        .unwrap();
        assert!(settings.required_providers.is_empty());
    }
}
