use super::{attribute, is_false, single_label, SchemaError};
use crate::normalize::{as_bool, as_string};
use serde::Serialize;

pub(super) const KEYWORD: &str = "output";

/// An output value
///
/// The `value` expression is not part of the summary.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Output {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
}

impl Output {
    pub fn decode(source: &str, block: &hcl_edit::structure::Block) -> Result<Self, SchemaError> {
        let name = single_label(KEYWORD, block)?;
        let body = &block.body;

        Ok(Output {
            name,
            description: attribute(body, "description")
                .map(|expr| as_string(source, expr))
                .unwrap_or_default(),
            sensitive: attribute(body, "sensitive")
                .map(|expr| as_bool(source, expr))
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::test::first_block;
    use pretty_assertions::assert_eq;

    fn decode(source: &str) -> Result<Output, SchemaError> {
        Output::decode(source, &first_block(source))
    }

    #[test]
    fn output() {
        let output = decode(
            r#"
            output "computed" {
              description = "Computed value with interpolation"
              value       = "prefix-${var.string}-suffix"
              sensitive   = true
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            output,
            Output {
                name: "computed".into(),
                description: "Computed value with interpolation".into(),
                sensitive: true,
            }
        );
    }

    #[test]
    fn sensitive_as_string() {
        let output = decode(r#"output "o" { sensitive = "True" }"#).unwrap();
        assert!(output.sensitive);

        let output = decode(r#"output "o" { sensitive = "nope" }"#).unwrap();
        assert!(!output.sensitive);
    }

    #[test]
    fn label_count() {
        assert!(matches!(
            decode("output {}").unwrap_err(),
            SchemaError::LabelCount {
                keyword: "output",
                found: 0,
                ..
            }
        ));
        assert!(matches!(
            decode(r#"output "a" "b" {}"#).unwrap_err(),
            SchemaError::LabelCount { found: 2, .. }
        ));
    }
}
