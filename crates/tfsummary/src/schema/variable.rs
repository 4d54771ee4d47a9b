use super::{attribute, nested_blocks, single_label, SchemaError};
use crate::normalize::{as_bool, as_string, normalize};
use crate::value::Value;
use serde::Serialize;

pub(super) const KEYWORD: &str = "variable";
const VALIDATION: &str = "validation";

/// An input variable
///
/// ```hcl
/// variable "region" {
///   type        = string
///   description = "AWS region"
///   default     = "us-east-1"
///
///   validation {
///     condition     = length(var.region) > 0
///     error_message = "Region must not be empty."
///   }
/// }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Type constraint as written, e.g. `list(string)`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub type_constraint: String,
    /// `None` when the block has no `default` attribute, `Some(Value::Null)` for `default = null`. Both are omitted
    /// when serialized, `required` tells them apart.
    #[serde(skip_serializing_if = "is_unset")]
    pub default: Option<Value>,
    pub required: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<Validation>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Validation {
    pub condition: String,
    pub error_message: String,
}

fn is_unset(default: &Option<Value>) -> bool {
    matches!(default, None | Some(Value::Null))
}

impl Variable {
    pub fn decode(source: &str, block: &hcl_edit::structure::Block) -> Result<Self, SchemaError> {
        let name = single_label(KEYWORD, block)?;
        let body = &block.body;

        let default = attribute(body, "default").map(|expr| normalize(source, expr));

        let mut variable = Variable {
            description: attribute(body, "description")
                .map(|expr| as_string(source, expr))
                .unwrap_or_default(),
            type_constraint: attribute(body, "type")
                .map(|expr| as_string(source, expr))
                .unwrap_or_default(),
            required: default.is_none(),
            default,
            sensitive: attribute(body, "sensitive")
                .map(|expr| as_bool(source, expr))
                .unwrap_or_default(),
            validation: Vec::new(),
            name,
        };

        for validation_block in nested_blocks(body, VALIDATION) {
            let validation = Validation::decode(source, validation_block, &variable.name)?;
            variable.validation.push(validation);
        }

        Ok(variable)
    }
}

impl Validation {
    fn decode(
        source: &str,
        block: &hcl_edit::structure::Block,
        variable: &str,
    ) -> Result<Self, SchemaError> {
        let field = |field: &'static str| {
            attribute(&block.body, field)
                .map(|expr| as_string(source, expr))
                .ok_or_else(|| SchemaError::MissingField {
                    keyword: KEYWORD,
                    name: variable.to_owned(),
                    block: VALIDATION,
                    field,
                })
        };

        Ok(Validation {
            condition: field("condition")?,
            error_message: field("error_message")?,
        })
    }
}
