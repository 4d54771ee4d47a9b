//! decoders for the blocks that describe a module's interface
//!
//! Each decoder reads the labels, attributes and nested blocks of one [hcl_edit::structure::Block] and produces a
//! fixed-shape record. Attribute values are reduced with the functions in [crate::normalize].
//!
//! Unknown attributes and nested blocks are ignored.
mod output;
mod terraform;
mod variable;

pub use output::Output;
pub use terraform::{RequiredProvider, TerraformSettings};
pub use variable::{Validation, Variable};

use hcl_edit::expr::Expression;
use hcl_edit::structure::Body;

/// A decoded top-level block
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Variable(Variable),
    Output(Output),
    Terraform(TerraformSettings),
}

impl Block {
    pub fn keyword(&self) -> &'static str {
        match self {
            Block::Variable(_) => variable::KEYWORD,
            Block::Output(_) => output::KEYWORD,
            Block::Terraform(_) => terraform::KEYWORD,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("{keyword} block must have exactly {expected} label(s), found {found}")]
    LabelCount {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{keyword} block must not have labels")]
    LabelsNotAllowed { keyword: &'static str },
    #[error("{field} is missing in {block} block of {keyword} \"{name}\"")]
    MissingField {
        keyword: &'static str,
        name: String,
        block: &'static str,
        field: &'static str,
    },
}

/// The single label of a block
fn single_label(keyword: &'static str, block: &hcl_edit::structure::Block) -> Result<String, SchemaError> {
    match block.labels.as_slice() {
        [label] => Ok(label.as_str().to_owned()),
        labels => Err(SchemaError::LabelCount {
            keyword,
            expected: 1,
            found: labels.len(),
        }),
    }
}

/// Expression of the first attribute named `key`
fn attribute<'a>(body: &'a Body, key: &str) -> Option<&'a Expression> {
    body.attributes()
        .find(|attribute| attribute.key.value().as_str() == key)
        .map(|attribute| &attribute.value)
}

/// Nested blocks named `ident`
fn nested_blocks<'a>(
    body: &'a Body,
    ident: &'a str,
) -> impl Iterator<Item = &'a hcl_edit::structure::Block> + 'a {
    body.blocks()
        .filter(move |block| block.ident.value().as_str() == ident)
}

fn is_false(value: &bool) -> bool {
    !value
}
