//! aggregate of all decoded blocks of a workspace
use crate::schema::{Block, Output, TerraformSettings, Variable};
use serde::Serialize;

/// Summary of a workspace
///
/// Blocks are kept in the order they were encountered. Blocks with the same name are not merged.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct TerraformConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Output>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub terraform: Vec<TerraformSettings>,
}

impl TerraformConfig {
    pub fn push(&mut self, block: Block) {
        match block {
            Block::Variable(variable) => self.variables.push(variable),
            Block::Output(output) => self.outputs.push(output),
            Block::Terraform(settings) => self.terraform.push(settings),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.outputs.is_empty() && self.terraform.is_empty()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl FromIterator<Block> for TerraformConfig {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut config = TerraformConfig::default();
        for block in iter {
            config.push(block);
        }
        config
    }
}

impl Extend<Block> for TerraformConfig {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        for block in iter {
            self.push(block);
        }
    }
}
