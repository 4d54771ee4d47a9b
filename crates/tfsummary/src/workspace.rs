//! parsing of a workspace: all `.tf` files of one directory
//!
//! Files are read through a [FileSource] in the order it lists them. Each file is parsed into an
//! [hcl_edit::structure::Body], and its top-level blocks are handed to the decoder matching their identifier.
//! Blocks of any other kind and top-level attributes are skipped.
//!
//! The first error aborts the whole parse, there are no partial results.
use crate::fs::FileSource;
use crate::schema::{Block, Output, SchemaError, TerraformSettings, Variable};
use crate::summary::TerraformConfig;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "tf";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reserved for decoding of resource, data, module, provider and locals blocks
    ///
    /// Those blocks are skipped in either mode for now.
    pub detailed: bool,
}

#[derive(derive_new::new)]
pub struct WorkspaceParser<'fs> {
    fs: &'fs dyn FileSource,
    #[new(default)]
    options: ParseOptions,
}

impl<'fs> WorkspaceParser<'fs> {
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse all `.tf` files directly inside `dir`
    #[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub fn parse(&self, dir: &Path) -> Result<TerraformConfig, WorkspaceError> {
        tracing::info!(directory = %dir.display(), "parsing workspace");

        let exists = self
            .fs
            .dir_exists(dir)
            .map_err(|source| WorkspaceError::CheckDirectory {
                path: dir.to_owned(),
                source,
            })?;
        if !exists {
            return Err(WorkspaceError::DirectoryNotFound(dir.to_owned()));
        }

        let entries = self
            .fs
            .read_dir(dir)
            .map_err(|source| WorkspaceError::ReadDirectory {
                path: dir.to_owned(),
                source,
            })?;
        tracing::debug!(count = entries.len(), "found directory entries");

        let mut config = TerraformConfig::default();
        for entry in entries {
            if entry.is_dir || !has_tf_extension(&entry.name) {
                tracing::debug!(file = %entry.name, "skipping non-terraform entry");
                continue;
            }

            let path = dir.join(&entry.name);
            let contents = self
                .fs
                .read_file(&path)
                .map_err(|source| WorkspaceError::ReadFile {
                    path: path.clone(),
                    source,
                })?;

            let blocks = self.parse_file(&entry.name, &contents)?;
            tracing::debug!(file = %entry.name, blocks = blocks.len(), "parsed file");
            config.extend(blocks);
        }

        tracing::info!(
            directory = %dir.display(),
            variables = config.variables.len(),
            outputs = config.outputs.len(),
            terraform_blocks = config.terraform.len(),
            "parsed workspace"
        );

        Ok(config)
    }

    /// Decode the supported top-level blocks of a single file
    ///
    /// `file` is only used to identify the file in errors.
    pub fn parse_file(&self, file: &str, contents: &[u8]) -> Result<Vec<Block>, WorkspaceError> {
        let source = std::str::from_utf8(contents).map_err(|err| WorkspaceError::Syntax {
            file: file.to_owned(),
            message: err.to_string(),
        })?;

        let body = hcl_edit::parser::parse_body(source).map_err(|err| WorkspaceError::Syntax {
            file: file.to_owned(),
            message: err.to_string(),
        })?;

        let mut blocks = vec![];
        for block in body.blocks() {
            let keyword = block.ident.value().as_str();
            let labels: Vec<_> = block.labels.iter().map(|label| label.as_str()).collect();
            tracing::trace!(keyword, ?labels, "decoding block");

            let decoded = match keyword {
                "variable" => Variable::decode(source, block).map(Block::Variable),
                "output" => Output::decode(source, block).map(Block::Output),
                "terraform" => TerraformSettings::decode(source, block).map(Block::Terraform),
                _ => {
                    tracing::debug!(
                        keyword,
                        detailed = self.options.detailed,
                        "skipping unsupported block"
                    );
                    continue;
                }
            };

            let decoded = decoded.map_err(|source| WorkspaceError::Schema {
                file: file.to_owned(),
                keyword: keyword.to_owned(),
                source,
            })?;
            blocks.push(decoded);
        }

        Ok(blocks)
    }
}

/// Parse the workspace in `dir` with default options
pub fn parse_workspace(fs: &dyn FileSource, dir: &Path) -> Result<TerraformConfig, WorkspaceError> {
    WorkspaceParser::new(fs).parse(dir)
}

/// `true` for names whose final extension is exactly `.tf`, including a bare `.tf`
fn has_tf_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, extension)| extension == EXTENSION)
}

#[derive(thiserror::Error, Debug)]
pub enum WorkspaceError {
    #[error("workspace directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to check workspace directory {}", path.display())]
    CheckDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read workspace directory {}", path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse HCL syntax in {file}: {message}")]
    Syntax { file: String, message: String },
    #[error("failed to decode {keyword} block in {file}")]
    Schema {
        file: String,
        keyword: String,
        #[source]
        source: SchemaError,
    },
}
