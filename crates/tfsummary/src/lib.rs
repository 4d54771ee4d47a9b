//! # tfsummary - terraform module summaries
//!
//! Extracts the interface of a terraform module (variables, outputs and `terraform` settings) without running
//! terraform.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tfsummary` works internally.
//!
//! ### Workspaces
//!
//! A workspace is a single directory. Every entry whose name ends in `.tf` is parsed, subdirectories are not
//! descended into. Files are accessed through [fs::FileSource], so the same code works on disk ([fs::LocalFs]) and
//! in memory ([fs::MemoryFs]). See [workspace::WorkspaceParser].
//!
//! ### Blocks
//!
//! Each file is parsed as a [hcl_edit::structure::Body]. Only its top-level blocks are looked at, and only three kinds
//! of them are decoded:
//!
//! | **identifier** | **labels** | **record**                       |
//! |----------------|------------|----------------------------------|
//! | `variable`     | 1 (name)   | [schema::Variable]               |
//! | `output`       | 1 (name)   | [schema::Output]                 |
//! | `terraform`    | none       | [schema::TerraformSettings]      |
//!
//! Everything else (`resource`, `data`, `module`, `provider`, `locals`, ...) is skipped.
//!
//! ### Values
//!
//! Nothing is evaluated. There is no variable binding and no function execution. An attribute's expression is reduced
//! statically by [normalize::normalize]:
//!
//! ```hcl
//! variable "example" {
//!   default     = "hello"           # string "hello"
//!   count       = 42                # integer 42
//!   ratio       = 0.5               # float 0.5
//!   enabled     = true              # boolean
//!   tags        = { Name = "web" }  # raw text "{ Name = \"web\" }"
//!   type        = list(string)      # raw text "list(string)"
//!   computed    = var.prefix        # raw text "var.prefix"
//! }
//! ```
//!
//! Raw text is the trimmed source of the expression, taken from the span [hcl_edit] records while parsing.
//!
//! ### Output
//!
//! Decoded blocks are collected into a [summary::TerraformConfig] which is serialized via [serde].
//!
pub mod fs;
pub mod normalize;
pub mod schema;
pub mod source;
pub mod summary;
pub mod value;
pub mod workspace;

pub use summary::TerraformConfig;
pub use workspace::{parse_workspace, ParseOptions, WorkspaceError, WorkspaceParser};
