//! tfsummary cli interface

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `tfsummary=trace`
    ///
    /// Takes precedence over the TFSUMMARY_LOG environment variable.
    #[clap(long = "log-level", global(true))]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a module in a local directory
    Local(LocalCommand),

    /// Summarize a module in a git repository
    ///
    /// For https URLs a token from GITHUB_TOKEN, GITLAB_TOKEN or GIT_TOKEN is used when set.
    Git(GitCommand),

    /// Print version information
    Version(VersionCommand),
}

#[derive(Parser, Debug)]
pub struct LocalCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub parse: ParseArgs,

    /// Directory containing the module
    pub path: PathBuf,

    /// Subdirectory within the path
    #[clap(long = "subdir")]
    pub subdir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct GitCommand {
    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub parse: ParseArgs,

    /// Repository URL (https or ssh)
    pub url: String,

    /// Branch, tag or commit (default: the repository's default branch)
    #[clap(short = 'b', long = "ref", alias = "branch")]
    pub reference: Option<String>,

    /// Subdirectory within the repository
    #[clap(long = "subdir")]
    pub subdir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct VersionCommand {
    /// Include build target information
    #[clap(short = 'l', long = "long")]
    pub long: bool,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,

    /// Print json on a single line
    #[clap(long = "compact")]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Detailed mode (reserved, currently identical to the default)
    #[clap(long = "detailed")]
    pub detailed: bool,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
