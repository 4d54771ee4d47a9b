mod cli;

use tfsummary::fs::LocalFs;
use tfsummary::source::Source;
use tfsummary::{ParseOptions, TerraformConfig, WorkspaceParser};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    let filter = match &cli.log_level {
        Some(directives) => tracing_subscriber::EnvFilter::new(directives),
        None => tracing_subscriber::EnvFilter::try_from_env("TFSUMMARY_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command_result = match cli.command {
        cli::Command::Local(local_cli) => local(local_cli),
        cli::Command::Git(git_cli) => git(git_cli),
        cli::Command::Version(version_cli) => {
            version(version_cli);
            Ok(())
        }
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn local(cli: cli::LocalCommand) -> anyhow::Result<()> {
    let source = Source::Local {
        path: cli.path,
        subdir: cli.subdir,
    };

    summarize(&source, &cli.parse, &cli.output)
}

pub fn git(cli: cli::GitCommand) -> anyhow::Result<()> {
    let source = Source::Git {
        url: cli.url,
        reference: cli.reference,
        subdir: cli.subdir,
    };

    summarize(&source, &cli.parse, &cli.output)
}

fn summarize(
    source: &Source,
    parse: &cli::ParseArgs,
    output_args: &cli::OutputArgs,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let checkout = source.fetch().context("failed to fetch source")?;

    let options = ParseOptions {
        detailed: parse.detailed,
    };
    let config = WorkspaceParser::new(&LocalFs)
        .with_options(options)
        .parse(checkout.root())
        .context("failed to parse terraform workspace")?;

    output(output_args, &config)
}

fn output(output: &cli::OutputArgs, config: &TerraformConfig) -> anyhow::Result<()> {
    let rendered = match output.format {
        cli::OutputFormat::Json => config.to_json(!output.compact)?,
        cli::OutputFormat::Yaml => config.to_yaml()?,
    };

    println!("{}", rendered.trim_end());
    Ok(())
}

fn version(cli: cli::VersionCommand) {
    let version = env!("CARGO_PKG_VERSION");
    if cli.long {
        println!(
            "{} {version} ({}/{})",
            env!("CARGO_PKG_NAME"),
            std::env::consts::OS,
            std::env::consts::ARCH
        );
    } else {
        println!("{version}");
    }
}
