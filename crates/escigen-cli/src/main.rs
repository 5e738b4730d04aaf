mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use escigen_config::ConfigError;
use escigen_core::EntityKind;
use escigen_generate::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("{invalid} of {total} generator configurations are invalid")]
    InvalidConfig { invalid: usize, total: usize },
    #[error("{failed} of {total} generators failed")]
    GeneratorsFailed { failed: usize, total: usize },
}

#[derive(Parser, Debug)]
#[command(name = "escigen", version, about = "eSciDoc test data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate documents and manifests for the selected object types.
    Generate(GenerateArgs),
    /// Validate the configuration and print the resolved generator settings.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// TOML file holding `generator.*` keys.
    #[arg(long, short = 'f', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override a configuration key; may be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
    /// Shared target directory for every generator.
    #[arg(long, value_name = "DIR")]
    target_dir: Option<PathBuf>,
}

/// Object types to generate; none selected means all of them.
#[derive(Args, Debug, Default)]
struct Selection {
    #[arg(short = 'i', long)]
    item: bool,
    #[arg(short = 'c', long)]
    context: bool,
    #[arg(short = 'm', long)]
    content_model: bool,
    #[arg(short = 'r', long)]
    content_relation: bool,
    #[arg(short = 'o', long)]
    organizational_unit: bool,
}

impl Selection {
    fn kinds(&self) -> Vec<EntityKind> {
        let selected: Vec<EntityKind> = EntityKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                EntityKind::Item => self.item,
                EntityKind::Context => self.context,
                EntityKind::ContentModel => self.content_model,
                EntityKind::ContentRelation => self.content_relation,
                EntityKind::OrganizationalUnit => self.organizational_unit,
            })
            .collect();
        if selected.is_empty() {
            EntityKind::ALL.to_vec()
        } else {
            selected
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(flatten)]
    selection: Selection,
    /// Seed for random payloads.
    #[arg(long)]
    seed: Option<u64>,
    /// Do not draw the progress bar.
    #[arg(long, short = 'q', default_value_t = false)]
    quiet: bool,
    /// Append JSON logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// Write the run report as JSON.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(flatten)]
    selection: Selection,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => commands::run_generate(args),
        Command::Check(args) => commands::run_check(args),
    }
}
