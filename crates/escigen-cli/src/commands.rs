use std::io;

use escigen_config::{GeneratorConfig, Properties, TARGET_DIRECTORY_KEY};
use escigen_generate::GenerationEngine;
use tracing::{info, warn};

use crate::logging::init_logging;
use crate::{CheckArgs, CliError, ConfigArgs, GenerateArgs};

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let props = load_properties(&args.config)?;
    let kinds = args.selection.kinds();

    let mut engine = match args.seed {
        Some(seed) => GenerationEngine::seeded(seed),
        None => GenerationEngine::new(),
    };
    if args.quiet {
        engine = engine.with_progress(io::sink());
    }

    let report = engine.run(&kinds, &props);

    if let Some(path) = &args.report {
        report.write_json(path)?;
        info!(path = %path.display(), "report written");
    }

    let failed = report.failed_count();
    if failed > 0 {
        return Err(CliError::GeneratorsFailed {
            failed,
            total: report.generators.len(),
        });
    }
    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), CliError> {
    init_logging(None)?;

    let props = load_properties(&args.config)?;
    let kinds = args.selection.kinds();

    let mut resolved = Vec::new();
    for &kind in &kinds {
        match GeneratorConfig::from_properties(kind, &props) {
            Ok(config) => resolved.push(config),
            Err(err) => warn!(kind = %kind, error = %err, "invalid configuration"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&resolved)?);

    let invalid = kinds.len() - resolved.len();
    if invalid > 0 {
        return Err(CliError::InvalidConfig {
            invalid,
            total: kinds.len(),
        });
    }
    Ok(())
}

/// Configuration file, then `--set` overrides, then `--target-dir`.
fn load_properties(args: &ConfigArgs) -> Result<Properties, CliError> {
    let mut props = match &args.config {
        Some(path) => Properties::load(path)?,
        None => Properties::new(),
    };
    for assignment in &args.overrides {
        props.apply_override(assignment)?;
    }
    if let Some(dir) = &args.target_dir {
        props.set(TARGET_DIRECTORY_KEY, dir.display().to_string());
    }
    info!(keys = props.len(), "configuration loaded");
    Ok(props)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;
    use escigen_core::EntityKind;

    use super::*;
    use crate::{Cli, Command, Selection};

    #[test]
    fn empty_selection_runs_every_generator() {
        assert_eq!(Selection::default().kinds(), EntityKind::ALL.to_vec());

        let selection = Selection {
            context: true,
            organizational_unit: true,
            ..Selection::default()
        };
        assert_eq!(
            selection.kinds(),
            vec![EntityKind::Context, EntityKind::OrganizationalUnit]
        );
    }

    #[test]
    fn overrides_apply_after_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("escigen_cli_{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            "[generator]\ntarget.directory = \"/tmp/from-file\"\ncontext.num = 2\n",
        )
        .expect("write config");

        let args = ConfigArgs {
            config: Some(path),
            overrides: vec!["generator.context.num=5".to_string()],
            target_dir: Some(PathBuf::from("/tmp/from-flag")),
        };
        let props = load_properties(&args).expect("load properties");

        assert_eq!(props.get("generator.context.num"), Some("5"));
        assert_eq!(props.get(TARGET_DIRECTORY_KEY), Some("/tmp/from-flag"));
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "escigen",
            "generate",
            "-f",
            "escigen.toml",
            "-i",
            "-o",
            "--set",
            "generator.item.random.num=3",
            "--seed",
            "9",
            "--quiet",
        ])
        .expect("parse");

        let Command::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.config.config, Some(PathBuf::from("escigen.toml")));
        assert_eq!(
            args.selection.kinds(),
            vec![EntityKind::Item, EntityKind::OrganizationalUnit]
        );
        assert_eq!(args.config.overrides.len(), 1);
        assert_eq!(args.seed, Some(9));
        assert!(args.quiet);
    }
}
