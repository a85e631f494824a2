use action_schema_config::Config;
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let (schema_path, lenient) = match resolve_schema_path(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    log::debug!("editing {}", schema_path.display());

    match commands::run(&cli.command, &schema_path, lenient) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }

    if let Command::Init { remember: true, .. } = cli.command
        && let Err(e) = remember_schema_path(&schema_path)
    {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Save `schema_path` to the config file so later runs can omit `--file`
fn remember_schema_path(schema_path: &Path) -> Result<()> {
    let config = commands::remembered_config(schema_path, Config::load()?)?;
    config.save()?;
    println!(
        "Remembered {} in {}",
        config.schema_path.display(),
        Config::config_path().display()
    );
    Ok(())
}

/// Pick the schema file from `--file` or the config file
fn resolve_schema_path(cli: &Cli) -> Result<(PathBuf, bool)> {
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        // A broken config only matters when it is needed for the path
        Err(e) if cli.file.is_some() => {
            log::warn!("ignoring config file: {e}");
            None
        }
        Err(e) => return Err(e.into()),
    };
    let lenient = cli.lenient || config.as_ref().is_some_and(|c| c.lenient_edits);

    match (&cli.file, config) {
        (Some(file), _) => Ok((file.clone(), lenient)),
        (None, Some(config)) => Ok((config.schema_path, lenient)),
        (None, None) => anyhow::bail!(
            "No schema file given and no config file found\n\
             Use --file <PATH> or create a config file at {} with `schema_path = \"...\"`",
            config_path.display()
        ),
    }
}
