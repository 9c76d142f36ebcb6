//! verso-persona - active-persona resolution CLI
//!
//! Plays the caller role around the pure resolver: reads rosters and cookie
//! headers, keeps per-user preferences on disk, and prints the persona that
//! should be active.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::{debug, error, info};

use verso_persona::config::{self, VersoConfig};
use verso_persona::cookie::read_cookie_value;
use verso_persona::error::{Error, Result};
use verso_persona::logging;
use verso_persona::persona::{
    load_personas, per_user_persona_storage_key, PersonaResolver, PersonaType, PreferenceStore,
    ResolutionHints,
};
use verso_persona::version;

use crate::cli::{Cli, Commands, ConfigSubcommand};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Commands that need neither configuration nor logging
    match &cli.command {
        Commands::Version => {
            print!("{}", version::report());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::StorageKey { user_id } => {
            println!("{}", per_user_persona_storage_key(user_id));
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Cookie { header, name } => {
            return Ok(match read_cookie_value(header, name) {
                Some(value) => {
                    println!("{}", value);
                    ExitCode::SUCCESS
                }
                None => ExitCode::FAILURE,
            });
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)?;
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let config = VersoConfig::load(cli.command.config_path())?;

    // Guards must outlive every command below
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::BuildStamp::current();
    debug!(version = %build.full_version(), "Starting verso-persona");

    let result = dispatch(cli.command, &config);
    if let Err(ref e) = result {
        error!("{}", e.format_for_log());
    }
    result.map(|()| ExitCode::SUCCESS)
}

/// Run a command that needs the loaded configuration
fn dispatch(command: Commands, config: &VersoConfig) -> Result<()> {
    match command {
        Commands::Resolve {
            personas,
            cookie_header,
            cookie_type,
            cookie_id,
            stored_id,
            user,
            explain,
            ..
        } => {
            let cookie_pair = cookie_type.as_deref().zip(cookie_id.as_deref());
            run_resolve(
                config,
                Path::new(&personas),
                cookie_header.as_deref(),
                cookie_pair,
                stored_id.as_deref(),
                user.as_deref(),
                explain,
            )?;
        }
        Commands::Priority { personas, .. } => {
            run_priority(config, Path::new(&personas))?;
        }
        Commands::Table { .. } => {
            run_table(config)?;
        }
        Commands::Remember {
            user,
            persona_id,
            persona_type,
            personas,
            ..
        } => {
            run_remember(
                config,
                &user,
                &persona_id,
                persona_type,
                personas.as_deref().map(Path::new),
            )?;
        }
        Commands::Forget { user, .. } => {
            run_forget(config, &user)?;
        }
        Commands::Version
        | Commands::StorageKey { .. }
        | Commands::Cookie { .. }
        | Commands::Config { .. } => {
            // Already handled above
            unreachable!();
        }
    }

    Ok(())
}

/// Resolve and print the active persona
fn run_resolve(
    config: &VersoConfig,
    personas_path: &Path,
    cookie_header: Option<&str>,
    cookie_pair: Option<(&str, &str)>,
    stored_id: Option<&str>,
    user: Option<&str>,
    explain: bool,
) -> Result<()> {
    let personas = load_personas(personas_path)?;
    let resolver = PersonaResolver::new(config.priority_table()?);

    let mut hints = cookie_header
        .map(ResolutionHints::from_cookie_header)
        .unwrap_or_default();
    if let Some((persona_type, entity_id)) = cookie_pair {
        hints = hints.with_cookie(persona_type, entity_id);
    }

    // An explicit --stored-id wins over whatever was remembered for --user
    let remembered = match (stored_id, user) {
        (None, Some(user)) => PreferenceStore::in_data_dir(&config.data_dir())?
            .stored_persona_id(user)
            .map(str::to_string),
        _ => None,
    };
    let hints = hints.with_stored_persona_id(stored_id.or(remembered.as_deref()));

    let resolution = resolver.resolve_with_source(&personas, &hints);

    let output = match &resolution {
        Some(r) => {
            info!(
                persona = %r.persona,
                source = %r.source,
                candidates = personas.len(),
                "Active persona resolved"
            );
            if explain {
                json!({ "source": r.source, "persona": r.persona })
            } else {
                serde_json::to_value(r.persona)?
            }
        }
        None => {
            info!("No personas to resolve");
            if explain {
                json!({ "source": null, "persona": null })
            } else {
                serde_json::Value::Null
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the persona chosen by the priority table alone
fn run_priority(config: &VersoConfig, personas_path: &Path) -> Result<()> {
    let personas = load_personas(personas_path)?;
    let table = config.priority_table()?;

    let picked = table.select(&personas);
    debug!(picked = ?picked.map(|p| p.to_string()), "Priority selection");

    println!("{}", serde_json::to_string_pretty(&picked)?);
    Ok(())
}

/// Print the effective priority table
fn run_table(config: &VersoConfig) -> Result<()> {
    let table = config.priority_table()?;

    for (rank, tag) in table.tags().iter().enumerate() {
        let label = tag
            .parse::<PersonaType>()
            .map(|pt| pt.display_name())
            .unwrap_or("(custom)");
        println!("{:>3}  {:<20} {}", rank, tag, label);
    }
    println!("{:>3}  {:<20} {}", table.tags().len(), "*", "(any other type)");
    Ok(())
}

/// Persist a user's persona choice
fn run_remember(
    config: &VersoConfig,
    user: &str,
    persona_id: &str,
    persona_type: Option<String>,
    personas_path: Option<&Path>,
) -> Result<()> {
    let mut store = PreferenceStore::in_data_dir(&config.data_dir())?;

    let record = match personas_path {
        Some(path) => {
            let roster = load_personas(path)?;
            let persona = roster
                .iter()
                .find(|p| {
                    p.entity_id == persona_id
                        && persona_type.as_deref().map_or(true, |t| p.persona_type == t)
                })
                .ok_or_else(|| Error::PersonaNotFound {
                    entity_id: persona_id.to_string(),
                })?;
            store.remember_persona(user, persona).clone()
        }
        None => store.remember(user, persona_id, persona_type).clone(),
    };
    store.save()?;

    println!(
        "{} -> {}",
        per_user_persona_storage_key(user),
        record.persona_id
    );
    Ok(())
}

/// Remove a user's persona choice
fn run_forget(config: &VersoConfig, user: &str) -> Result<()> {
    let mut store = PreferenceStore::in_data_dir(&config.data_dir())?;

    if store.forget(user) {
        store.save()?;
        println!("Forgot stored persona for {}", user);
    } else {
        println!("No stored persona for {}", user);
    }
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: &ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = VersoConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), *force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            VersoConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
