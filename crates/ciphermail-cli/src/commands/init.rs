use std::path::PathBuf;

use ciphermail_core::SqliteStore;

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_database_path, resolve_config_path, write_config, CipherMailConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ))
        .into());
    }

    let database_path = match args.path.clone().or_else(|| ctx.cli().database.clone()) {
        Some(path) => PathBuf::from(path),
        None => default_database_path()?,
    };

    let store = SqliteStore::open(&database_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create database {}: {}",
            database_path.display(),
            e
        )
    })?;
    store.close()?;

    write_config(&config_path, &CipherMailConfig::new(database_path.clone()))?;
    tracing::info!(config = %config_path.display(), database = %database_path.display(), "initialized");

    let ui = ctx.ui()?;
    ui.success(&format!(
        "Initialized CipherMail at {} (config: {})",
        database_path.display(),
        config_path.display()
    ));
    Ok(())
}
