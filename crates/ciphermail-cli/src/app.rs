//! Application context for the CipherMail CLI.
//!
//! Bundles the parsed arguments with the lazily-loaded config file and
//! resolves where the database lives.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use ciphermail_core::{Accounts, SqliteStore, User};

use crate::cli::Cli;
use crate::config::{default_database_path, read_config, resolve_config_path, CipherMailConfig};
use crate::errors::core_error;
use crate::prompt::{prompt_password, value_or_prompt};
use crate::ui::Ui;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<CipherMailConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists at the resolved path.
    pub fn config(&self) -> anyhow::Result<Option<&CipherMailConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                read_config(&path).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(config.as_ref())
    }

    pub fn ui(&self) -> anyhow::Result<Ui> {
        let color_enabled =
            !self.cli.no_color && self.config()?.map(|c| c.ui.color).unwrap_or(true);
        Ok(Ui::detect(color_enabled, self.quiet()))
    }

    /// Database path: `--database`/`CIPHERMAIL_DB`, then config, then XDG default.
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.database.as_ref() {
            return Ok(PathBuf::from(path));
        }
        if let Some(config) = self.config()? {
            return Ok(PathBuf::from(&config.database.path));
        }
        default_database_path()
    }

    /// Open the store. The caller owns it; it is closed on drop.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.database_path()?;
        tracing::debug!(path = %path.display(), "opening database");
        SqliteStore::open(&path)
            .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", path.display(), e))
    }
}

/// Log in as `username` (prompted if absent), with the password from the
/// environment or a prompt.
pub fn login(store: &SqliteStore, username: Option<String>) -> anyhow::Result<User> {
    use secrecy::ExposeSecret;

    let username = value_or_prompt(username, "Username")?;
    let password = prompt_password()?;
    Accounts::new(store)
        .login(&username, password.expose_secret())
        .map_err(core_error)
}
