//! Global context for flotilla operations.
//!
//! Provides centralized access to configuration, paths, and environment.
//! The checkout root is the directory all repositories are cloned into; it is
//! found by searching upward for `Flotilla.toml`, falling back to the current
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{self, load_config, Config, PROJECT_CONFIG_NAME};

/// Environment variable overriding the flotilla home directory.
pub const HOME_ENV: &str = "FLOTILLA_HOME";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global flotilla data (~/.flotilla/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => config::global_config_dir().unwrap_or_else(|| PathBuf::from(".flotilla")),
        };

        Ok(GlobalContext {
            cwd,
            home,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the flotilla home directory (~/.flotilla/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Find the checkout root, searching upward from cwd for `Flotilla.toml`.
    ///
    /// Without a project config anywhere above, the current directory is the
    /// checkout root.
    pub fn checkout_root(&self) -> PathBuf {
        let mut current = self.cwd.clone();
        loop {
            if current.join(PROJECT_CONFIG_NAME).is_file() {
                return current;
            }
            if !current.pop() {
                return self.cwd.clone();
            }
        }
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Result<Config> {
        let root = self.checkout_root();
        load_config(
            Some(&self.config_path()),
            &config::project_config_path(&root),
        )
    }
}
