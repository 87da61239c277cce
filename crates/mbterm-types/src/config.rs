//! Session configuration.
//!
//! Read from a TOML file; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! banner = ["MBASIC Version 5.21", ""]
//! terminal_width = 80
//! files_column_width = 20
//! scrollback_spans = 2000
//! default_save_name = "PROGRAM.BAS"
//! snapshot_path = "files.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MbtermError, Result};

/// Narrowest terminal the column tracker accepts.
const MIN_TERMINAL_WIDTH: u16 = 16;

/// Tunables for a terminal session and its front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lines printed when the session starts, before the first `Ok`.
    pub banner: Vec<String>,
    /// Column at which printed text wraps.
    pub terminal_width: u16,
    /// Name column width in the `FILES` listing.
    pub files_column_width: usize,
    /// Output spans the terminal keeps before dropping the oldest. 0 keeps
    /// everything.
    pub scrollback_spans: usize,
    /// File name a front end suggests when saving without a name.
    pub default_save_name: String,
    /// Where the front end keeps the JSON snapshot of the file store.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            banner: vec![
                "MBASIC Version 5.21".to_string(),
                "mbterm session layer".to_string(),
                String::new(),
            ],
            terminal_width: 80,
            files_column_width: 20,
            scrollback_spans: 2000,
            default_save_name: "PROGRAM.BAS".to_string(),
            snapshot_path: None,
        }
    }
}

impl SessionConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.terminal_width < MIN_TERMINAL_WIDTH {
            return Err(MbtermError::Config(format!(
                "terminal_width must be at least {MIN_TERMINAL_WIDTH}, got {}",
                self.terminal_width
            )));
        }
        if self.default_save_name.trim().is_empty() {
            return Err(MbtermError::Config(
                "default_save_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
