use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::clipboard::system::{DEFAULT_HANDOFF, LegacyCommand};
use crate::controller::CopyOptions;
use crate::utils::paths::get_config_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_success_duration_ms")]
    pub success_duration_ms: u64,

    #[serde(default = "default_rich_text")]
    pub rich_text: bool,

    /// How long a Linux write holds the clipboard for a manager to take over.
    #[serde(default = "default_clipboard_handoff_ms")]
    pub clipboard_handoff_ms: u64,

    /// Overrides the platform's legacy copy command search order.
    #[serde(default)]
    pub legacy_commands: Vec<String>,
}

fn default_success_duration_ms() -> u64 {
    2000
}

fn default_rich_text() -> bool {
    true
}

fn default_clipboard_handoff_ms() -> u64 {
    DEFAULT_HANDOFF.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            success_duration_ms: default_success_duration_ms(),
            rich_text: default_rich_text(),
            clipboard_handoff_ms: default_clipboard_handoff_ms(),
            legacy_commands: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    pub fn success_duration(&self) -> Duration {
        Duration::from_millis(self.success_duration_ms)
    }

    pub fn clipboard_handoff(&self) -> Duration {
        Duration::from_millis(self.clipboard_handoff_ms)
    }

    pub fn options(&self) -> CopyOptions {
        CopyOptions::new().with_success_duration(self.success_duration())
    }

    pub fn legacy_commands(&self) -> Vec<LegacyCommand> {
        let configured: Vec<LegacyCommand> = self
            .legacy_commands
            .iter()
            .filter_map(|line| LegacyCommand::parse(line))
            .collect();

        if configured.is_empty() {
            LegacyCommand::defaults()
        } else {
            configured
        }
    }
}
