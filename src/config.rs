// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered, later sources winning: built-in defaults, the
//! user config file (`depcycles.toml` in the platform config directory),
//! an explicit `--config` file, then `DEPCYCLES_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smallest component size reported as a cycle
    pub min_cycle_size: usize,
    /// Packages deleted before cycle detection
    pub anchors: Vec<String>,
    /// File name pattern used when a directory of graphs is given
    pub dot_pattern: String,
    /// Graph name written in `digraph <name> { ... }`
    pub graph_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_cycle_size: 2,
            anchors: Vec::new(),
            dot_pattern: "*.dot".to_string(),
            graph_name: "G".to_string(),
        }
    }
}

impl Config {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Path of the per-user config file, if the platform has a config dir
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "depcycles")
        .map(|dirs| dirs.config_dir().join("depcycles.toml"))
}

/// Load configuration from disk and environment, falling back to defaults
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let mut builder = config::Config::builder().add_source(
        config::Config::try_from(&Config::default()).context("Failed to build default configuration")?,
    );

    if let Some(path) = default_path() {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        builder = builder.add_source(config::File::from(path));
    }

    builder
        .add_source(
            config::Environment::with_prefix("DEPCYCLES")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("anchors"),
        )
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
