// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - shows the effective configuration

use super::OutputOptions;
use crate::config::{self, Config};
use anyhow::Result;

/// Print `config`, or the path of the user config file when `path` is set
pub fn run(config: &Config, path: bool, out: OutputOptions) -> Result<()> {
    if path {
        match config::default_path() {
            Some(p) => println!("{}", p.display()),
            None => anyhow::bail!("No config directory on this platform"),
        }
        return Ok(());
    }

    if out.json {
        return out.print_json(config);
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
