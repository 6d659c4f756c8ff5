// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod cycles;
pub mod diff;
pub mod filter;
pub mod merge;
pub mod summary;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How reports are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Emit JSON instead of text
    pub json: bool,
    /// Colorize text output
    pub color: bool,
}

impl OutputOptions {
    /// Bold text
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Highlight a count or name
    #[must_use]
    pub fn value(&self, text: impl std::fmt::Display) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Warning text
    #[must_use]
    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print `report` as pretty JSON on stdout
    pub fn print_json<T: Serialize>(&self, report: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Resolve the graph files to read: either explicit paths or every file in
/// `dir` matching `pattern`, never both.
pub fn resolve_inputs(paths: &[PathBuf], dir: Option<&Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let inputs = match (paths.is_empty(), dir) {
        (false, Some(_)) => anyhow::bail!("Input paths and --dir can not be set both"),
        (true, None) => anyhow::bail!("Either input paths or --dir must be set"),
        (false, None) => paths.to_vec(),
        (true, Some(dir)) => crate::dotfile::collect_dotfiles(dir, pattern)?,
    };

    if inputs.is_empty() {
        anyhow::bail!("At least one graph file is required");
    }
    if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
        anyhow::bail!("Path `{}` does not exist", missing.display());
    }

    Ok(inputs)
}

/// Write one line per item to `path`, creating parent directories
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// File stem of `path` as a string, for naming derived outputs
#[must_use]
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "graph".to_string(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_inputs_rejects_both() {
        let dir = TempDir::new().unwrap();
        let err = resolve_inputs(&[PathBuf::from("a.dot")], Some(dir.path()), "*.dot").unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_resolve_inputs_rejects_neither() {
        assert!(resolve_inputs(&[], None, "*.dot").is_err());
    }

    #[test]
    fn test_resolve_inputs_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.dot"), "a -> b\n").unwrap();

        let inputs = resolve_inputs(&[], Some(dir.path()), "*.dot").unwrap();
        assert_eq!(inputs, vec![dir.path().join("x.dot")]);

        let err = resolve_inputs(&[], Some(dir.path()), "*.gv").unwrap_err();
        assert!(err.to_string().contains("At least one"));
    }

    #[test]
    fn test_resolve_inputs_missing_path() {
        let err = resolve_inputs(&[PathBuf::from("/no/such/file.dot")], None, "*.dot").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_write_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/list.txt");

        write_lines(&path, ["a", "b"]).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let out = OutputOptions::default();
        assert_eq!(out.heading("x"), "x");
        assert_eq!(out.value(3), "3");
    }
}
