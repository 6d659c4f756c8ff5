// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reference package lists
//!
//! A reference list is a curated `<package> <level>` file, one package per
//! line, whitespace separated. The level is the build stage a curator
//! assigned to the package; it is optional and compared numerically when
//! it parses as an integer.

use crate::types::Node;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::info;

/// Packages and their levels, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList {
    entries: IndexMap<Node, Option<String>>,
}

impl ReferenceList {
    /// Parse list text. Blank lines are skipped; the first token of a line
    /// is the package, the last one (if different) its level.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = IndexMap::new();
        for (index, line) in text.lines().enumerate() {
            let mut tokens = line.split_whitespace();
            let Some(node) = tokens.next() else {
                continue;
            };
            let level = tokens.last().map(str::to_string);
            if entries.insert(node.to_string(), level).is_some() {
                anyhow::bail!("line {}: package `{}` listed twice", index + 1, node);
            }
        }
        Ok(Self { entries })
    }

    /// Load a list file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let list = Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("{}: {} reference packages", path.display(), list.len());
        Ok(list)
    }

    /// Number of packages
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.entries.contains_key(node)
    }

    /// Level of `node`, if listed with one
    #[must_use]
    pub fn level(&self, node: &str) -> Option<&str> {
        self.entries.get(node).and_then(Option::as_deref)
    }

    /// Packages in file order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.entries.keys()
    }

    /// Packages whose level equals `level`, in file order. Integer levels
    /// compare numerically, so `01` selects packages at level `1`.
    pub fn nodes_at_level<'a>(&'a self, level: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.entries
            .iter()
            .filter(move |(_, l)| {
                l.as_deref()
                    .is_some_and(|l| compare_levels(Some(l), Some(level)) == Ordering::Equal)
            })
            .map(|(node, _)| node)
    }

    /// `(package, level)` pairs sorted by level, numerically where
    /// possible. Packages without a level sort last; ties keep file order.
    #[must_use]
    pub fn sorted_by_level(&self) -> Vec<(&Node, Option<&str>)> {
        let mut pairs: Vec<(&Node, Option<&str>)> = self
            .entries
            .iter()
            .map(|(node, level)| (node, level.as_deref()))
            .collect();
        pairs.sort_by(|a, b| compare_levels(a.1, b.1));
        pairs
    }
}

fn compare_levels(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match (x.parse::<i64>(), y.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        let list = ReferenceList::parse("glibc 1\nzlib\t2\n\nperl 10\nbash\n").unwrap();

        assert_eq!(list.len(), 4);
        assert_eq!(list.level("zlib"), Some("2"));
        assert_eq!(list.level("bash"), None);
        assert!(list.contains("perl"));
        assert!(!list.contains("python"));
    }

    #[test]
    fn test_duplicate_package_rejected() {
        let err = ReferenceList::parse("a 1\nb 2\na 3\n").unwrap_err();

        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_sorted_by_level_is_numeric() {
        let list = ReferenceList::parse("perl 10\nbash\nglibc 1\nzlib 2\n").unwrap();

        let order: Vec<&str> = list
            .sorted_by_level()
            .into_iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(order, ["glibc", "zlib", "perl", "bash"]);
    }

    #[test]
    fn test_nodes_at_level() {
        let list = ReferenceList::parse("glibc 1\nperl 10\nbash\ngcc 01\nzlib 2\nodd one\n").unwrap();

        let first: Vec<&str> = list.nodes_at_level("1").map(String::as_str).collect();
        assert_eq!(first, ["glibc", "gcc"]);
        let named: Vec<&str> = list.nodes_at_level("one").map(String::as_str).collect();
        assert_eq!(named, ["odd"]);
        assert_eq!(list.nodes_at_level("7").count(), 0);
    }
}
