// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reading and writing graph description (DOT) files
//!
//! Only the subset produced by dependency dumpers is understood: every line
//! with `->` outside quoted names is an edge statement (chains like
//! `a -> b -> c` expand to consecutive edges, a trailing `[attr]` list is
//! ignored), and a line holding just a quoted name is a node statement.
//! Everything else (`digraph G {`, attributes, braces, comments) is
//! skipped. Quoted names may contain `->`, `[` and the escapes `\"` and
//! `\\`.

use crate::graph::DirectedGraph;
use anyhow::{Context, Result};
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Characters stripped from both ends of an unquoted node name
const STRIP_CHARS: &[char] = &['\'', '"', '‘', '’', '“', '”', ';', '；'];

/// Normalize a raw node token.
///
/// A token wrapped in double quotes is taken literally, with `\"` and
/// `\\` unescaped. Anything else is trimmed of whitespace, then of quotes
/// and semicolons.
#[must_use]
pub fn default_filter(raw: &str) -> String {
    let token = raw.trim().trim_end_matches([';', '；']).trim_end();
    match quoted_inner(token) {
        Some(inner) => unescape(inner),
        None => token.trim_matches(STRIP_CHARS).to_string(),
    }
}

/// Contents of a `"..."` token whose inner quotes are all escaped
fn quoted_inner(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('"')?.strip_suffix('"')?;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '"' => return None,
            _ => {}
        }
    }
    Some(inner)
}

fn unescape(inner: &str) -> String {
    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => name.push(next),
                Some(next) => {
                    name.push(c);
                    name.push(next);
                }
                None => name.push(c),
            }
        } else {
            name.push(c);
        }
    }
    name
}

/// Split a statement on `->` into raw endpoint tokens.
///
/// `->` and `[` inside double-quoted names are part of the name. The first
/// `[` outside quotes opens the attribute list, which is dropped.
fn split_endpoints(statement: &str) -> Vec<&str> {
    let bytes = statement.as_bytes();
    let mut endpoints = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_quotes = false;
            }
        } else {
            match b {
                b'"' => in_quotes = true,
                b'[' => {
                    endpoints.push(&statement[start..i]);
                    return endpoints;
                }
                b'-' if bytes.get(i + 1) == Some(&b'>') => {
                    endpoints.push(&statement[start..i]);
                    i += 2;
                    start = i;
                    continue;
                }
                _ => {}
            }
        }
        i += 1;
    }

    endpoints.push(&statement[start..]);
    endpoints
}

/// A bare `"name";` statement, returned as its quoted token
fn node_statement(token: &str) -> Option<&str> {
    let token = token.trim().trim_end_matches([';', '；']).trim_end();
    quoted_inner(token).filter(|inner| !inner.is_empty()).map(|_| token)
}

/// Parse description text with the default node filter
pub fn load_str(text: &str) -> Result<DirectedGraph> {
    load_str_with(text, default_filter)
}

/// Parse description text, normalizing node tokens with `filter`.
///
/// # Errors
///
/// A repeated edge fails with [`crate::error::GraphError::DuplicateEdge`]
/// wrapped in the line number.
pub fn load_str_with<F>(text: &str, filter: F) -> Result<DirectedGraph>
where
    F: Fn(&str) -> String,
{
    let mut graph = DirectedGraph::new();

    for (index, line) in text.lines().enumerate() {
        let lineno = index + 1;
        let tokens = split_endpoints(line);

        if let [token] = tokens.as_slice() {
            if let Some(node) = node_statement(token) {
                graph.add_node(filter(node));
            } else if line.contains("->") {
                warn!("line {}: no edge found, skipped: {}", lineno, line.trim());
            }
            continue;
        }

        let endpoints: Vec<String> = tokens.into_iter().map(&filter).collect();
        if endpoints.iter().any(String::is_empty) {
            warn!("line {}: edge with empty endpoint skipped: {}", lineno, line.trim());
            continue;
        }

        for pair in endpoints.windows(2) {
            graph
                .add_edge(pair[0].as_str(), pair[1].as_str())
                .with_context(|| format!("line {lineno}"))?;
        }
    }

    Ok(graph)
}

/// Load a graph description file
pub fn load_file(path: &Path) -> Result<DirectedGraph> {
    info!("Loading graph from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let graph = load_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("{}: {}", path.display(), graph.summary());
    Ok(graph)
}

/// Load several graph description files, in order
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DirectedGraph>> {
    paths.iter().map(|p| load_file(p.as_ref())).collect()
}

fn quote(node: &str) -> String {
    format!("\"{}\"", node.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Serialize to DOT.
///
/// Keys without outgoing edges are written as node statements, so the key
/// set survives a write/load round trip.
#[must_use]
pub fn to_dot(graph: &DirectedGraph, name: &str) -> String {
    let edges = graph
        .edges()
        .map(|(from, to)| format!("    {} -> {};\n", quote(from), quote(to)));
    let isolated = graph
        .iter()
        .filter(|(_, targets)| targets.is_empty())
        .map(|(node, _)| format!("    {};\n", quote(node)));

    let mut dot = format!("digraph {name} {{\n");
    dot.extend(edges.chain(isolated));
    dot.push_str("}\n");
    dot
}

/// Write `graph` as DOT to `path`, creating parent directories
pub fn write_file(graph: &DirectedGraph, path: &Path, name: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, to_dot(graph, name))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} ({})", path.display(), graph.summary());
    Ok(())
}

/// Files directly inside `dir` whose name matches `pattern`, sorted
pub fn collect_dotfiles(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid file pattern: {pattern}"))?
        .compile_matcher();

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}
