// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Depcycles CLI - merge, filter, diff and break cycles in dependency graphs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use depcycles::commands::{self, OutputOptions};
use depcycles::reference::ReferenceList;
use indexmap::IndexSet;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depcycles")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "DEPCYCLES_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge several graph files into one
    Merge {
        /// Graph files to merge
        inputs: Vec<PathBuf>,

        /// Merge every matching file in this directory instead
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// File name pattern used with --dir
        #[arg(long)]
        pattern: Option<String>,

        /// Where to write the merged graph
        #[arg(short, long)]
        output: PathBuf,

        /// Remove edges whose target is not a node
        #[arg(long, conflicts_with = "fix_hanging_edges")]
        remove_hanging_edges: bool,

        /// Add nodes for edge targets that are not nodes
        #[arg(long)]
        fix_hanging_edges: bool,

        /// Remove nodes without any edge
        #[arg(long)]
        remove_zero_degree: bool,
    },

    /// Print node and edge counts
    Summary {
        /// Graph files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Compare graph nodes with reference package lists
    Diff {
        /// Graph files to compare
        inputs: Vec<PathBuf>,

        /// Compare every matching file in this directory instead
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// File name pattern used with --dir
        #[arg(long)]
        pattern: Option<String>,

        /// Packages that are kept (`<package> <level>` per line)
        #[arg(short, long)]
        reference: PathBuf,

        /// Every package known to the curators
        #[arg(long)]
        total: Option<PathBuf>,

        /// Directory for the node lists
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Restrict a graph to the packages of a reference list
    Filter {
        /// Graph file to filter
        input: PathBuf,

        /// Packages to keep (`<package> <level>` per line)
        #[arg(short, long)]
        reference: PathBuf,

        /// Directory for the filtered graph and reports
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Find dependency cycles after deleting anchor packages
    Cycles {
        /// Graph file to analyze
        input: PathBuf,

        /// Anchor package to delete first (repeatable)
        #[arg(short, long = "anchor")]
        anchors: Vec<String>,

        /// Reference list (`<package> <level>` per line) supplying anchors
        #[arg(long)]
        anchors_file: Option<PathBuf>,

        /// Only take anchors listed at this level in --anchors-file
        #[arg(long, requires = "anchors_file")]
        anchor_level: Option<String>,

        /// Smallest component reported as a cycle
        #[arg(long)]
        min_size: Option<usize>,

        /// Directory for cycle subgraphs and summary.json
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Cut edges of the largest cycle whose endpoints disagree on
        /// containing this substring, then report what is left
        #[arg(long)]
        break_between: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Print the user config file path instead
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = depcycles::config::load(cli.config.as_deref())?;
    let out = OutputOptions {
        json: cli.json,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    // Execute command
    match cli.command {
        Commands::Merge {
            inputs,
            dir,
            pattern,
            output,
            remove_hanging_edges,
            fix_hanging_edges,
            remove_zero_degree,
        } => {
            let pattern = pattern.unwrap_or_else(|| settings.dot_pattern.clone());
            let args = commands::merge::MergeArgs {
                inputs: commands::resolve_inputs(&inputs, dir.as_deref(), &pattern)?,
                output,
                cleanup: commands::merge::Cleanup {
                    remove_hanging_edges,
                    fix_hanging_edges,
                    remove_zero_degree,
                },
                graph_name: settings.graph_name,
            };
            commands::merge::run(args, out)
        }
        Commands::Summary { inputs } => commands::summary::run(&inputs, out),
        Commands::Diff {
            inputs,
            dir,
            pattern,
            reference,
            total,
            output_dir,
        } => {
            let pattern = pattern.unwrap_or_else(|| settings.dot_pattern.clone());
            let args = commands::diff::DiffArgs {
                inputs: commands::resolve_inputs(&inputs, dir.as_deref(), &pattern)?,
                reference,
                total,
                output_dir,
            };
            commands::diff::run(args, out)
        }
        Commands::Filter {
            input,
            reference,
            output_dir,
        } => {
            let args = commands::filter::FilterArgs {
                input,
                reference,
                output_dir,
                graph_name: settings.graph_name,
            };
            commands::filter::run(args, out)
        }
        Commands::Cycles {
            input,
            anchors,
            anchors_file,
            anchor_level,
            min_size,
            output_dir,
            break_between,
        } => {
            let mut all: IndexSet<String> = settings.anchors.into_iter().collect();
            if let Some(path) = anchors_file {
                let list = ReferenceList::load(&path)?;
                match &anchor_level {
                    Some(level) => all.extend(list.nodes_at_level(level).cloned()),
                    None => all.extend(list.nodes().cloned()),
                }
            }
            all.extend(anchors);

            let args = commands::cycles::CyclesArgs {
                input,
                anchors: all.into_iter().collect(),
                min_size: min_size.unwrap_or(settings.min_cycle_size),
                output_dir,
                break_between,
                graph_name: settings.graph_name,
            };
            commands::cycles::run(args, out)
        }
        Commands::Config { path } => commands::config::run(&settings, path, out),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
