//! CLI argument definitions using clap
//!
//! Commands:
//! - querydeck run [SQL] [--search s] [--sort col [--desc]] [--page n] [--page-size n]
//! - querydeck editor get | set <SQL>
//! - querydeck history list | select <i> | remove <i> | clear
//! - querydeck saved list | select <i> | save --name <n> [SQL] | delete <i>
//! - querydeck schema [--table T]
//! - querydeck tab [TAB]
//! - querydeck state
//! - querydeck shell

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// querydeck - read-only SQL explorer over a bundled sales dataset
#[derive(Parser, Debug)]
#[command(name = "querydeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./querydeck.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a query (the editor contents if none given) and print a page of rows
    Run {
        /// Query text
        sql: Option<String>,

        /// Keep rows containing this text in any column
        #[arg(long)]
        search: Option<String>,

        /// Sort by this column
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 1-based page to show
        #[arg(long)]
        page: Option<usize>,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Read or replace the editor contents
    Editor {
        #[command(subcommand)]
        action: EditorAction,
    },

    /// Inspect or edit the query history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Inspect or edit saved queries
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Show the schema
    Schema {
        /// Only this table
        #[arg(long)]
        table: Option<String>,
    },

    /// Show or select the active tab
    Tab {
        /// results, history, saved or schema
        tab: Option<String>,
    },

    /// Show the persisted workspace state
    State,

    /// Read JSON requests from stdin, one per line, and answer each on stdout
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum EditorAction {
    /// Print the editor contents
    Get,
    /// Replace the editor contents
    Set { sql: String },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List entries, newest first
    List,
    /// Load an entry into the editor
    Select { index: usize },
    /// Remove an entry
    Remove { index: usize },
    /// Remove every entry
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SavedAction {
    /// List saved queries, built-ins first
    List,
    /// Load a saved query into the editor
    Select { index: usize },
    /// Save a query (the editor contents if none given)
    Save {
        #[arg(long)]
        name: String,
        sql: Option<String>,
    },
    /// Delete a saved query
    Delete { index: usize },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
