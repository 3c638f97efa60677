//! CLI command definitions using clap
//!
//! Defines the command structure for the `douglas` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::Overrides;

/// douglas - run declaratively configured apps and browse their records
#[derive(Parser, Debug)]
#[command(name = "douglas", version, about, long_about = None)]
pub struct Cli {
    /// Root data directory (databases live in <DATA_DIR>/databases)
    #[arg(long, env = "DOUGLAS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding <app>.toml declarations
    #[arg(long, env = "DOUGLAS_APPS_DIR", global = true)]
    pub apps_dir: Option<PathBuf>,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            apps_dir: self.apps_dir.clone(),
            quiet: self.quiet,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available apps
    #[command(visible_alias = "ls")]
    Apps,

    /// Interactively browse and delete an app's records
    Browse(BrowseArgs),

    /// Manage app databases
    Db(DbArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Browse Command
// ─────────────────────────────────────────────────────────────────────────────

/// Browser arguments
#[derive(Parser, Debug)]
pub struct BrowseArgs {
    /// App name
    pub app: String,

    /// Model to browse (required when the app declares several)
    #[arg(long)]
    pub model: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Db Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Database commands
#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Model to operate on (required when the app declares several)
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// List databases with their sizes
    List,

    /// Create missing tables for every app (or one app)
    Init {
        /// Only initialise this app
        app: Option<String>,
    },

    /// Save a record
    Save {
        /// App name
        app: String,

        /// Record content (JSON); use - to read from stdin
        content: String,
    },

    /// Print an app's records, newest first
    Entries {
        /// App name
        app: String,
    },

    /// Count an app's records
    Count {
        /// App name
        app: String,
    },

    /// Delete records by id
    Delete {
        /// App name
        app: String,

        /// Record ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}
