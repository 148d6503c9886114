//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::{DuplicateKeyPolicy, OrphanPolicy, SortKey};

/// Build and inspect parent-pointer forests from flat record files
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .rstree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "RSTREE_CONFIG_DIR", value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(flatten)]
    pub build: BuildArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for the configured build settings
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Disposition of records whose parent is missing
    #[arg(long, value_enum, global = true)]
    pub orphans: Option<OrphanPolicy>,

    /// Handling of records sharing a key
    #[arg(long, value_enum, global = true)]
    pub duplicates: Option<DuplicateKeyPolicy>,

    /// Sibling sort keys in priority order, e.g. --sort order,name
    #[arg(long, value_enum, value_delimiter = ',', global = true)]
    pub sort: Option<Vec<SortKey>>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the forest as a tree
    Tree {
        /// Record file (TOML, [[records]] tables)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List records level by level
    Levels {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the deepest level (-1 for an empty forest)
    Depth {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List records without children
    Leaves {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
