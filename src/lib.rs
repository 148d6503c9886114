//! rstree: build ordered parent-pointer forests from flat keyed records.
//!
//! Records stored as flat rows with a self-referencing parent key (menus,
//! category trees, org charts) are linked by key into a forest of root records
//! that own their children. Siblings can be sorted at every level with a
//! single or composite comparator, records with a missing parent are handled by
//! an [`OrphanPolicy`](domain::OrphanPolicy), and the result can be queried by
//! level or depth.
//!
//! Architecture:
//! - `domain`: capability traits, comparators, the tree builder, and queries
//! - `record`: a ready-made record type and TOML record files
//! - `render`: termtree display of a forest
//! - `config`: layered settings for policies and sort keys
//! - `cli`: command line argument parsing and dispatch

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exitcode;
pub mod record;
pub mod render;
pub mod util;

pub use domain::{
    max_level, nodes_by_level, ForestExt, IndexedForest, OrphanPolicy, TreeBuilder, TreeError,
    TreeNode, TreeResult,
};
pub use error::{AppError, AppResult};
