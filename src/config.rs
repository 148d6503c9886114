//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Local config: `<dir>/.rstree.toml`
//! 4. Environment variables: `RSTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    DuplicateKeyPolicy, HasId, HasName, HasOrder, OrphanPolicy, SortKey, TreeBuilder, TreeNode,
};
use crate::error::AppError;

/// Unified configuration for rstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Disposition of records whose parent is missing (default: ignore)
    pub orphan_policy: OrphanPolicy,
    /// Handling of records sharing a key (default: replace)
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Sibling sort criteria in priority order; empty keeps input order
    pub sort: Vec<SortKey>,
    /// Upper bound on records accepted from a record file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,
}

/// Get the XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".rstree.toml")
}

fn config_err(e: ConfigError) -> AppError {
    AppError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.rstree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, AppError> {
        let mut files = Vec::new();
        if let Some(global_path) = global_config_path() {
            files.push(global_path);
        }
        if let Some(dir) = local_dir {
            files.push(local_config_path(dir));
        }
        Self::load_from(&files, true)
    }

    /// Load defaults, then each existing file in order, then optionally `RSTREE_*` variables.
    ///
    /// Later files override earlier ones key by key; `sort` is replaced, not merged.
    #[instrument(level = "debug")]
    pub fn load_from(files: &[PathBuf], with_env: bool) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .set_default("orphan_policy", "ignore")
            .map_err(config_err)?
            .set_default("duplicate_keys", "replace")
            .map_err(config_err)?
            .set_default("sort", Vec::<String>::new())
            .map_err(config_err)?;

        for path in files {
            if path.exists() {
                debug!(path = %path.display(), "loading config file");
                builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
            }
        }

        if with_env {
            builder = builder.add_source(
                // Without an explicit prefix separator, "__" would also follow the prefix
                Environment::with_prefix("RSTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sort")
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Apply the policies and sort keys to a builder.
    pub fn configure<N, C>(&self, builder: TreeBuilder<N, C>) -> TreeBuilder<N, C>
    where
        N: TreeNode + HasId + HasName + HasOrder + 'static,
    {
        let builder = builder
            .with_orphan_policy(self.orphan_policy)
            .with_duplicate_keys(self.duplicate_keys);
        match SortKey::comparator::<N>(&self.sort) {
            Some(comparator) => builder.with_comparator(comparator),
            None => builder.without_comparator(),
        }
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
