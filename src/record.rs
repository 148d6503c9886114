//! Ready-made record type and TOML record files.
//!
//! A record file is a list of `[[records]]` tables:
//!
//! ```toml
//! [[records]]
//! id = 1
//! name = "Root"
//!
//! [[records]]
//! id = 2
//! parent_id = 1
//! name = "Child"
//! order = 2
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{HasId, HasName, HasOrder, TreeNode};
use crate::error::{AppError, AppResult};

/// A flat row with a self-referencing parent id. `parent_id == 0` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub parent_id: u64,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(skip)]
    pub children: Vec<Record>,
}

impl Record {
    pub fn new(id: u64, parent_id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            order: 0,
            children: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }
}

impl TreeNode for Record {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }

    fn parent_key(&self) -> u64 {
        self.parent_id
    }

    fn is_root(&self) -> bool {
        self.parent_id == 0
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn set_children(&mut self, children: Vec<Self>) {
        self.children = children;
    }
}

impl HasId for Record {
    fn id(&self) -> u64 {
        self.id
    }
}

impl HasName for Record {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasOrder for Record {
    fn order(&self) -> i64 {
        self.order
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default)]
    records: Vec<Record>,
}

/// Parses record tables from TOML text.
pub fn parse_records(content: &str) -> Result<Vec<Record>, toml::de::Error> {
    toml::from_str::<RecordFile>(content).map(|file| file.records)
}

/// Loads a record file, refusing files with more than `max_records` entries.
#[instrument(level = "debug")]
pub fn load_records(path: &Path, max_records: Option<usize>) -> AppResult<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("read {}", path.display()), e))?;
    let records = parse_records(&content).map_err(|e| AppError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    if let Some(limit) = max_records {
        if records.len() > limit {
            return Err(AppError::TooManyRecords {
                count: records.len(),
                limit,
            });
        }
    }

    debug!(count = records.len(), "records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_toml_tables_when_parsing_then_defaults_fill_missing_fields() {
        let content = r#"
[[records]]
id = 1
name = "Root"

[[records]]
id = 2
parent_id = 1
name = "Child"
order = -3
"#;
        let records = parse_records(content).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_root());
        assert_eq!(records[0].order, 0);
        assert_eq!(records[1].parent_key(), 1);
        assert_eq!(records[1].order, -3);
        assert!(records[1].children.is_empty());
    }

    #[test]
    fn given_empty_document_when_parsing_then_no_records() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn given_record_when_displayed_then_name_and_id() {
        assert_eq!(Record::new(7, 0, "Menu").to_string(), "Menu(7)");
    }
}
