//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural problems found while linking records into a forest.
///
/// Keys are carried in their `Debug` rendering so the error stays independent
/// of the record's key type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {key} references missing parent {parent_key}")]
    MissingParent { key: String, parent_key: String },

    #[error("duplicate node key: {key}")]
    DuplicateKey { key: String },

    #[error("internal tree operation failed: {0}")]
    Internal(String),
}

impl TreeError {
    pub fn missing_parent(key: &impl std::fmt::Debug, parent_key: &impl std::fmt::Debug) -> Self {
        Self::MissingParent {
            key: format!("{key:?}"),
            parent_key: format!("{parent_key:?}"),
        }
    }

    pub fn duplicate_key(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateKey {
            key: format!("{key:?}"),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_parent_when_displayed_then_names_both_keys() {
        let err = TreeError::missing_parent(&3u64, &999u64);
        assert_eq!(err.to_string(), "node 3 references missing parent 999");
    }

    #[test]
    fn given_string_key_when_duplicate_then_key_is_quoted() {
        let err = TreeError::duplicate_key(&"X".to_string());
        assert_eq!(err.to_string(), "duplicate node key: \"X\"");
    }
}
