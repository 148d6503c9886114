//! Integration tests for layered Settings loading.
//!
//! These tests pass explicit file lists and skip the environment layer, so no
//! global config or `RSTREE_*` variable leaks in.

use std::fs;

use tempfile::TempDir;

use rstree::config::{local_config_path, Settings};
use rstree::domain::{DuplicateKeyPolicy, OrphanPolicy, SortKey};
use rstree::AppError;

#[test]
fn given_no_config_files_when_load_then_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let missing = local_config_path(dir.path());

    // Act
    let settings = Settings::load_from(&[missing], false).expect("load settings");

    // Assert
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_load_then_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(
        &path,
        r#"
orphan_policy = "collect"
sort = ["order", "name"]
max_records = 500
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(&[path], false).expect("load settings");

    // Assert
    assert_eq!(settings.orphan_policy, OrphanPolicy::Collect);
    assert_eq!(settings.duplicate_keys, DuplicateKeyPolicy::Replace);
    assert_eq!(settings.sort, vec![SortKey::Order, SortKey::Name]);
    assert_eq!(settings.max_records, Some(500));
}

#[test]
fn given_two_layers_when_load_then_later_file_wins_key_by_key() {
    // Arrange
    let global_dir = TempDir::new().unwrap();
    let local_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("rstree.toml");
    let local = local_config_path(local_dir.path());
    fs::write(
        &global,
        r#"
orphan_policy = "error"
duplicate_keys = "reject"
sort = ["id"]
"#,
    )
    .unwrap();
    fs::write(&local, "sort = [\"name\"]\n").unwrap();

    // Act
    let settings = Settings::load_from(&[global, local], false).expect("load settings");

    // Assert
    assert_eq!(settings.orphan_policy, OrphanPolicy::Error);
    assert_eq!(settings.duplicate_keys, DuplicateKeyPolicy::Reject);
    assert_eq!(settings.sort, vec![SortKey::Name]);
}

#[test]
fn given_unknown_policy_when_load_then_config_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "orphan_policy = \"adopt\"\n").unwrap();

    // Act
    let result = Settings::load_from(&[path], false);

    // Assert
    assert!(matches!(result, Err(AppError::Config { .. })));
}

#[test]
fn given_loaded_settings_when_rendering_toml_then_it_loads_back() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    let settings = Settings {
        orphan_policy: OrphanPolicy::Collect,
        sort: vec![SortKey::Order],
        ..Settings::default()
    };

    // Act
    fs::write(&path, settings.to_toml().unwrap()).unwrap();
    let reloaded = Settings::load_from(&[path], false).expect("load settings");

    // Assert
    assert_eq!(reloaded, settings);
}

#[test]
fn given_rstree_env_vars_when_load_with_env_then_they_override_files() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "orphan_policy = \"error\"\nsort = [\"id\"]\n").unwrap();
    std::env::set_var("RSTREE_ORPHAN_POLICY", "collect");
    std::env::set_var("RSTREE_SORT", "order,name");
    std::env::set_var("RSTREE_MAX_RECORDS", "7");

    // Act
    let result = Settings::load_from(&[path], true);
    std::env::remove_var("RSTREE_ORPHAN_POLICY");
    std::env::remove_var("RSTREE_SORT");
    std::env::remove_var("RSTREE_MAX_RECORDS");

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.orphan_policy, OrphanPolicy::Collect);
    assert_eq!(settings.sort, vec![SortKey::Order, SortKey::Name]);
    assert_eq!(settings.max_records, Some(7));
}
