//! Command execution

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{BuildArgs, Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{ForestExt, TreeBuilder, TreeError};
use crate::record::{load_records, Record};
use crate::render::render_string;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `rstree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config => {
            let settings = effective_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        Commands::Tree { file } => cmd_tree(&build_forest(cli, file)?),
        Commands::Levels { file } => cmd_levels(&build_forest(cli, file)?),
        Commands::Depth { file } => cmd_depth(&build_forest(cli, file)?),
        Commands::Leaves { file } => cmd_leaves(&build_forest(cli, file)?),
    }
}

/// Layered settings with command line overrides on top.
fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let local_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| {
            CliError::App(crate::error::AppError::io("resolve current directory", e))
        })?,
    };
    let settings = Settings::load(Some(&local_dir))?;
    Ok(apply_overrides(settings, &cli.build))
}

fn apply_overrides(mut settings: Settings, args: &BuildArgs) -> Settings {
    if let Some(policy) = args.orphans {
        settings.orphan_policy = policy;
    }
    if let Some(policy) = args.duplicates {
        settings.duplicate_keys = policy;
    }
    if let Some(sort) = &args.sort {
        settings.sort = sort.clone();
    }
    settings
}

/// Orphan handler for the command line: the record file path is the context.
fn warn_orphan(file: &PathBuf, key: &u64, parent_key: &u64, _err: &TreeError) {
    output::warning(&format!(
        "{}: record {} references missing parent {}",
        file.display(),
        key,
        parent_key
    ));
}

#[instrument(level = "debug", skip(cli))]
fn build_forest(cli: &Cli, file: &Path) -> CliResult<Vec<Record>> {
    let settings = effective_settings(cli)?;
    debug!(?settings, "effective settings");

    let records = load_records(file, settings.max_records)?;
    let builder = settings
        .configure(TreeBuilder::with_context(file.to_path_buf()))
        .with_error_handler(warn_orphan);
    Ok(builder.build(records)?)
}

fn cmd_tree(forest: &[Record]) -> CliResult<()> {
    print!("{}", render_string(forest));
    Ok(())
}

/// `("Level n", "a(1), b(2)")` per level, roots first.
fn level_lines(forest: &[Record]) -> Vec<(String, String)> {
    forest
        .nodes_by_level()
        .into_iter()
        .map(|(level, nodes)| (format!("Level {level}"), nodes.iter().join(", ")))
        .collect()
}

/// Deepest level, -1 for an empty forest.
fn depth_value(forest: &[Record]) -> i64 {
    forest.max_level().map_or(-1, |d| d as i64)
}

fn cmd_levels(forest: &[Record]) -> CliResult<()> {
    for (label, nodes) in level_lines(forest) {
        output::level(&label, &nodes);
    }
    Ok(())
}

fn cmd_depth(forest: &[Record]) -> CliResult<()> {
    output::info(&depth_value(forest));
    Ok(())
}

fn cmd_leaves(forest: &[Record]) -> CliResult<()> {
    for leaf in forest.leaves() {
        output::info(leaf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    use crate::domain::{OrphanPolicy, SortKey};

    const MENU: &str = r#"
[[records]]
id = 1
name = "File"
order = 2

[[records]]
id = 2
name = "Edit"
order = 1

[[records]]
id = 3
parent_id = 1
name = "Open"

[[records]]
id = 4
parent_id = 7
name = "Stray"
"#;

    /// Parses `args` with `-C` pointing at an empty config dir, so no local settings leak in.
    fn parse(dir: &TempDir, args: &[&str]) -> Cli {
        let config_dir = dir.path().to_string_lossy().to_string();
        let mut argv = vec!["rstree", "-C", config_dir.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn record_file(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("records.toml");
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn forest_for(cli: &Cli) -> Vec<Record> {
        match &cli.command {
            Some(Commands::Tree { file })
            | Some(Commands::Levels { file })
            | Some(Commands::Depth { file })
            | Some(Commands::Leaves { file }) => build_forest(cli, file).unwrap(),
            other => panic!("not a forest command: {other:?}"),
        }
    }

    #[test]
    fn given_record_file_when_listing_levels_then_cli_flags_shape_output() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let file = record_file(&dir, MENU);
        let cli = parse(&dir, &["--sort", "order", "--orphans", "collect", "levels", &file]);

        // Act
        let lines = level_lines(&forest_for(&cli));

        // Assert
        assert_eq!(
            lines,
            vec![
                ("Level 0".to_string(), "Stray(4), Edit(2), File(1)".to_string()),
                ("Level 1".to_string(), "Open(3)".to_string()),
            ]
        );
        assert!(execute_command(&cli).is_ok());
    }

    #[test]
    fn given_record_file_when_rendering_tree_then_stray_record_ignored_by_default() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let file = record_file(&dir, MENU);
        let cli = parse(&dir, &["tree", &file]);

        // Act
        let text = render_string(&forest_for(&cli));

        // Assert
        assert!(text.starts_with("File(1)\n"));
        assert!(text.contains("Open(3)"));
        assert!(!text.contains("Stray(4)"));
        assert!(execute_command(&cli).is_ok());
    }

    #[rstest::rstest]
    #[case("", -1)]
    #[case(MENU, 1)]
    fn given_record_file_when_measuring_depth_then_minus_one_only_when_empty(
        #[case] content: &str,
        #[case] expected: i64,
    ) {
        // Arrange
        let dir = TempDir::new().unwrap();
        let file = record_file(&dir, content);
        let cli = parse(&dir, &["depth", &file]);

        // Act
        let depth = depth_value(&forest_for(&cli));

        // Assert
        assert_eq!(depth, expected);
        assert!(execute_command(&cli).is_ok());
    }

    #[test]
    fn given_missing_record_file_when_executing_then_io_exit_code() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml").to_string_lossy().to_string();
        let cli = parse(&dir, &["leaves", &missing]);

        let err = execute_command(&cli).unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }

    #[test]
    fn given_cli_overrides_when_applied_then_replace_settings() {
        let settings = Settings {
            sort: vec![SortKey::Id],
            ..Settings::default()
        };
        let args = BuildArgs {
            orphans: Some(OrphanPolicy::Collect),
            duplicates: None,
            sort: Some(vec![SortKey::Name]),
        };

        let merged = apply_overrides(settings, &args);

        assert_eq!(merged.orphan_policy, OrphanPolicy::Collect);
        assert_eq!(merged.sort, vec![SortKey::Name]);
    }

    #[test]
    fn given_no_overrides_when_applied_then_settings_unchanged() {
        let settings = Settings {
            max_records: Some(3),
            ..Settings::default()
        };
        assert_eq!(apply_overrides(settings.clone(), &BuildArgs::default()), settings);
    }
}
