//! Integration tests for the layered configuration: defaults, TOML file,
//! environment variables and CLI flags.

use clap::Parser;
use copycure::cli::Cli;
use copycure::config::{Config, ConfigError, ScanOptions};
use copycure::index::IndexMode;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all COPYCURE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("COPYCURE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
mode = "mem"
exclude = [".git/", "node_modules/"]
database = "/var/tmp/cc.db"
delete_empty = true
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.mode, IndexMode::Mem);
    assert_eq!(config.exclude, vec![".git/", "node_modules/"]);
    assert_eq!(config.database, PathBuf::from("/var/tmp/cc.db"));
    assert!(config.delete_empty);
}

#[test]
fn test_missing_file_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "exclude = [\".venv/\"]\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.mode, IndexMode::Sql);
    assert_eq!(config.exclude, vec![".venv/"]);
    assert!(!config.delete_empty);
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "mode = \"sql\"\n").unwrap();

    std::env::set_var("COPYCURE_MODE", "mem");
    std::env::set_var("COPYCURE_DELETE_EMPTY", "true");
    let config = Config::load_from_path(&config_path);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.mode, IndexMode::Mem);
    assert!(config.delete_empty);
}

#[test]
fn test_config_env_selects_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("elsewhere.toml");
    fs::write(&config_path, "database = \"/srv/index.db\"\n").unwrap();

    std::env::set_var("COPYCURE_CONFIG", &config_path);
    assert_eq!(Config::config_path(), Some(config_path.clone()));
    let config = Config::load();
    clear_env();

    assert_eq!(config.unwrap().database, PathBuf::from("/srv/index.db"));
}

#[test]
fn test_invalid_mode_in_file_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "mode = \"disk\"\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_cli_flags_override_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "mode = \"mem\"\nexclude = [\".git/\"]\ndatabase = \"/srv/index.db\"\n",
    )
    .unwrap();
    let config = Config::load_from_path(&config_path).unwrap();

    let cli = Cli::try_parse_from([
        "copycure", "-i", "/photos", "-m", "sql", "-x", "thumbs/", "--db", "/tmp/run.db",
    ])
    .unwrap();
    let options = ScanOptions::resolve(&cli, config).unwrap();

    assert_eq!(options.root, PathBuf::from("/photos"));
    assert_eq!(options.mode, IndexMode::Sql);
    assert_eq!(options.exclude, vec!["thumbs/"]);
    assert_eq!(options.database, PathBuf::from("/tmp/run.db"));
}
