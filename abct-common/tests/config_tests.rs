//! Tests for configuration resolution priority
//!
//! Uses serial_test because several tests set ABCT_* environment variables.

use abct_common::config::{
    default_root_folder, resolve_books_dir, resolve_database_path, resolve_root_folder,
    LoadErrorPolicy, TomlConfig, DATABASE_FILE_NAME, ENV_BOOKS_DIR, ENV_DATABASE,
    ENV_ROOT_FOLDER,
};
use abct_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_ROOT_FOLDER);
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_BOOKS_DIR);
}

#[test]
#[serial]
fn test_root_folder_falls_back_to_default() {
    clear_env();
    let root = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(root, default_root_folder());
}

#[test]
#[serial]
fn test_root_folder_priority_cli_env_toml() {
    clear_env();
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

    env::set_var(ENV_ROOT_FOLDER, "/from/env");
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));

    let cli = Path::new("/from/cli");
    assert_eq!(resolve_root_folder(Some(cli), &config), PathBuf::from("/from/cli"));

    clear_env();
}

#[test]
#[serial]
fn test_database_path_defaults_inside_root() {
    clear_env();
    let root = PathBuf::from("/srv/abct");
    let db = resolve_database_path(None, &root, &TomlConfig::default());
    assert_eq!(db, root.join(DATABASE_FILE_NAME));

    env::set_var(ENV_DATABASE, "/tmp/other.db");
    let db = resolve_database_path(None, &root, &TomlConfig::default());
    assert_eq!(db, PathBuf::from("/tmp/other.db"));
    clear_env();
}

#[test]
#[serial]
fn test_books_dir_default_and_env() {
    clear_env();
    assert_eq!(
        resolve_books_dir(None, &TomlConfig::default()),
        PathBuf::from("abc_books")
    );

    env::set_var(ENV_BOOKS_DIR, "/data/books");
    assert_eq!(
        resolve_books_dir(None, &TomlConfig::default()),
        PathBuf::from("/data/books")
    );
    clear_env();
}

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "books_dir = \"books\"\non_load_error = \"skip\"\n").unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.books_dir, Some(PathBuf::from("books")));
    assert_eq!(config.on_load_error, LoadErrorPolicy::Skip);
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = TomlConfig::load_or_default(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "review_port = \"not a number\"").unwrap();

    let err = TomlConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
