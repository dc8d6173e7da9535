//! Configuration loading and path resolution
//!
//! Each path setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; the compiled defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "ABCT_ROOT_FOLDER";
/// Environment variable overriding the database file
pub const ENV_DATABASE: &str = "ABCT_DATABASE";
/// Environment variable overriding the books directory
pub const ENV_BOOKS_DIR: &str = "ABCT_BOOKS_DIR";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "abc_tunes.db";
/// Books directory used when nothing else is configured
pub const DEFAULT_BOOKS_DIR: &str = "abc_books";

/// What the corpus loader does when a book folder or file cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadErrorPolicy {
    /// Stop the whole load and report the error
    #[default]
    Abort,
    /// Log a warning, skip the offending entry and keep going
    Skip,
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database (and anything else the catalog writes)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database file; defaults to `<root_folder>/abc_tunes.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Corpus root laid out as `<books_dir>/<book_number>/*.abc`
    #[serde(default)]
    pub books_dir: Option<PathBuf>,

    #[serde(default)]
    pub on_load_error: LoadErrorPolicy,

    /// HTTP port of the review service
    #[serde(default = "default_review_port")]
    pub review_port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_review_port() -> u16 {
    5740
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            books_dir: None,
            on_load_error: LoadErrorPolicy::default(),
            review_port: default_review_port(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file; a missing or malformed file is an error
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the config at `explicit` if given, otherwise the platform config file
    ///
    /// Only the platform file may be absent; an explicitly named file must exist.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match config_file_path() {
            Some(path) if path.exists() => {
                info!("Loading config file: {}", path.display());
                Self::load(&path)
            }
            _ => {
                debug!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file location: `<config_dir>/abct/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("abct").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("abct"))
        .unwrap_or_else(|| PathBuf::from("./abct_data"))
}

fn resolve_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&PathBuf>,
) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    toml_value.cloned()
}

/// Resolve the root folder (priority 4 is the OS default)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    resolve_path(cli_arg, ENV_ROOT_FOLDER, config.root_folder.as_ref())
        .unwrap_or_else(default_root_folder)
}

/// Resolve the database file (priority 4 is `<root_folder>/abc_tunes.db`)
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    root_folder: &Path,
    config: &TomlConfig,
) -> PathBuf {
    resolve_path(cli_arg, ENV_DATABASE, config.database_path.as_ref())
        .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME))
}

/// Resolve the books directory (priority 4 is `./abc_books`)
pub fn resolve_books_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    resolve_path(cli_arg, ENV_BOOKS_DIR, config.books_dir.as_ref())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BOOKS_DIR))
}

/// Create the root folder if missing
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    if !root_folder.exists() {
        std::fs::create_dir_all(root_folder)?;
        info!("Created root folder: {}", root_folder.display());
    }
    Ok(())
}
