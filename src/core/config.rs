//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `~/.issue-flow/config.yaml` (or an explicit file)
//! 3. `ISSUE_FLOW_*` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::store::DATA_DIR;

const CONFIG_FILE: &str = "config.yaml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

/// Issue Flow user configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config format version
    pub version: Option<String>,

    /// Database file overriding `~/.issue-flow/database.db`
    pub database: Option<PathBuf>,

    pub settings: Settings,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Editor command used to open worktrees
    pub editor: String,

    /// Enable the coding-assistant integration for new projects
    pub opencode_enabled: bool,

    /// Directory new project worktrees are placed under
    pub worktree_base: Option<PathBuf>,

    /// Verbose logging
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: "code".to_string(),
            opencode_enabled: true,
            worktree_base: home_dir().map(|home| home.join("issue-worktrees")),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from the default file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Load configuration from an explicit file and the environment
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::read_file(path)?,
            _ => Config::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file deserializes to null; treat it as "no overrides"
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay environment variables
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(database) = var("ISSUE_FLOW_DATABASE") {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(editor) = var("ISSUE_FLOW_EDITOR") {
            self.settings.editor = editor;
        }
        if let Some(base) = var("ISSUE_FLOW_WORKTREE_BASE") {
            self.settings.worktree_base = Some(PathBuf::from(base));
        }
        if let Some(verbose) = var("ISSUE_FLOW_VERBOSE") {
            self.settings.verbose = verbose == "1" || verbose.eq_ignore_ascii_case("true");
        }
    }

    /// Path to the user config file
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Directory holding the user config and database
    pub fn config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(DATA_DIR))
    }

    /// Worktree directory for a project when none was given
    pub fn default_worktree_dir(&self, project_id: &str) -> Option<PathBuf> {
        self.settings
            .worktree_base
            .as_ref()
            .map(|base| base.join(project_id))
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}
