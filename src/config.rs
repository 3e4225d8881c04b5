use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::github::RepoRef;

const CONFIG_FILE: &str = ".fork-radar.toml";
const DEFAULT_MAX_DEPTH: u32 = 2;
const DEFAULT_OUTPUT_PATH: &str = "public/index.html";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .fork-radar.toml.
/// All fields are optional; the tool works with zero config when the
/// repository comes from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Root repository to scan when none is given on the command line
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Fork-walk settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// How many levels of forks-of-forks to descend into
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Where the HTML report lands; parent directories are created on demand
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

impl Config {
    /// Load configuration from .fork-radar.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// falls back to GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    /// Root repository from the [repository] section, when both halves are set.
    pub fn repo_ref(&self) -> Option<RepoRef> {
        match (&self.repository.owner, &self.repository.repo) {
            (Some(owner), Some(repo)) => Some(RepoRef::new(owner.clone(), repo.clone())),
            _ => None,
        }
    }
}
