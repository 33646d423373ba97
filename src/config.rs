use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyzer::{default_rules, ReleaseRule};
use crate::error::{ReleaseError, Result};

/// File-backed configuration for version-release.
///
/// Every field has a default so an empty (or missing) `release.toml` is
/// valid; the file exists to override the rule table and file locations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_manifest_path")]
    pub manifest: String,

    #[serde(default = "default_changelog_path")]
    pub changelog: String,

    #[serde(default = "default_branch")]
    pub default_branch: String,

    #[serde(default = "default_npm_publish")]
    pub npm_publish: bool,

    #[serde(default = "default_rules")]
    pub rules: Vec<ReleaseRule>,
}

fn default_manifest_path() -> String {
    "package.json".to_string()
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_npm_publish() -> bool {
    true
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            manifest: default_manifest_path(),
            changelog: default_changelog_path(),
            default_branch: default_branch(),
            npm_publish: default_npm_publish(),
            rules: default_rules(),
        }
    }
}

/// Loads file configuration or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the current directory
/// 3. `release.toml` in the user config directory
/// 4. Defaults if no file found
pub fn load_file_config(config_path: Option<&str>) -> Result<FileConfig> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(FileConfig::default());
        }
    } else {
        return Ok(FileConfig::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("invalid configuration file: {}", e)))
}

/// Complete runtime configuration, sourced once at process start.
///
/// Credentials and identity come from the environment (the CI system's
/// variables); file locations and the rule table come from [FileConfig].
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub npm_publish: bool,
    pub default_branch: String,
    pub workdir: PathBuf,
    pub manifest_path: String,
    pub changelog_path: String,
    /// URL the release commit is pushed to; embeds the access token
    pub push_url: String,
    pub rules: Vec<ReleaseRule>,
}

impl Config {
    /// Builds the runtime configuration from the process environment.
    ///
    /// Required variables: `GH_TOKEN`, `CIRCLE_PROJECT_USERNAME`,
    /// `CIRCLE_PROJECT_REPONAME`. The git author comes from
    /// `VERSION_RELEASE_GIT_AUTHOR_NAME` (falling back to
    /// `CIRCLE_USERNAME`) and `VERSION_RELEASE_GIT_AUTHOR_EMAIL`.
    pub fn from_env(file: FileConfig) -> Result<Self> {
        let token = require_env("GH_TOKEN")?;
        let owner = require_env("CIRCLE_PROJECT_USERNAME")?;
        let repo = require_env("CIRCLE_PROJECT_REPONAME")?;

        let author_name = env::var("VERSION_RELEASE_GIT_AUTHOR_NAME")
            .or_else(|_| env::var("CIRCLE_USERNAME"))
            .ok();
        let author_email = env::var("VERSION_RELEASE_GIT_AUTHOR_EMAIL").ok();

        let push_url = format!("https://{}@github.com/{}/{}.git", token, owner, repo);

        Ok(Config {
            token,
            owner,
            repo,
            author_name,
            author_email,
            npm_publish: file.npm_publish,
            default_branch: file.default_branch,
            workdir: PathBuf::from("."),
            manifest_path: file.manifest,
            changelog_path: file.changelog,
            push_url,
            rules: file.rules,
        })
    }

    /// Absolute or workdir-relative path of the manifest file
    pub fn manifest_file(&self) -> PathBuf {
        self.workdir.join(&self.manifest_path)
    }

    /// Absolute or workdir-relative path of the changelog document
    pub fn changelog_file(&self) -> PathBuf {
        self.workdir.join(&self.changelog_path)
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ReleaseError::config(format!("required environment variable {} is not set", name))
        })
}
