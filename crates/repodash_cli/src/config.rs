//! Configuration file support for repodash.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `REPODASH_`, e.g., `REPODASH_GITHUB_TOKEN`)
//! 3. Config file (./repodash.toml, then ~/.config/repodash/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."        # or use REPODASH_GITHUB_TOKEN env var
//! username = "octocat"     # or use REPODASH_GITHUB_USERNAME env var
//! api_url = "https://api.github.com"  # GitHub Enterprise: https://host/api/v3
//!
//! [listing]
//! per_page = 100
//! max_pages = 1000
//! ```
//!
//! Keys containing an underscore (`api_url`, `per_page`, `max_pages`) can only
//! be set from a file, since `_` also separates sections in variable names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use repodash::aggregate::{AggregateOptions, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE};
use repodash::github::GITHUB_API_URL;
use serde::Deserialize;
use toml_edit::{DocumentMut, value};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub account and API settings.
    pub github: GitHubConfig,
    /// Pagination settings for repository listing.
    pub listing: ListingConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token.
    /// Can also be set via REPODASH_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// Username the token belongs to.
    /// Can also be set via REPODASH_GITHUB_USERNAME environment variable.
    pub username: Option<String>,
    /// API root. Defaults to https://api.github.com.
    pub api_url: Option<String>,
}

impl GitHubConfig {
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(GITHUB_API_URL)
    }
}

/// Pagination settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub per_page: u32,
    pub max_pages: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ListingConfig {
    pub fn options(&self) -> AggregateOptions {
        AggregateOptions::new(self.per_page, self.max_pages)
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/repodash/config.toml)
    /// 3. Local config file (./repodash.toml)
    /// 4. Environment variables with REPODASH_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("repodash.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./repodash.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., REPODASH_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("REPODASH")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "repodash").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save credentials to the default config file.
    pub fn save_credentials(username: &str, token: &str) -> io::Result<PathBuf> {
        let config_path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;
        save_credentials_to(&config_path, username, token)?;
        Ok(config_path)
    }

    /// Remove credentials from the default config file.
    ///
    /// Returns the file path if it existed and contained credentials.
    pub fn clear_credentials() -> io::Result<Option<PathBuf>> {
        let Some(config_path) = Self::default_config_path() else {
            return Ok(None);
        };
        if clear_credentials_at(&config_path)? {
            Ok(Some(config_path))
        } else {
            Ok(None)
        }
    }
}

fn read_document(path: &Path) -> io::Result<DocumentMut> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    // Parsed as a document so formatting and comments survive the rewrite
    content
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e)))
}

/// Write `[github] token` and `username` into the file at `path`.
///
/// Creates the file and parent directories if needed. Only those two keys
/// are touched; everything else in the file is preserved.
pub fn save_credentials_to(path: &Path, username: &str, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut doc = read_document(path)?;
    if !doc.contains_key("github") {
        doc["github"] = toml_edit::table();
    }
    doc["github"]["username"] = value(username);
    doc["github"]["token"] = value(token);

    fs::write(path, doc.to_string())
}

/// Remove `[github] token` and `username` from the file at `path`.
///
/// Returns whether anything was removed. A missing file is not an error.
pub fn clear_credentials_at(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let mut doc = read_document(path)?;
    let Some(github) = doc.get_mut("github").and_then(|item| item.as_table_like_mut()) else {
        return Ok(false);
    };

    let removed_token = github.remove("token").is_some();
    let removed_username = github.remove("username").is_some();
    if !removed_token && !removed_username {
        return Ok(false);
    }

    fs::write(path, doc.to_string())?;
    Ok(true)
}
