//
//  stash-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the client settings from a TOML file stored in the platform-specific
//! configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/stash/config.toml`
//! - **macOS**: `~/Library/Application Support/stash/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\stash\config\config.toml`
//!
//! The location can be overridden with `--config` or `STASH_CONFIG`.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [server]
//! hostname = "stash.example.com"
//! user = "bob"
//! api_version = "1.0"
//! scheme = "https"
//! ```
//!
//! ## Notes
//!
//! - A missing file yields the defaults; only a missing hostname is fatal,
//!   and only once a command actually needs the server
//! - The password is never stored here

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::StashError;

/// Complete configuration file.
///
/// # Examples
///
/// ```rust
/// use stash_client::config::Config;
///
/// let config = Config::parse("[server]\nhostname = \"stash.example.com\"\n").unwrap();
/// assert_eq!(config.server.hostname.as_deref(), Some("stash.example.com"));
/// assert_eq!(config.server.api_version, "1.0");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// The `[server]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host name, optionally with a port. A protocol prefix is tolerated.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Account name to authenticate as.
    #[serde(default)]
    pub user: Option<String>,

    /// REST API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `https`, or `http` for plain installations.
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_api_version() -> String {
    "1.0".to_string()
}

fn default_scheme() -> String {
    "https".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            user: None,
            api_version: default_api_version(),
            scheme: default_scheme(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or the default location.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        match config.server.scheme.as_str() {
            "http" | "https" => Ok(config),
            other => anyhow::bail!("unsupported scheme {}, expected http or https", other),
        }
    }

    /// Returns the path of the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Picks the host: an explicit override wins over the file.
    ///
    /// # Errors
    ///
    /// `Configuration` when neither names a host.
    pub fn hostname(&self, host_override: Option<&str>) -> std::result::Result<String, StashError> {
        host_override
            .or(self.server.hostname.as_deref())
            .map(normalize_host)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| {
                StashError::Configuration(
                    "no server hostname configured; set [server] hostname or pass --host"
                        .to_string(),
                )
            })
    }
}

/// Strips protocol prefixes and a trailing slash, and lowercases.
///
/// ```rust
/// use stash_client::config::normalize_host;
///
/// assert_eq!(normalize_host("https://Stash.Example.com/"), "stash.example.com");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}
