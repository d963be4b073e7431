//! Proxy configuration (autoproxy.toml)
//!
//! Selects which remote interfaces get proxies. The file flag and the
//! `AUTOPROXY_ENABLE` environment variable must both allow proxying.
//!
//! ```toml
//! enable = true
//! clients = []
//! base-packages = ["demo.api"]
//! base-package-classes = ["demo.web.Application"]
//! default-package = "demo"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discovery::package_of;
use crate::error::ConfigError;

/// Environment variable that can veto proxying
pub const ENABLE_ENV: &str = "AUTOPROXY_ENABLE";

/// Registrar configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ProxyConfig {
    /// Master switch (default: true)
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// Interfaces to proxy by name; when set, no scanning happens
    #[serde(default)]
    pub clients: Vec<String>,

    /// Packages to scan for remote interfaces
    #[serde(default)]
    pub base_packages: Vec<String>,

    /// Types whose packages are scanned as well
    #[serde(default)]
    pub base_package_classes: Vec<String>,

    /// Package scanned when no other base package is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_package: Option<String>,
}

fn default_enable() -> bool {
    true
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            clients: Vec::new(),
            base_packages: Vec::new(),
            base_package_classes: Vec::new(),
            default_package: None,
        }
    }
}

impl ProxyConfig {
    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Whether proxying is on, given the raw value of [`ENABLE_ENV`].
    ///
    /// An absent variable leaves the decision to the file flag.
    pub fn is_enabled_with(&self, env: Option<&str>) -> Result<bool, ConfigError> {
        let env_enabled = match env {
            None => true,
            Some(raw) => parse_flag(raw).ok_or_else(|| ConfigError::InvalidFlag {
                name: ENABLE_ENV.to_string(),
                value: raw.to_string(),
            })?,
        };
        Ok(self.enable && env_enabled)
    }

    /// Whether proxying is on, reading [`ENABLE_ENV`] from the process
    pub fn is_enabled(&self) -> Result<bool, ConfigError> {
        self.is_enabled_with(std::env::var(ENABLE_ENV).ok().as_deref())
    }

    /// Packages to scan, sorted and deduplicated.
    ///
    /// Blank entries are ignored. With nothing configured this is the
    /// default package, or the root package `""` if there is none.
    pub fn resolved_base_packages(&self) -> Vec<String> {
        let mut packages: Vec<String> = self
            .base_packages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .chain(self.base_package_classes.iter().map(|c| package_of(c).to_string()))
            .collect();

        if packages.is_empty() {
            packages.push(self.default_package.clone().unwrap_or_default());
        }
        packages.sort();
        packages.dedup();
        packages
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
