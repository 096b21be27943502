// Copyright (c) 2025 - Cowboy AI, Inc.
//! Run configuration
//!
//! A JSON file lists the fabrics to inventory and the tenants to skip.
//! Credentials may be left out of the file and supplied through
//! `ACI_USERNAME` / `ACI_PASSWORD` instead; `ACI_CONFIG` names the file.
//!
//! ```json
//! {
//!   "fabrics": [
//!     { "name": "DC1", "apic_url": "https://10.1.1.1", "username": "admin" }
//!   ],
//!   "excluded_tenants": { "names": ["mgmt", "infra", "common"], "prefixes": ["tmp-"] },
//!   "max_concurrent_fabrics": 4
//! }
//! ```
//!
//! Leaving out `excluded_tenants.names` keeps the system tenants excluded;
//! an explicit `"names": []` keeps every tenant.
//!
//! Fabric names end up in report file names, so they may not contain path
//! separators or `..`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Fabric;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "ACI_CONFIG";
pub const USERNAME_ENV: &str = "ACI_USERNAME";
pub const PASSWORD_ENV: &str = "ACI_PASSWORD";
pub const DEFAULT_CONFIG_PATH: &str = "aci-inventory.json";

/// Tenants present on every fabric that carry no tenant policy of interest
pub const SYSTEM_TENANTS: [&str; 3] = ["mgmt", "infra", "common"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Exclusion predicate for system tenants
///
/// A tenant is excluded when its name matches one of `names` exactly or
/// starts with one of `prefixes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantFilter {
    #[serde(default = "default_excluded_names")]
    pub names: BTreeSet<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
}

impl TenantFilter {
    /// Filter that keeps every tenant
    pub fn none() -> Self {
        Self {
            names: BTreeSet::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            prefixes: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn is_excluded(&self, tenant: &str) -> bool {
        self.names.contains(tenant)
            || self
                .prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && tenant.starts_with(prefix.as_str()))
    }
}

fn default_excluded_names() -> BTreeSet<String> {
    SYSTEM_TENANTS.iter().map(|name| name.to_string()).collect()
}

impl Default for TenantFilter {
    fn default() -> Self {
        Self::with_names(SYSTEM_TENANTS)
    }
}

/// Connection parameters for one APIC
#[derive(Clone, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Name used in reports and on the command line
    pub name: String,

    /// Controller base URL (e.g., "https://10.1.1.1")
    pub apic_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Verify the controller's TLS certificate
    #[serde(default)]
    pub verify_tls: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Budget for the whole fetch of this fabric, login included
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    300
}

impl FabricConfig {
    pub fn new(name: impl Into<String>, apic_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apic_url: apic_url.into(),
            username: String::new(),
            password: String::new(),
            verify_tls: false,
            timeout_secs: default_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn fabric(&self) -> Fabric {
        Fabric::new(&self.name, &self.apic_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl fmt::Debug for FabricConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FabricConfig")
            .field("name", &self.name)
            .field("apic_url", &self.apic_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}

/// Top-level run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub fabrics: Vec<FabricConfig>,

    #[serde(default)]
    pub excluded_tenants: TenantFilter,

    /// Upper bound on fabrics fetched at the same time
    #[serde(default = "default_max_concurrent_fabrics")]
    pub max_concurrent_fabrics: usize,
}

fn default_max_concurrent_fabrics() -> usize {
    4
}

impl InventoryConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Fill credentials that the file left empty
    pub fn apply_credentials(&mut self, username: Option<String>, password: Option<String>) {
        for fabric in &mut self.fabrics {
            if fabric.username.is_empty() {
                if let Some(username) = &username {
                    fabric.username = username.clone();
                }
            }
            if fabric.password.is_empty() {
                if let Some(password) = &password {
                    fabric.password = password.clone();
                }
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.fabrics.is_empty() {
            return Err(ConfigError::Invalid("no fabrics configured".to_string()));
        }
        if self.max_concurrent_fabrics == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_fabrics must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for fabric in &self.fabrics {
            if fabric.name.trim().is_empty() {
                return Err(ConfigError::Invalid("fabric with empty name".to_string()));
            }
            if fabric.name.contains(['/', '\\']) || fabric.name.contains("..") {
                return Err(ConfigError::Invalid(format!(
                    "fabric name {:?} may not contain path separators or '..'",
                    fabric.name
                )));
            }
            if !seen.insert(fabric.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate fabric name: {}",
                    fabric.name
                )));
            }
            if !fabric.apic_url.starts_with("http://") && !fabric.apic_url.starts_with("https://")
            {
                return Err(ConfigError::Invalid(format!(
                    "fabric {}: apic_url must start with http:// or https://",
                    fabric.name
                )));
            }
        }
        Ok(())
    }

    pub fn fabric(&self, name: &str) -> Option<&FabricConfig> {
        self.fabrics.iter().find(|f| f.name == name)
    }
}
