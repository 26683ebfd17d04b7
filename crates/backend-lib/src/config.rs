// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::storage::EmailCase;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "CREDENTIAL_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which `UserStore` implementation backs the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    FlatFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data directory for the flat-file backend
    pub path: PathBuf,
    pub email_case: EmailCase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Name under which the signing secret is looked up
    pub secret_name: String,
    /// Answer unknown-email signins with the wrong-password error
    pub unify_signin_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: PathBuf::from("data"),
            email_case: EmailCase::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret_name: "JWT_SECRET".to_string(),
            unify_signin_errors: false,
        }
    }
}

impl Settings {
    /// Load from `config.toml` in the working directory plus the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load from the given TOML file plus the environment.
    ///
    /// A missing file is not an error; defaults fill every unset field and
    /// `CREDENTIAL_`-prefixed variables win over the file
    /// (e.g. `CREDENTIAL_SERVER__PORT=8080`).
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .with_context(|| format!("loading settings from {}", path.as_ref().display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.auth.secret_name.trim().is_empty() {
            bail!("auth.secret_name must not be empty");
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            bail!(
                "log_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.server.host, self.server.port))
    }
}
