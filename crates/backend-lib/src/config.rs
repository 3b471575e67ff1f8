// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "userauth.toml";

/// Prefix for environment overrides, e.g. `USERAUTH_LOG_LEVEL=debug`
pub const ENV_PREFIX: &str = "USERAUTH_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];
const MAX_SCRYPT_LOG_N: u8 = 20;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// `text` or `json`
    pub log_format: String,
    /// JSON file of accounts to create at startup
    pub users_file: Option<PathBuf>,
    /// How often expired throttle entries are swept; 0 disables the sweep
    pub sweep_interval_secs: u64,
    /// scrypt cost exponent
    pub scrypt_log_n: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            users_file: None,
            sweep_interval_secs: 5 * 60,
            scrypt_log_n: scrypt::Params::RECOMMENDED_LOG_N,
        }
    }
}

impl Settings {
    /// Defaults, then `userauth.toml`, then `USERAUTH_*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Same as [`load`](Self::load) with an explicit config file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            bail!("invalid log level `{}`, expected one of {LOG_LEVELS:?}", self.log_level);
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            bail!("invalid log format `{}`, expected one of {LOG_FORMATS:?}", self.log_format);
        }
        if self.scrypt_log_n == 0 || self.scrypt_log_n > MAX_SCRYPT_LOG_N {
            bail!("scrypt_log_n must be between 1 and {MAX_SCRYPT_LOG_N}");
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
