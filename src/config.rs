// src/config.rs
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://Macmacmacmacmacmac-mental-health-chatbot-backend.hf.space";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub upstream_base_url: String,
    /// Sent as `user_lang`; `auto` lets the upstream detect the language.
    pub user_lang: String,
    pub session_ttl: Duration,
    pub purge_interval: Duration,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            upstream_base_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_lang: "auto".to_string(),
            session_ttl: Duration::from_secs(3600),
            purge_interval: Duration::from_secs(60),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read `MITRA_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("MITRA_BIND_ADDR") {
            config.bind_addr = raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "MITRA_BIND_ADDR",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(raw) = lookup("MITRA_UPSTREAM_URL") {
            let trimmed = raw.trim().trim_end_matches('/');
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "MITRA_UPSTREAM_URL",
                    value: raw,
                    reason: "expected an http(s) URL".to_string(),
                });
            }
            config.upstream_base_url = trimmed.to_string();
        }

        if let Some(raw) = lookup("MITRA_USER_LANG") {
            let lang = raw.trim();
            if !lang.is_empty() {
                config.user_lang = lang.to_string();
            }
        }

        if let Some(raw) = lookup("MITRA_SESSION_TTL_SECS") {
            config.session_ttl = parse_secs("MITRA_SESSION_TTL_SECS", &raw)?;
        }

        if let Some(raw) = lookup("MITRA_PURGE_INTERVAL_SECS") {
            config.purge_interval = parse_secs("MITRA_PURGE_INTERVAL_SECS", &raw)?;
        }

        if let Some(raw) = lookup("MITRA_STATIC_DIR") {
            config.static_dir = PathBuf::from(raw);
        }

        Ok(config)
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
