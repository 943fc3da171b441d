//! Runtime configuration resolved from `CARRO_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8082";
pub const DEFAULT_PUBLIC_PREFIX: &str = "/api/publico/";
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_TOAST_TTL_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend; endpoint paths are appended to it verbatim.
    pub api_url: String,
    /// Durable session file (token and derived identity).
    pub session_file: PathBuf,
    /// Requests under this prefix never carry a bearer token.
    pub public_prefix: String,
    pub page_size: u32,
    /// Request timeout; `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
    /// Clear the session when an authenticated call answers 401.
    pub logout_on_unauthorized: bool,
    pub toast_ttl_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: default_session_file(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: None,
            logout_on_unauthorized: true,
            toast_ttl_ms: DEFAULT_TOAST_TTL_MS,
        }
    }
}

fn default_session_file() -> PathBuf {
    let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok();
    let base = home.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    base.join(".carro-admin").join("session.json")
}

impl Config {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        if let Some(v) = lookup("CARRO_API_URL") {
            cfg.api_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("CARRO_SESSION_FILE") {
            cfg.session_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("CARRO_PUBLIC_PREFIX") {
            cfg.public_prefix = v;
        }
        if let Some(v) = lookup("CARRO_PAGE_SIZE") {
            cfg.page_size = parse_num("CARRO_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("CARRO_TIMEOUT_SECS") {
            cfg.timeout_secs = Some(parse_num("CARRO_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("CARRO_LOGOUT_ON_401") {
            cfg.logout_on_unauthorized = parse_flag("CARRO_LOGOUT_ON_401", &v)?;
        }
        if let Some(v) = lookup("CARRO_TOAST_TTL_MS") {
            cfg.toast_ttl_ms = parse_num("CARRO_TOAST_TTL_MS", &v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if reqwest::Url::parse(&self.api_url).is_err() {
            return Err(ClientError::config(format!("invalid api_url '{}'", self.api_url)));
        }
        if self.page_size == 0 {
            return Err(ClientError::config("page_size must be positive"));
        }
        if !self.public_prefix.starts_with('/') {
            return Err(ClientError::config(format!("public_prefix '{}' must start with '/'", self.public_prefix)));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> { self.timeout_secs.map(Duration::from_secs) }

    pub fn toast_ttl(&self) -> Duration { Duration::from_millis(self.toast_ttl_ms) }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: &str) -> ClientResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ClientError::config(format!("{key}: '{raw}' is not a valid number")))
}

fn parse_flag(key: &str, raw: &str) -> ClientResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::config(format!("{key}: '{raw}' is not a boolean"))),
    }
}
