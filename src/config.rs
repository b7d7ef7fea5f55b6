use crate::error::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url_env")]
    pub base_url_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_api_key_env() -> String {
    "NIM_API_KEY".to_string()
}

fn default_base_url_env() -> String {
    "NIM_API_BASE".to_string()
}

fn default_timeout_secs() -> u64 {
    25
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key_env: default_api_key_env(),
            base_url_env: default_base_url_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Upstream settings resolved once at startup and handed to every handler.
#[derive(Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Name of the variable the key is read from, for error messages.
    pub api_key_env: String,
    pub timeout: Duration,
}

impl UpstreamSettings {
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// Never print the key itself.
impl fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProxyConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProxyError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Search standard locations for a config file.
    /// Priority: CLI arg > CWD > XDG config > home dir > built-in defaults
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load(path);
        }

        for candidate in config_search_paths() {
            if candidate.exists() {
                tracing::info!(path = %candidate.display(), "Loading config");
                return Self::load(&candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Resolve upstream settings from the process environment.
    pub fn upstream_settings(&self) -> UpstreamSettings {
        self.resolve_upstream(|name| std::env::var(name).ok())
    }

    /// Resolve upstream settings with an explicit variable lookup.
    ///
    /// Base URL: environment > config file > default. The key only ever comes
    /// from the environment; an empty value counts as unset.
    pub fn resolve_upstream(&self, lookup: impl Fn(&str) -> Option<String>) -> UpstreamSettings {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let base_url = non_empty(&self.upstream.base_url_env)
            .or_else(|| self.upstream.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        UpstreamSettings {
            base_url,
            api_key: non_empty(&self.upstream.api_key_env),
            api_key_env: self.upstream.api_key_env.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
        }
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("nim-proxy.toml"));

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("nim-proxy").join("config.toml"));
    }

    if let Some(home) = home_dir() {
        paths.push(home.join(".config").join("nim-proxy").join("config.toml"));
        paths.push(home.join(".nim-proxy.toml"));
    }

    paths
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
