//! The health/diagnostics report.
//!
//! Meant for troubleshooting a deployment: it tells whether the upstream key is
//! configured and which base URL is in use, and echoes the shape of the
//! inbound request. The key value and header values are never included.

use crate::config::UpstreamSettings;
use axum::http::{HeaderMap, Method, Uri};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: EnvironmentReport,
    pub request: RequestEcho,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    pub has_nim_api_key: bool,
    pub nim_api_key_length: usize,
    pub nim_api_base: String,
    pub runtime_version: String,
    pub os: &'static str,
    pub arch: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestEcho {
    pub method: String,
    pub url: String,
    pub headers: Vec<String>,
}

impl Diagnostics {
    pub fn collect(
        settings: &UpstreamSettings,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
    ) -> Self {
        let key_len = settings.api_key.as_deref().map_or(0, str::len);

        Self {
            status: "ok",
            timestamp: Utc::now(),
            environment: EnvironmentReport {
                has_nim_api_key: settings.api_key.is_some(),
                nim_api_key_length: key_len,
                nim_api_base: settings.base_url.clone(),
                runtime_version: runtime_version(),
                os: std::env::consts::OS,
                arch: std::env::consts::ARCH,
            },
            request: RequestEcho {
                method: method.to_string(),
                url: uri
                    .path_and_query()
                    .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
                headers: headers.keys().map(|name| name.as_str().to_string()).collect(),
            },
        }
    }
}

fn runtime_version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
