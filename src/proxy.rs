use crate::config::UpstreamSettings;
use crate::error::{ProxyError, Result};
use crate::translate::nim_types::{NimChatRequest, NimChatResponse};
use crate::translate::response::upstream_error_message;

use tracing::{debug, info, warn};

/// Forward a translated chat request to the upstream and parse the reply.
///
/// Exactly one attempt is made, bounded by `settings.timeout`. Non-2xx replies
/// become [`ProxyError::Upstream`] carrying the upstream status.
pub async fn forward_chat(
    req: &NimChatRequest,
    settings: &UpstreamSettings,
    api_key: &str,
    client: &reqwest::Client,
) -> Result<NimChatResponse> {
    let url = settings.chat_completions_url();

    info!(url = %url, model = %req.model, "Proxying request to NVIDIA NIM");

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(settings.timeout)
        .json(req)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    debug!(status = status.as_u16(), body_len = body.len(), "Upstream response");

    if !status.is_success() {
        let message = upstream_error_message(&body).unwrap_or_else(|| {
            format!("Request failed with status code {}", status.as_u16())
        });
        warn!(status = status.as_u16(), message = %message, "Upstream error");
        return Err(ProxyError::upstream(status.as_u16(), message));
    }

    serde_json::from_str(&body).map_err(|e| {
        ProxyError::translation(format!(
            "Failed to parse upstream response: {}. Body: {}",
            e,
            truncate(&body, 300)
        ))
    })
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
