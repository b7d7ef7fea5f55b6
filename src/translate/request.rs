use super::nim_types::NimChatRequest;
use super::openai_types::ChatCompletionRequest;
use crate::error::{ProxyError, Result};
use crate::models::ModelTable;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u64 = 4096;

/// Parse an inbound request body.
///
/// Malformed JSON and wrongly typed fields are client errors, same as a
/// missing field.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatCompletionRequest> {
    serde_json::from_slice(body)
        .map_err(|e| ProxyError::invalid_request(format!("Invalid request body: {}", e)))
}

/// Translate a client chat request into the request sent upstream.
/// Pure function: the model is resolved through `models`, unknown ids fall back.
pub fn to_upstream_request(
    req: &ChatCompletionRequest,
    models: &ModelTable,
) -> Result<NimChatRequest> {
    let (model, messages) = match (req.model.as_deref(), req.messages.as_ref()) {
        (Some(model), Some(messages)) if !model.is_empty() => (model, messages),
        _ => {
            return Err(ProxyError::invalid_request(
                "Missing required fields: model and messages",
            ))
        }
    };

    if req.stream == Some(true) {
        tracing::debug!(model, "Streaming requested but not supported, forcing stream=false");
    }

    Ok(NimChatRequest {
        model: models.resolve(model).to_string(),
        messages: messages.clone(),
        temperature: req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        stream: false,
    })
}
