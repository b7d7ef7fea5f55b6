//! Type definitions for the NVIDIA NIM chat completions endpoint.
//!
//! The request side is strict. The response side is deliberately lenient:
//! everything except `choices` may be missing, and the defaults are applied in
//! [`super::response::to_client_response`].

use super::openai_types::ChatMessage;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request types (what we send TO the upstream)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NimChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u64,
    pub stream: bool,
}

// ---------------------------------------------------------------------------
// Response types (what we receive FROM the upstream)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NimChatResponse {
    pub choices: Vec<NimChoice>,
    #[serde(default)]
    pub usage: Option<NimUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NimChoice {
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default)]
    pub message: Option<NimChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NimChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Token counts. Any of them may be missing or `null`; extra fields such as
/// `prompt_tokens_details` are carried through to the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NimUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
