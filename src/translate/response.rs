use super::nim_types::{NimChatResponse, NimChoice};
use super::openai_types::{ChatCompletionResponse, ChatUsage, Choice, ChoiceMessage};
use chrono::{DateTime, Utc};

pub const DEFAULT_ROLE: &str = "assistant";
pub const DEFAULT_FINISH_REASON: &str = "stop";

/// Translate an upstream response into the client-facing shape, filling every
/// field the upstream left out.
/// Pure function: `public_model` is what the client originally requested.
pub fn to_client_response(
    resp: NimChatResponse,
    public_model: &str,
    issued_at: DateTime<Utc>,
) -> ChatCompletionResponse {
    let usage = resp.usage.map_or_else(ChatUsage::default, |u| ChatUsage {
        prompt_tokens: u.prompt_tokens.unwrap_or(0),
        completion_tokens: u.completion_tokens.unwrap_or(0),
        total_tokens: u.total_tokens.unwrap_or(0),
        extra: u.extra,
    });

    ChatCompletionResponse {
        id: format!("chatcmpl-{}", issued_at.timestamp_millis()),
        object: "chat.completion".to_string(),
        created: issued_at.timestamp(),
        model: public_model.to_string(),
        choices: resp.choices.into_iter().map(to_client_choice).collect(),
        usage,
    }
}

fn to_client_choice(choice: NimChoice) -> Choice {
    let message = choice.message.unwrap_or_default();

    Choice {
        index: choice.index.unwrap_or(0),
        message: ChoiceMessage {
            role: message.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            content: message.content.unwrap_or_default(),
        },
        finish_reason: choice
            .finish_reason
            .unwrap_or_else(|| DEFAULT_FINISH_REASON.to_string()),
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// Accepts the OpenAI shape (`{"error": {"message": ..}}`), a bare string
/// `error`, and the problem-details `detail` field NIM uses for some failures.
pub fn upstream_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .pointer("/error/message")
        .or_else(|| value.get("error").filter(|e| e.is_string()))
        .or_else(|| value.get("detail"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
