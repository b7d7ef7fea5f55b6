use crate::config::UpstreamSettings;
use crate::diagnostics::Diagnostics;
use crate::error::{ProxyError, Result};
use crate::models::{ModelTable, MODEL_OWNER};
use crate::proxy;
use crate::translate::openai_types::{ChatCompletionResponse, ModelCard, ModelList};
use crate::translate::request::{parse_chat_request, to_upstream_request};
use crate::translate::response::to_client_response;

use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use axum::{Json, Router};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Chat bodies may carry inline images, so the extractor default is too small.
pub const MAX_CHAT_BODY_BYTES: usize = 32 * 1024 * 1024;

const CHAT_METHODS: [Method; 6] = [
    Method::GET,
    Method::OPTIONS,
    Method::PATCH,
    Method::DELETE,
    Method::POST,
    Method::PUT,
];

const READ_ONLY_METHODS: [Method; 2] = [Method::GET, Method::OPTIONS];

const ALLOWED_HEADERS: [HeaderName; 10] = [
    HeaderName::from_static("x-csrf-token"),
    HeaderName::from_static("x-requested-with"),
    header::ACCEPT,
    HeaderName::from_static("accept-version"),
    header::CONTENT_LENGTH,
    HeaderName::from_static("content-md5"),
    header::CONTENT_TYPE,
    header::DATE,
    HeaderName::from_static("x-api-version"),
    header::AUTHORIZATION,
];

#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamSettings,
    pub client: reqwest::Client,
    pub models: ModelTable,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let chat = || {
        with_cors(any(handle_chat), &CHAT_METHODS).layer(DefaultBodyLimit::max(MAX_CHAT_BODY_BYTES))
    };
    let models = || with_cors(any(handle_models), &READ_ONLY_METHODS);
    let health = || with_cors(any(handle_health), &READ_ONLY_METHODS);

    Router::new()
        .route("/api/chat", chat())
        .route("/v1/chat/completions", chat())
        .route("/api/models", models())
        .route("/v1/models", models())
        .route("/api/health", health())
        .route("/health", health())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `CorsLayer` answers every `OPTIONS` itself and only lists methods and
/// headers there; the two header layers put the same lists on every other
/// response.
fn with_cors(
    route: MethodRouter<Arc<AppState>>,
    methods: &[Method],
) -> MethodRouter<Arc<AppState>> {
    let allow_methods = header_list(methods.iter().map(Method::as_str));
    let allow_headers = header_list(ALLOWED_HEADERS.iter().map(HeaderName::as_str));

    route
        .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            allow_methods,
        ))
        .layer::<_, std::convert::Infallible>(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            allow_headers,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods.to_vec())
                .allow_headers(ALLOWED_HEADERS.to_vec()),
        )
}

fn header_list<'a>(items: impl Iterator<Item = &'a str>) -> Option<HeaderValue> {
    HeaderValue::from_str(&items.collect::<Vec<_>>().join(",")).ok()
}

async fn handle_chat(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    // Preflight short-circuits before any validation.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    match chat_completion(&state, &method, body).await {
        Ok(resp) => Json(resp).into_response(),
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                error!(status = status.as_u16(), error = %err, "Proxy error");
            } else {
                warn!(status = status.as_u16(), error = %err, "Request rejected");
            }
            err.into_response()
        }
    }
}

async fn chat_completion(
    state: &AppState,
    method: &Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<ChatCompletionResponse> {
    if *method != Method::POST {
        return Err(ProxyError::MethodNotAllowed);
    }

    let api_key = state
        .upstream
        .api_key
        .as_deref()
        .ok_or_else(|| ProxyError::MissingApiKey {
            env_var: state.upstream.api_key_env.clone(),
        })?;

    // Read failures surface only after the method and key checks.
    let body = body.map_err(|rejection| {
        ProxyError::invalid_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let req = parse_chat_request(&body)?;
    let nim_req = to_upstream_request(&req, &state.models)?;
    let public_model = req.model.unwrap_or_default();

    let nim_resp = proxy::forward_chat(&nim_req, &state.upstream, api_key, &state.client).await?;

    Ok(to_client_response(nim_resp, &public_model, Utc::now()))
}

async fn handle_models(State(state): State<Arc<AppState>>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    Json(list_models(&state.models)).into_response()
}

pub fn list_models(models: &ModelTable) -> ModelList {
    let created = Utc::now().timestamp();

    ModelList {
        object: "list".to_string(),
        data: models
            .iter()
            .map(|(public, upstream)| ModelCard {
                id: public.to_string(),
                object: "model".to_string(),
                created,
                owned_by: MODEL_OWNER.to_string(),
                nim_model: upstream.to_string(),
            })
            .collect(),
    }
}

async fn handle_health(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    Json(Diagnostics::collect(&state.upstream, &method, &uri, &headers)).into_response()
}
