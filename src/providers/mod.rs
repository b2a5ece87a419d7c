//! Provider dispatcher: one request/response round trip per call.
//!
//! [`dispatch`] builds a provider-specific request body, sends it through
//! the injected [`Transport`], and extracts the completion text from the
//! provider-specific response shape. The three wire protocols are
//! incompatible and reproduced exactly:
//!
//! | Provider  | Endpoint                                  | Auth                         |
//! |-----------|-------------------------------------------|------------------------------|
//! | openai    | `{endpoint}/chat/completions`             | `Authorization: Bearer <key>`|
//! | anthropic | `https://api.anthropic.com/v1/messages`   | `x-api-key` + version header |
//! | ollama    | `{endpoint}/api/generate`                 | none                         |

pub mod prompts;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::codec;
use crate::transport::{Header, Transport};
use crate::types::{ProviderConfig, ProviderKind};
use crate::{Result, SkaldError, telemetry};

/// Anthropic ignores the configured endpoint; the messages API is fixed.
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A fully built provider request, ready for the transport.
#[derive(Debug)]
struct WireRequest {
    url: String,
    body: String,
    headers: Vec<Header>,
}

/// Send one prompt pair to the configured provider and return the
/// completion text.
///
/// An unrecognized provider id fails immediately with
/// [`SkaldError::UnknownProvider`] — no transport call is made.
pub fn dispatch(
    transport: &dyn Transport,
    config: &ProviderConfig,
    system_prompt: &str,
    user_prompt: &str,
    timeout_ms: u64,
) -> Result<String> {
    let kind = config.kind()?;
    let request = build_request(kind, config, system_prompt, user_prompt)?;

    debug!(provider = %kind, url = %request.url, "dispatching request");

    // POST first; fall back to GET with the same headers when the POST
    // verb is unavailable. The GET cannot carry the JSON body these APIs
    // require, so a fallback response is unlikely to parse — kept only
    // for hosts whose transport supports a single verb, pending product
    // clarification.
    let response = transport
        .post(&request.url, &request.body, &request.headers, timeout_ms)
        .or_else(|| {
            warn!(provider = %kind, "POST yielded no response, falling back to GET");
            transport.get(&request.url, &request.headers, timeout_ms)
        });

    let outcome = match response {
        Some(text) => extract_completion(kind, &text),
        None => Err(SkaldError::Transport(format!(
            "no response from {} at {}",
            kind, request.url
        ))),
    };

    let status = if outcome.is_ok() { "ok" } else { "error" };
    metrics::counter!(
        telemetry::REQUESTS_TOTAL,
        "provider" => kind.to_string(),
        "status" => status
    )
    .increment(1);

    outcome
}

/// Minimal connectivity probe: a one-word prompt with a tiny budget.
///
/// Intended for settings UIs ("test connection" buttons); failures are
/// reported as `false`, never as an error.
pub fn test_connection(transport: &dyn Transport, config: &ProviderConfig) -> bool {
    let mut probe = config.clone();
    probe.max_tokens = 5;
    dispatch(transport, &probe, "", "Hello", 10_000).is_ok()
}

fn build_request(
    kind: ProviderKind,
    config: &ProviderConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<WireRequest> {
    let json_header = ("Content-Type".to_string(), "application/json".to_string());
    match kind {
        ProviderKind::OpenAi => {
            let body = json!({
                "model": config.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt},
                ],
                "max_tokens": config.max_tokens,
                "temperature": config.temperature,
            });
            Ok(WireRequest {
                url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
                body: codec::encode(&body)?,
                headers: vec![
                    json_header,
                    (
                        "Authorization".to_string(),
                        format!("Bearer {}", config.api_key),
                    ),
                ],
            })
        }
        ProviderKind::Anthropic => {
            let body = json!({
                "model": config.model,
                "max_tokens": config.max_tokens,
                "temperature": config.temperature,
                "system": system_prompt,
                "messages": [
                    {"role": "user", "content": user_prompt},
                ],
            });
            Ok(WireRequest {
                url: ANTHROPIC_MESSAGES_URL.to_string(),
                body: codec::encode(&body)?,
                headers: vec![
                    json_header,
                    ("x-api-key".to_string(), config.api_key.clone()),
                    ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
                ],
            })
        }
        ProviderKind::Ollama => {
            let endpoint = if config.endpoint.contains("://") {
                config.endpoint.trim_end_matches('/').to_string()
            } else {
                format!("http://{}", config.endpoint.trim_end_matches('/'))
            };
            let body = json!({
                "model": config.model,
                "prompt": format!("{system_prompt}\n\nUser: {user_prompt}"),
                "stream": false,
                "options": {
                    "num_predict": config.max_tokens,
                    "temperature": config.temperature,
                },
            });
            Ok(WireRequest {
                url: format!("{endpoint}/api/generate"),
                body: codec::encode(&body)?,
                headers: vec![json_header],
            })
        }
    }
}

/// Pull the completion text out of a raw response body.
fn extract_completion(kind: ProviderKind, text: &str) -> Result<String> {
    let Some(value) = codec::decode(text) else {
        return Err(SkaldError::Parse(format!(
            "{kind} response was not valid JSON"
        )));
    };

    let path = match kind {
        ProviderKind::OpenAi => "/choices/0/message/content",
        ProviderKind::Anthropic => "/content/0/text",
        ProviderKind::Ollama => "/response",
    };

    match value.pointer(path).and_then(Value::as_str) {
        Some(content) => Ok(content.to_string()),
        None => Err(SkaldError::Parse(api_error_message(kind, &value))),
    }
}

/// Prefer the provider's own `error.message` when the expected field is
/// absent; otherwise report the missing shape.
fn api_error_message(kind: ProviderKind, value: &Value) -> String {
    match value.pointer("/error/message").and_then(Value::as_str) {
        Some(message) => format!("{kind} API error: {message}"),
        None => format!("{kind} response missing expected content field"),
    }
}
