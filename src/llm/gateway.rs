//! Response gateway: one user turn in, one complete reply out.

use crate::llm::config::{GatewayConfig, MISSING_API_KEY};
use crate::llm::session::{ChatSession, ChatTurn};
use crate::{HabuError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Opaque failure of a gateway call.
///
/// Transport, auth, quota and malformed-response failures all collapse into
/// this one type; the message is kept for diagnostics only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to get response from Gemini API: {message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sends a user turn to the hosted model and returns the full reply.
///
/// Calls must be serialized by the caller; `GatewayPipeline` guarantees this by
/// handling one command at a time.
#[async_trait]
pub trait ResponseGateway: Send {
    async fn send(&mut self, text: &str) -> std::result::Result<String, GatewayError>;
}

/// Gateway backed by the Gemini `generateContent` REST endpoint
pub struct GeminiGateway {
    client: Client,
    config: GatewayConfig,
    session: ChatSession,
}

impl GeminiGateway {
    /// Create the gateway and its conversation session.
    ///
    /// Fails when no credential is configured.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(HabuError::ConfigError(MISSING_API_KEY.to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| HabuError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let session = ChatSession::new(config.system_instruction.clone());

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    async fn post(&self, body: &GenerateContentRequest) -> std::result::Result<String, GatewayError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::new(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::new(format!("failed to parse response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ResponseGateway for GeminiGateway {
    async fn send(&mut self, text: &str) -> std::result::Result<String, GatewayError> {
        let request = build_request(&self.session, text);
        debug!(
            model = %self.config.model_id,
            turns = request.contents.len(),
            "Sending chat turn to Gemini"
        );

        match self.post(&request).await {
            Ok(reply) => {
                self.session.record_exchange(text, reply.clone());
                Ok(reply)
            }
            Err(e) => {
                warn!("Error sending message to Gemini: {}", e);
                Err(e)
            }
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize, Debug)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn build_request(session: &ChatSession, text: &str) -> GenerateContentRequest {
    let contents = session
        .pending_turns(text)
        .into_iter()
        .map(|ChatTurn { role, text }| Content {
            role: Some(role.as_str()),
            parts: vec![Part { text }],
        })
        .collect();

    let instruction = session.system_instruction();
    let system_instruction = (!instruction.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part {
            text: instruction.to_string(),
        }],
    });

    GenerateContentRequest {
        contents,
        system_instruction,
    }
}

/// Concatenate the text parts of the first candidate, skipping thought parts
fn extract_text_response(
    response: GenerateContentResponse,
) -> std::result::Result<String, GatewayError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GatewayError::new(
            "Gemini API returned no text in the response candidates",
        ));
    }

    Ok(text)
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    GatewayError::new(format!("HTTP {}: {}", status.as_u16(), detail))
}
