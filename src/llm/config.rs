//! Gateway configuration for the Gemini REST API

use crate::llm::prompts::SYSTEM_INSTRUCTION;

/// Default hosted model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the `generateContent` family of endpoints
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Message shown when the credential is missing
pub const MISSING_API_KEY: &str =
    "API_KEY environment variable not set. Please add it to your environment variables.";

/// Configuration for the response gateway
#[derive(Clone)]
pub struct GatewayConfig {
    /// API credential, sent as `x-goog-api-key`
    pub api_key: String,

    /// Model identifier
    pub model_id: String,

    /// Endpoint base, without the trailing `/{model}:generateContent`
    pub base_url: String,

    /// Persona prompt bound to the session
    pub system_instruction: String,
}

// Hand-written so the credential never ends up in logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("system_instruction", &self.system_instruction)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a configuration for the default model with the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_id: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// Set the model identifier
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Point the gateway at a different endpoint base
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the persona prompt
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_id
        )
    }
}
