//! Startup configuration
//!
//! Everything is read from the environment once, before the window opens.

use crate::llm::config::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, MISSING_API_KEY};
use crate::speech::recognizer::RecognitionOptions;
use crate::speech::stt::WhisperConfig;
use crate::{HabuError, Result};

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct HabuConfig {
    /// Gemini gateway configuration
    pub gateway: GatewayConfig,

    /// Local speech-to-text configuration
    pub speech: WhisperConfig,

    /// Options handed to every recognition session
    pub recognition: RecognitionOptions,

    /// Whether to probe for voice input at all
    pub enable_voice_input: bool,
}

impl HabuConfig {
    /// Create a configuration with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            gateway: GatewayConfig::new(api_key),
            speech: WhisperConfig::default(),
            recognition: RecognitionOptions::default(),
            enable_voice_input: true,
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| HabuError::ConfigError(MISSING_API_KEY.to_string()))?;

        let mut config = Self::new(api_key.trim());

        config.gateway = config
            .gateway
            .with_model(non_blank(lookup("HABU_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()))
            .with_base_url(
                non_blank(lookup("HABU_API_BASE")).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            );

        if let Some(path) = non_blank(lookup("HABU_WHISPER_MODEL")) {
            config.speech.model_path = path.into();
        }

        if let Some(flag) = lookup("HABU_VOICE") {
            if matches!(flag.trim().to_lowercase().as_str(), "off" | "0" | "false") {
                config = config.without_voice_input();
            }
        }

        Ok(config)
    }

    /// Disable voice input (text-only mode)
    pub fn without_voice_input(mut self) -> Self {
        self.enable_voice_input = false;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
