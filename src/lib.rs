pub mod audio;
pub mod controller;
pub mod integration;
pub mod llm;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HabuError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for HabuError {
    fn from(e: std::io::Error) -> Self {
        HabuError::IOError(e.to_string())
    }
}

impl From<llm::GatewayError> for HabuError {
    fn from(e: llm::GatewayError) -> Self {
        HabuError::GatewayError(e.to_string())
    }
}

impl HabuError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            HabuError::AudioDeviceError(_) => false,
            // Model errors require restarting
            HabuError::ModelLoadError(_) => false,
            // These are typically transient errors
            HabuError::TranscriptionError(_) => true,
            HabuError::GatewayError(_) => true,
            HabuError::AudioProcessingError(_) => true,
            HabuError::IOError(_) => false,
            HabuError::ConfigError(_) => false,
            HabuError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            HabuError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            HabuError::ModelLoadError(_) => {
                "Failed to load the speech model. Please verify the model file is present."
                    .to_string()
            }
            HabuError::TranscriptionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            HabuError::GatewayError(_) => controller::GATEWAY_FALLBACK.to_string(),
            HabuError::IOError(_) => "File system error occurred.".to_string(),
            HabuError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            HabuError::ConfigError(msg) => msg.clone(),
            HabuError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HabuError>;
