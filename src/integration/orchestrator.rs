//! Wires the gateway worker and the voice adapter into a controller

use crate::controller::ConversationController;
use crate::integration::config::HabuConfig;
use crate::llm::{GatewayPipeline, GeminiGateway, ResponseGateway};
use crate::speech::{SpeechRecognizer, VoiceCapture, WhisperRecognizer};
use crate::Result;
use std::thread::JoinHandle;
use tracing::info;

/// Owns the background workers for the lifetime of the app
pub struct Orchestrator {
    gateway_worker: Option<JoinHandle<()>>,
}

impl Orchestrator {
    /// Build the Gemini gateway, probe for voice input and return the
    /// controller the UI drives
    pub fn new(config: &HabuConfig) -> Result<(Self, ConversationController)> {
        info!("Using model {}", config.gateway.model_id);
        let gateway = GeminiGateway::new(config.gateway.clone())?;

        let recognizer = if config.enable_voice_input {
            WhisperRecognizer::probe(&config.speech)
                .map(|recognizer| Box::new(recognizer) as Box<dyn SpeechRecognizer>)
        } else {
            info!("Voice input disabled by configuration");
            None
        };
        let voice = VoiceCapture::new(recognizer, config.recognition.clone());

        Self::with_parts(Box::new(gateway), voice)
    }

    /// Start the gateway worker around any gateway implementation
    pub fn with_parts(
        gateway: Box<dyn ResponseGateway>,
        voice: VoiceCapture,
    ) -> Result<(Self, ConversationController)> {
        let pipeline = GatewayPipeline::new(gateway);
        let handle = pipeline.handle();
        let gateway_worker = pipeline.start_worker()?;
        info!("Gateway pipeline started");

        let controller = ConversationController::new(handle, voice);
        Ok((
            Self {
                gateway_worker: Some(gateway_worker),
            },
            controller,
        ))
    }

    /// Wait for the gateway worker after `ConversationController::shutdown`
    pub fn join(&mut self) {
        if let Some(worker) = self.gateway_worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Gateway worker panicked");
            }
        }
    }
}
