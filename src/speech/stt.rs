use crate::audio::SPEECH_SAMPLE_RATE;
use crate::{HabuError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Configuration for the local speech-to-text engine
#[derive(Clone, Debug)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Number of threads to use for transcription
    pub n_threads: i32,

    /// VAD speech probability threshold
    pub vad_threshold: f32,

    /// Trailing silence that ends an utterance
    pub silence_timeout: Duration,

    /// Give up when no speech starts within this window
    pub no_speech_timeout: Duration,

    /// Utterances shorter than this are discarded as noise
    pub min_utterance: Duration,

    /// Hard cap on a single utterance
    pub max_utterance: Duration,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.bin"),
            n_threads: 4,
            vad_threshold: 0.5,
            silence_timeout: Duration::from_millis(800),
            no_speech_timeout: Duration::from_secs(8),
            min_utterance: Duration::from_millis(300),
            max_utterance: Duration::from_secs(30),
        }
    }
}

impl WhisperConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    pub fn with_threads(mut self, n_threads: i32) -> Self {
        self.n_threads = n_threads;
        self
    }

    pub fn with_silence_timeout(mut self, timeout: Duration) -> Self {
        self.silence_timeout = timeout;
        self
    }

    pub fn with_no_speech_timeout(mut self, timeout: Duration) -> Self {
        self.no_speech_timeout = timeout;
        self
    }
}

/// Whisper speech-to-text engine
pub struct WhisperEngine {
    config: WhisperConfig,
    context: WhisperContext,
}

impl WhisperEngine {
    /// Load the model named by `config`
    pub fn new(config: WhisperConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(HabuError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let path = config
            .model_path
            .to_str()
            .ok_or_else(|| HabuError::ModelLoadError("Invalid model path".to_string()))?;

        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| {
                HabuError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e))
            })?;

        info!("Whisper model loaded successfully");

        Ok(Self { config, context })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Transcribe one 16 kHz mono utterance in `language` (e.g. `hi`)
    pub fn transcribe(&self, samples: &[f32], language: &str) -> Result<String> {
        if samples.is_empty() {
            return Err(HabuError::TranscriptionError(
                "Empty audio segment".to_string(),
            ));
        }

        debug!(
            "Transcribing {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / SPEECH_SAMPLE_RATE as f32
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_translate(false);
        params.set_single_segment(true);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_language(Some(language));

        let mut state = self.context.create_state().map_err(|e| {
            HabuError::TranscriptionError(format!("Failed to create state: {:?}", e))
        })?;

        state.full(params, samples).map_err(|e| {
            HabuError::TranscriptionError(format!("Transcription failed: {:?}", e))
        })?;

        let num_segments = state.full_n_segments().map_err(|e| {
            HabuError::TranscriptionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment_text = state.full_get_segment_text(i).map_err(|e| {
                HabuError::TranscriptionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment_text);
        }

        let text = text.trim().to_string();
        debug!("Transcription result: '{}'", text);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_config_default() {
        let config = WhisperConfig::default();
        assert_eq!(config.n_threads, 4);
        assert_eq!(config.silence_timeout, Duration::from_millis(800));
        assert!(config.no_speech_timeout > config.silence_timeout);
    }

    #[test]
    fn test_builder_pattern() {
        let config = WhisperConfig::new("/tmp/model.bin")
            .with_threads(2)
            .with_no_speech_timeout(Duration::from_secs(3));
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.bin"));
        assert_eq!(config.n_threads, 2);
        assert_eq!(config.no_speech_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_model_is_load_error() {
        let result = WhisperEngine::new(WhisperConfig::new("/nonexistent/ggml.bin"));
        assert!(matches!(result, Err(HabuError::ModelLoadError(_))));
    }
}
