//! Voice input
//!
//! This module provides:
//! - The `SpeechRecognizer` seam and its signal types
//! - `VoiceCapture`, the mic-toggle state machine driven by those signals
//! - A local recognizer built on the microphone, Silero VAD and Whisper

pub mod capture;
pub mod recognizer;
pub mod segmenter;
pub mod stt;
pub mod whisper;

// Re-export commonly used types
pub use capture::{append_transcript, VoiceCapture, VoiceError, VoiceState};
pub use recognizer::{
    RecognitionAlternative, RecognitionErrorKind, RecognitionEvent, RecognitionOptions,
    RecognitionResult, RecognizerError, SessionId, SessionSignal, SignalSink, SpeechRecognizer,
};
pub use stt::{WhisperConfig, WhisperEngine};
pub use whisper::WhisperRecognizer;
