//! Local speech capability: microphone + Silero VAD + Whisper
//!
//! Each capture session runs on its own thread: it records until one
//! utterance is complete, transcribes it and reports `Result` then `End`.
//! An explicit `stop` discards whatever was recorded.

use crate::speech::recognizer::{
    RecognitionErrorKind, RecognitionEvent, RecognitionOptions, RecognizerError, SignalSink,
    SpeechRecognizer,
};
use crate::speech::stt::{WhisperConfig, WhisperEngine};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

struct ActiveCapture {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Speech recognizer backed by the default microphone and a Whisper model
pub struct WhisperRecognizer {
    engine: Arc<WhisperEngine>,
    active: Option<ActiveCapture>,
}

impl WhisperRecognizer {
    /// Probe once for a usable speech capability.
    ///
    /// Returns `None` when audio support is compiled out, no input device
    /// exists, or the model cannot be loaded.
    pub fn probe(config: &WhisperConfig) -> Option<Self> {
        if !microphone_present() {
            warn!("No microphone found, voice input disabled");
            return None;
        }

        match WhisperEngine::new(config.clone()) {
            Ok(engine) => Some(Self::with_engine(engine)),
            Err(e) => {
                warn!("Speech model unavailable, voice input disabled: {}", e);
                None
            }
        }
    }

    pub fn with_engine(engine: WhisperEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            active: None,
        }
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn start(
        &mut self,
        options: &RecognitionOptions,
        sink: SignalSink,
    ) -> std::result::Result<(), RecognizerError> {
        if let Some(active) = &self.active {
            if !active.handle.is_finished() {
                return Err(RecognizerError("recognition has already started".to_string()));
            }
        }

        let stop = Arc::new(AtomicBool::new(false));
        let engine = Arc::clone(&self.engine);
        let language = options.primary_language().to_string();
        let thread_stop = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name(format!("habu-voice-{}", sink.session()))
            .spawn(move || run_capture(&engine, &language, &thread_stop, &sink))
            .map_err(|e| RecognizerError(format!("failed to spawn capture thread: {}", e)))?;

        self.active = Some(ActiveCapture { stop, handle });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for WhisperRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map an audio device failure onto a recognition error code
pub fn classify_device_error(message: &str) -> RecognitionErrorKind {
    let lower = message.to_lowercase();
    let refused = ["permission", "not allowed", "denied", "not authorized", "unauthorized"]
        .iter()
        .any(|needle| lower.contains(needle));

    if refused {
        RecognitionErrorKind::NotAllowed
    } else {
        RecognitionErrorKind::AudioCapture
    }
}

#[cfg(feature = "audio-io")]
fn microphone_present() -> bool {
    crate::audio::MicrophoneInput::is_present()
}

#[cfg(not(feature = "audio-io"))]
fn microphone_present() -> bool {
    false
}

fn fail(sink: &SignalSink, kind: RecognitionErrorKind) {
    sink.emit(RecognitionEvent::Error(kind));
    sink.emit(RecognitionEvent::End);
}

#[cfg(not(feature = "audio-io"))]
fn run_capture(_engine: &WhisperEngine, _language: &str, _stop: &AtomicBool, sink: &SignalSink) {
    fail(sink, RecognitionErrorKind::AudioCapture);
}

#[cfg(feature = "audio-io")]
fn run_capture(engine: &WhisperEngine, language: &str, stop: &AtomicBool, sink: &SignalSink) {
    use crate::audio::{MicrophoneInput, StreamResampler, VoiceActivityDetector, SPEECH_SAMPLE_RATE};
    use crate::speech::recognizer::RecognitionResult;
    use crate::speech::segmenter::{SegmentStep, UtteranceSegmenter};
    use crossbeam_channel::{bounded, RecvTimeoutError};
    use std::time::Duration;

    let config = engine.config();

    let mut mic = match MicrophoneInput::new() {
        Ok(mic) => mic,
        Err(e) => {
            warn!("Microphone unavailable: {}", e);
            return fail(sink, classify_device_error(&e.to_string()));
        }
    };

    let (audio_tx, audio_rx) = bounded(64);
    let (error_tx, error_rx) = bounded(4);
    if let Err(e) = mic.start(audio_tx, error_tx) {
        warn!("Microphone failed to start: {}", e);
        return fail(sink, classify_device_error(&e.to_string()));
    }

    let setup = StreamResampler::new(mic.sample_rate(), SPEECH_SAMPLE_RATE).and_then(|resampler| {
        VoiceActivityDetector::new(SPEECH_SAMPLE_RATE, config.vad_threshold)
            .map(|vad| (resampler, vad))
    });
    let (mut resampler, mut vad) = match setup {
        Ok(parts) => parts,
        Err(e) => {
            warn!("Audio processing setup failed: {}", e);
            return fail(sink, RecognitionErrorKind::AudioCapture);
        }
    };

    sink.emit(RecognitionEvent::Started);
    info!("Listening for one utterance ({})", language);

    let chunk_size = vad.chunk_size();
    let mut segmenter = UtteranceSegmenter::new(config);
    let mut pending: Vec<f32> = Vec::new();

    let utterance = 'capture: loop {
        if stop.load(Ordering::SeqCst) {
            info!("Capture stopped before an utterance completed");
            sink.emit(RecognitionEvent::End);
            return;
        }

        if let Ok(message) = error_rx.try_recv() {
            return fail(sink, classify_device_error(&message));
        }

        let block = match audio_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(block) => block,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return fail(sink, RecognitionErrorKind::AudioCapture);
            }
        };

        match resampler.push(&block) {
            Ok(samples) => pending.extend(samples),
            Err(e) => {
                warn!("{}", e);
                return fail(sink, RecognitionErrorKind::AudioCapture);
            }
        }

        while pending.len() >= chunk_size {
            let chunk: Vec<f32> = pending.drain(..chunk_size).collect();
            let is_speech = vad.is_speech(&chunk);
            match segmenter.push(&chunk, is_speech) {
                SegmentStep::Listening => {}
                SegmentStep::Complete(samples) => break 'capture samples,
                SegmentStep::NoSpeech => {
                    return fail(sink, RecognitionErrorKind::NoSpeech);
                }
            }
        }
    };

    mic.stop();

    match engine.transcribe(&utterance, language) {
        Ok(text) if !text.is_empty() => {
            sink.emit(RecognitionEvent::Result(vec![RecognitionResult::single(text)]));
            sink.emit(RecognitionEvent::End);
        }
        Ok(_) => fail(sink, RecognitionErrorKind::NoSpeech),
        Err(e) => {
            warn!("Transcription failed: {}", e);
            fail(sink, RecognitionErrorKind::Other(e.to_string()));
        }
    }
}
