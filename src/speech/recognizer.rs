//! Speech recognizer seam
//!
//! A recognizer is an exclusive platform resource with start/stop controls
//! that reports back through four signals: started, result, error and end.

use crossbeam_channel::Sender;
use thiserror::Error;
use tracing::debug;

/// How a capture session should run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// BCP-47 language tag, e.g. `hi-IN`
    pub language: String,

    /// Keep listening after the first utterance
    pub continuous: bool,

    /// Deliver partial hypotheses while speaking
    pub interim_results: bool,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "hi-IN".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

impl RecognitionOptions {
    /// Primary language subtag (`hi` for `hi-IN`)
    pub fn primary_language(&self) -> &str {
        self.language
            .split(['-', '_'])
            .next()
            .unwrap_or(&self.language)
    }
}

/// One hypothesis for a result entry
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionAlternative {
    pub transcript: String,
    /// Engine confidence, when the engine reports one
    pub confidence: Option<f32>,
}

/// One recognized utterance, best alternative first
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionResult {
    pub alternatives: Vec<RecognitionAlternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    /// A final result with a single hypothesis
    pub fn single(transcript: impl Into<String>) -> Self {
        Self {
            alternatives: vec![RecognitionAlternative {
                transcript: transcript.into(),
                confidence: None,
            }],
            is_final: true,
        }
    }

    pub fn best(&self) -> Option<&RecognitionAlternative> {
        self.alternatives.first()
    }
}

/// Error codes a recognizer can report while listening
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Microphone access was refused
    NotAllowed,
    /// Nothing was said before the recognizer gave up
    NoSpeech,
    /// The audio device failed
    AudioCapture,
    /// A recognition service could not be reached
    Network,
    /// The session was torn down
    Aborted,
    Other(String),
}

/// Signals emitted by a running capture session
#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    Started,
    /// All results of the session so far; the last entry is the newest
    Result(Vec<RecognitionResult>),
    Error(RecognitionErrorKind),
    End,
}

/// Identifies one start..end capture session
pub type SessionId = u64;

/// A signal tagged with the session that produced it
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSignal {
    pub session: SessionId,
    pub event: RecognitionEvent,
}

/// Where a recognizer delivers the signals of one session
#[derive(Clone, Debug)]
pub struct SignalSink {
    session: SessionId,
    tx: Sender<SessionSignal>,
}

impl SignalSink {
    pub fn new(session: SessionId, tx: Sender<SessionSignal>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Deliver a signal. Returns false once nobody is listening any more.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        let delivered = self
            .tx
            .send(SessionSignal {
                session: self.session,
                event,
            })
            .is_ok();
        if !delivered {
            debug!("Dropping recognition signal for session {}", self.session);
        }
        delivered
    }
}

/// Synchronous failure to start a capture session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Speech recognition could not start: {0}")]
pub struct RecognizerError(pub String);

/// Platform speech capability
pub trait SpeechRecognizer: Send {
    /// Begin a capture session reporting to `sink`.
    ///
    /// Errors that happen after the session is running are reported as
    /// `RecognitionEvent::Error` instead.
    fn start(
        &mut self,
        options: &RecognitionOptions,
        sink: SignalSink,
    ) -> std::result::Result<(), RecognizerError>;

    /// Stop the running session, if any
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_default_options() {
        let options = RecognitionOptions::default();
        assert_eq!(options.language, "hi-IN");
        assert!(!options.continuous);
        assert!(!options.interim_results);
        assert_eq!(options.primary_language(), "hi");
    }

    #[test]
    fn test_primary_language_without_region() {
        let options = RecognitionOptions {
            language: "en".to_string(),
            ..Default::default()
        };
        assert_eq!(options.primary_language(), "en");
    }

    #[test]
    fn test_sink_tags_session() {
        let (tx, rx) = unbounded();
        let sink = SignalSink::new(7, tx);
        assert!(sink.emit(RecognitionEvent::Started));

        let signal = rx.try_recv().unwrap();
        assert_eq!(signal.session, 7);
        assert_eq!(signal.event, RecognitionEvent::Started);

        drop(rx);
        assert!(!sink.emit(RecognitionEvent::End));
    }

    #[test]
    fn test_best_alternative() {
        let result = RecognitionResult::single("namaste");
        assert_eq!(result.best().map(|a| a.transcript.as_str()), Some("namaste"));
        assert!(result.is_final);
    }
}
