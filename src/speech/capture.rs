//! Voice capture state machine
//!
//! Turns mic toggles and recognizer signals into one of four states:
//!
//! ```text
//!  Unavailable   (no recognizer; toggles only raise NotSupported)
//!
//!  Idle/Error --toggle--> Listening --toggle / End--> Idle
//!                             |
//!                             +--Error signal--> Error
//! ```
//!
//! Each start opens a new session. Signals tagged with any other session, or
//! arriving while not listening, are dropped, so a stopped capture can never
//! write into the input buffer afterwards.

use crate::speech::recognizer::{
    RecognitionErrorKind, RecognitionEvent, RecognitionOptions, SessionId, SessionSignal,
    SignalSink, SpeechRecognizer,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, info, warn};

/// Where the mic control currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// No speech capability on this system
    Unavailable,
    /// Ready to listen
    Idle,
    /// A capture session is running
    Listening,
    /// The last session failed; ready to listen again
    Error,
}

/// User-facing voice problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceError {
    NotSupported,
    PermissionDenied,
    CaptureFailed,
}

impl VoiceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            VoiceError::NotSupported => "माफ़ कीजिए, यह डिवाइस voice input support नहीं करता।",
            VoiceError::PermissionDenied => {
                "माइक्रोफ़ोन का एक्सेस नहीं दिया गया। कृपया अपने सिस्टम की सेटिंग्स में जाकर इसे एनेबल करें।"
            }
            VoiceError::CaptureFailed => {
                "Voice input mein kuch gadbad ho gayi. Kripya dobara koshish karein."
            }
        }
    }
}

impl From<&RecognitionErrorKind> for VoiceError {
    fn from(kind: &RecognitionErrorKind) -> Self {
        match kind {
            RecognitionErrorKind::NotAllowed => VoiceError::PermissionDenied,
            _ => VoiceError::CaptureFailed,
        }
    }
}

/// Append a transcript to the text input, separated by one space when the
/// input already holds something
pub fn append_transcript(input: &mut String, transcript: &str) {
    if !input.is_empty() {
        input.push(' ');
    }
    input.push_str(transcript);
}

/// Voice capture adapter around an optional platform recognizer
pub struct VoiceCapture {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    options: RecognitionOptions,
    state: VoiceState,
    notice: Option<VoiceError>,
    session: SessionId,
    signal_tx: Sender<SessionSignal>,
    signal_rx: Receiver<SessionSignal>,
}

impl VoiceCapture {
    /// Build the adapter from the result of the startup probe.
    ///
    /// `None` leaves it `Unavailable` for the rest of the process.
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>, options: RecognitionOptions) -> Self {
        let state = if recognizer.is_some() {
            VoiceState::Idle
        } else {
            warn!("Speech recognition not supported on this system.");
            VoiceState::Unavailable
        };
        let (signal_tx, signal_rx) = unbounded();

        Self {
            recognizer,
            options,
            state,
            notice: None,
            session: 0,
            signal_tx,
            signal_rx,
        }
    }

    /// An adapter with no recognizer at all
    pub fn unavailable() -> Self {
        Self::new(None, RecognitionOptions::default())
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn is_available(&self) -> bool {
        self.state != VoiceState::Unavailable
    }

    /// Current banner, if any
    pub fn notice(&self) -> Option<VoiceError> {
        self.notice
    }

    pub fn options(&self) -> &RecognitionOptions {
        &self.options
    }

    /// Mic button pressed
    pub fn toggle(&mut self) {
        match self.state {
            VoiceState::Unavailable => {
                self.notice = Some(VoiceError::NotSupported);
            }
            VoiceState::Listening => self.stop(),
            VoiceState::Idle | VoiceState::Error => self.start(),
        }
    }

    /// Stop listening if a session is running; otherwise a no-op
    pub fn stop(&mut self) {
        if self.state != VoiceState::Listening {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.state = VoiceState::Idle;
        info!("Stopped voice capture session {}", self.session);
    }

    fn start(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        self.notice = None;
        self.session += 1;
        let sink = SignalSink::new(self.session, self.signal_tx.clone());

        match recognizer.start(&self.options, sink) {
            Ok(()) => {
                self.state = VoiceState::Listening;
                info!("Started voice capture session {}", self.session);
            }
            Err(e) => {
                error!("Error starting speech recognition: {}", e);
                self.notice = Some(VoiceError::CaptureFailed);
                self.state = VoiceState::Error;
            }
        }
    }

    /// Drain pending recognizer signals, appending transcripts to `input`
    pub fn poll(&mut self, input: &mut String) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.handle_signal(signal, input);
        }
    }

    /// Apply one recognizer signal
    pub fn handle_signal(&mut self, signal: SessionSignal, input: &mut String) {
        if signal.session != self.session || self.state != VoiceState::Listening {
            debug!(
                "Ignoring {:?} from session {} (current {}, {:?})",
                signal.event, signal.session, self.session, self.state
            );
            return;
        }

        match signal.event {
            RecognitionEvent::Started => {
                self.notice = None;
            }
            RecognitionEvent::Result(results) => {
                let transcript = results
                    .last()
                    .and_then(|result| result.best())
                    .map(|alternative| alternative.transcript.as_str());
                if let Some(transcript) = transcript {
                    debug!("Transcript received: {:?}", transcript);
                    append_transcript(input, transcript);
                }
            }
            RecognitionEvent::Error(kind) => {
                error!("Speech recognition error: {:?}", kind);
                self.notice = Some(VoiceError::from(&kind));
                self.state = VoiceState::Error;
            }
            RecognitionEvent::End => {
                self.state = VoiceState::Idle;
                debug!("Voice capture session {} ended", self.session);
            }
        }
    }

    /// Id of the most recently started session
    pub fn current_session(&self) -> SessionId {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::recognizer::{RecognitionResult, RecognizerError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        starts: usize,
        stops: usize,
        sink: Option<SignalSink>,
        options: Option<RecognitionOptions>,
    }

    struct FakeRecognizer {
        calls: Arc<Mutex<Calls>>,
        fail_start: bool,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(
            &mut self,
            options: &RecognitionOptions,
            sink: SignalSink,
        ) -> std::result::Result<(), RecognizerError> {
            let mut calls = self.calls.lock();
            calls.starts += 1;
            calls.options = Some(options.clone());
            if self.fail_start {
                return Err(RecognizerError("already started".to_string()));
            }
            sink.emit(RecognitionEvent::Started);
            calls.sink = Some(sink);
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().stops += 1;
        }
    }

    fn capture(fail_start: bool) -> (VoiceCapture, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let recognizer = FakeRecognizer {
            calls: Arc::clone(&calls),
            fail_start,
        };
        (
            VoiceCapture::new(Some(Box::new(recognizer)), RecognitionOptions::default()),
            calls,
        )
    }

    fn emit(calls: &Arc<Mutex<Calls>>, event: RecognitionEvent) {
        let sink = calls.lock().sink.clone().expect("session started");
        sink.emit(event);
    }

    fn result(transcript: &str) -> RecognitionEvent {
        RecognitionEvent::Result(vec![RecognitionResult::single(transcript)])
    }

    #[test]
    fn test_unavailable_toggle_reports_not_supported() {
        let mut voice = VoiceCapture::unavailable();
        assert_eq!(voice.state(), VoiceState::Unavailable);

        for _ in 0..3 {
            voice.toggle();
            assert_eq!(voice.state(), VoiceState::Unavailable);
            assert!(!voice.is_listening());
            assert_eq!(voice.notice(), Some(VoiceError::NotSupported));
        }
    }

    #[test]
    fn test_toggle_starts_with_configured_options() {
        let (mut voice, calls) = capture(false);
        assert_eq!(voice.state(), VoiceState::Idle);

        voice.toggle();
        assert!(voice.is_listening());

        let options = calls.lock().options.clone().unwrap();
        assert_eq!(options.language, "hi-IN");
        assert!(!options.continuous);
        assert!(!options.interim_results);
    }

    #[test]
    fn test_result_appends_with_single_space() {
        let (mut voice, calls) = capture(false);
        let mut input = "hello".to_string();

        voice.toggle();
        emit(&calls, result("duniya"));
        voice.poll(&mut input);
        assert_eq!(input, "hello duniya");

        emit(&calls, RecognitionEvent::End);
        voice.poll(&mut input);
        assert_eq!(voice.state(), VoiceState::Idle);
    }

    #[test]
    fn test_result_into_empty_input_has_no_leading_space() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        voice.toggle();
        emit(&calls, result("namaste"));
        voice.poll(&mut input);
        assert_eq!(input, "namaste");
    }

    #[test]
    fn test_result_uses_most_recent_entry() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        voice.toggle();
        emit(
            &calls,
            RecognitionEvent::Result(vec![
                RecognitionResult::single("pehla"),
                RecognitionResult::single("doosra"),
            ]),
        );
        voice.poll(&mut input);
        assert_eq!(input, "doosra");
    }

    #[test]
    fn test_permission_error_is_distinct() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        voice.toggle();
        emit(&calls, RecognitionEvent::Error(RecognitionErrorKind::NotAllowed));
        emit(&calls, RecognitionEvent::End);
        voice.poll(&mut input);

        assert!(!voice.is_listening());
        assert_eq!(voice.state(), VoiceState::Error);
        assert_eq!(voice.notice(), Some(VoiceError::PermissionDenied));
    }

    #[test]
    fn test_other_errors_are_generic() {
        for kind in [
            RecognitionErrorKind::NoSpeech,
            RecognitionErrorKind::AudioCapture,
            RecognitionErrorKind::Network,
            RecognitionErrorKind::Other("boom".to_string()),
        ] {
            let (mut voice, calls) = capture(false);
            let mut input = String::new();

            voice.toggle();
            emit(&calls, RecognitionEvent::Error(kind));
            voice.poll(&mut input);

            assert!(!voice.is_listening());
            assert_eq!(voice.notice(), Some(VoiceError::CaptureFailed));
        }
    }

    #[test]
    fn test_start_failure_surfaces_generic_message() {
        let (mut voice, calls) = capture(true);

        voice.toggle();
        assert!(!voice.is_listening());
        assert_eq!(voice.state(), VoiceState::Error);
        assert_eq!(voice.notice(), Some(VoiceError::CaptureFailed));
        assert_eq!(calls.lock().starts, 1);
    }

    #[test]
    fn test_toggle_from_error_clears_notice_and_restarts() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        voice.toggle();
        emit(&calls, RecognitionEvent::Error(RecognitionErrorKind::AudioCapture));
        voice.poll(&mut input);
        assert_eq!(voice.state(), VoiceState::Error);

        voice.toggle();
        assert!(voice.is_listening());
        assert_eq!(voice.notice(), None);
    }

    #[test]
    fn test_toggle_while_listening_stops() {
        let (mut voice, calls) = capture(false);

        voice.toggle();
        voice.toggle();

        assert_eq!(voice.state(), VoiceState::Idle);
        assert_eq!(calls.lock().stops, 1);
    }

    #[test]
    fn test_late_result_after_stop_is_ignored() {
        let (mut voice, calls) = capture(false);
        let mut input = "draft".to_string();

        voice.toggle();
        voice.stop();
        emit(&calls, result("stray"));
        voice.poll(&mut input);

        assert_eq!(input, "draft");
        assert_eq!(voice.state(), VoiceState::Idle);
    }

    #[test]
    fn test_repeated_toggling_never_duplicates() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        for _ in 0..5 {
            voice.toggle();
            let stale = calls.lock().sink.clone().unwrap();
            voice.toggle();
            stale.emit(result("ek"));
            stale.emit(RecognitionEvent::End);
        }
        voice.poll(&mut input);

        assert!(input.is_empty());
        assert_eq!(voice.state(), VoiceState::Idle);
        assert_eq!(calls.lock().starts, 5);
        assert_eq!(calls.lock().stops, 5);
    }

    #[test]
    fn test_signal_from_old_session_ignored_while_new_one_listens() {
        let (mut voice, calls) = capture(false);
        let mut input = String::new();

        voice.toggle();
        let old = calls.lock().sink.clone().unwrap();
        voice.toggle();
        voice.toggle();

        old.emit(RecognitionEvent::End);
        old.emit(result("purana"));
        voice.poll(&mut input);
        assert!(voice.is_listening());
        assert!(input.is_empty());

        emit(&calls, result("naya"));
        voice.poll(&mut input);
        assert_eq!(input, "naya");
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (mut voice, calls) = capture(false);
        voice.stop();
        assert_eq!(voice.state(), VoiceState::Idle);
        assert_eq!(calls.lock().stops, 0);
    }

    #[test]
    fn test_append_transcript() {
        let mut input = String::new();
        append_transcript(&mut input, "ek");
        assert_eq!(input, "ek");
        append_transcript(&mut input, "do");
        assert_eq!(input, "ek do");
    }
}
