//! Conversation controller
//!
//! Owns the transcript, the text input and the request state. The UI calls
//! `poll_events` once per frame, renders `view()` and forwards user actions
//! to `submit_input` and `toggle_mic`.
//!
//! At most one gateway request is in flight. Replies are matched to the
//! pending request by id, so anything arriving for an older id is dropped.

use crate::llm::{GatewayError, GatewayEvent, GatewayHandle, GREETING};
use crate::messages::{Message, Transcript};
use crate::speech::{VoiceCapture, VoiceError};
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Reply text shown when the model could not be reached
pub const GATEWAY_FALLBACK: &str = "Ek error aaya. Kripya thodi der baad koshish karein.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Idle,
    Pending { request_id: Uuid, started: Instant },
}

/// What the presentation layer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct ChatView<'a> {
    pub messages: &'a [Message],
    pub is_loading: bool,
    pub is_listening: bool,
    pub mic_available: bool,
    pub error: Option<&'a str>,
    pub mic_error: Option<VoiceError>,
}

pub struct ConversationController {
    transcript: Transcript,
    /// Text currently in the input box
    pub input: String,
    request: RequestState,
    error: Option<String>,
    voice: VoiceCapture,
    gateway: GatewayHandle,
}

impl ConversationController {
    /// Start a conversation seeded with the greeting
    pub fn new(gateway: GatewayHandle, voice: VoiceCapture) -> Self {
        Self {
            transcript: Transcript::seeded(GREETING),
            input: String::new(),
            request: RequestState::Idle,
            error: None,
            voice,
            gateway,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn voice(&self) -> &VoiceCapture {
        &self.voice
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Pending { .. })
    }

    /// Gateway failure banner
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> ChatView<'_> {
        ChatView {
            messages: self.transcript.messages(),
            is_loading: self.is_loading(),
            is_listening: self.voice.is_listening(),
            mic_available: self.voice.is_available(),
            error: self.error(),
            mic_error: self.voice.notice(),
        }
    }

    /// Submit whatever is in the input box
    pub fn submit_input(&mut self) -> bool {
        let raw = std::mem::take(&mut self.input);
        let submitted = self.submit(&raw);
        if !submitted {
            self.input = raw;
        }
        submitted
    }

    /// Send one user turn.
    ///
    /// Returns `false` and changes nothing when the text is blank or a
    /// request is already pending.
    pub fn submit(&mut self, raw: &str) -> bool {
        let text = raw.trim();
        if text.is_empty() || self.is_loading() {
            debug!("Submit ignored (blank: {}, loading: {})", text.is_empty(), self.is_loading());
            return false;
        }

        self.voice.stop();

        let request_id = Uuid::new_v4();
        self.transcript.push(Message::user(text));
        self.input.clear();
        self.error = None;
        self.request = RequestState::Pending {
            request_id,
            started: Instant::now(),
        };
        info!("Sending message {} ({} chars)", request_id, text.chars().count());

        if let Err(e) = self.gateway.dispatch(text.to_string(), request_id) {
            error!("Could not dispatch request: {}", e);
            self.settle(request_id, Err(GatewayError::new(e.to_string())));
        }
        true
    }

    /// Resolve the pending request. Results for any other id are ignored.
    pub fn settle(&mut self, request_id: Uuid, outcome: Result<String, GatewayError>) {
        let started = match self.request {
            RequestState::Pending {
                request_id: pending,
                started,
            } if pending == request_id => started,
            _ => {
                debug!("Dropping result for stale request {}", request_id);
                return;
            }
        };

        match outcome {
            Ok(text) => {
                info!("Reply for {} after {:?}", request_id, started.elapsed());
                self.transcript.push(Message::model(text));
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                self.transcript.push(Message::model_error(GATEWAY_FALLBACK));
                self.error = Some(GATEWAY_FALLBACK.to_string());
            }
        }
        self.request = RequestState::Idle;
    }

    /// Mic button pressed
    pub fn toggle_mic(&mut self) {
        self.voice.toggle();
    }

    /// Apply everything the gateway worker and the recognizer sent since
    /// the last frame
    pub fn poll_events(&mut self) {
        while let Some(event) = self.gateway.try_event() {
            match event {
                GatewayEvent::Reply {
                    request_id,
                    text,
                    elapsed_ms,
                } => {
                    debug!("Gateway replied in {}ms", elapsed_ms);
                    self.settle(request_id, Ok(text));
                }
                GatewayEvent::Failed { request_id, error } => {
                    self.settle(request_id, Err(error));
                }
                GatewayEvent::Shutdown => {
                    debug!("Gateway worker has shut down");
                }
            }
        }

        self.voice.poll(&mut self.input);
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down conversation");
        self.voice.stop();
        self.gateway.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GatewayCommand;
    use crate::messages::Role;
    use crossbeam_channel::{unbounded, Receiver, Sender};

    fn controller() -> (ConversationController, Receiver<GatewayCommand>, Sender<GatewayEvent>) {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let handle = GatewayHandle::from_channels(command_tx, event_rx);
        (
            ConversationController::new(handle, VoiceCapture::unavailable()),
            command_rx,
            event_tx,
        )
    }

    fn sent_id(commands: &Receiver<GatewayCommand>) -> Uuid {
        match commands.try_recv() {
            Ok(GatewayCommand::Send { request_id, .. }) => request_id,
            other => panic!("expected a send command, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_with_greeting() {
        let (ctrl, _, _) = controller();
        let view = ctrl.view();
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].role(), Role::Model);
        assert_eq!(view.messages[0].content(), GREETING);
        assert!(!view.is_loading);
        assert!(view.error.is_none());
    }

    #[test]
    fn test_submit_trims_and_sends() {
        let (mut ctrl, commands, _) = controller();
        ctrl.input = "  kaise ho?  ".to_string();

        assert!(ctrl.submit_input());
        assert!(ctrl.input.is_empty());
        assert!(ctrl.is_loading());
        assert_eq!(ctrl.transcript().last().map(|m| m.content()), Some("kaise ho?"));

        match commands.try_recv() {
            Ok(GatewayCommand::Send { text, .. }) => assert_eq!(text, "kaise ho?"),
            other => panic!("expected a send command, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let (mut ctrl, commands, _) = controller();
        ctrl.input = "   \n\t".to_string();

        assert!(!ctrl.submit_input());
        assert_eq!(ctrl.input, "   \n\t");
        assert_eq!(ctrl.transcript().len(), 1);
        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let (mut ctrl, commands, _) = controller();
        assert!(ctrl.submit("pehla"));
        assert!(!ctrl.submit("doosra"));

        assert_eq!(ctrl.transcript().len(), 2);
        sent_id(&commands);
        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_reply_settles_request() {
        let (mut ctrl, commands, events) = controller();
        ctrl.submit("Namaste");
        let request_id = sent_id(&commands);

        events
            .send(GatewayEvent::Reply {
                request_id,
                text: "Namaste! Kaise madad karun?".to_string(),
                elapsed_ms: 12,
            })
            .unwrap();
        ctrl.poll_events();

        let view = ctrl.view();
        assert_eq!(view.messages.len(), 3);
        assert_eq!(view.messages[2].role(), Role::Model);
        assert!(!view.messages[2].is_error());
        assert!(!view.is_loading);
    }

    #[test]
    fn test_failure_appends_fallback() {
        let (mut ctrl, commands, events) = controller();
        ctrl.submit("Namaste");
        let request_id = sent_id(&commands);

        events
            .send(GatewayEvent::Failed {
                request_id,
                error: GatewayError::new("HTTP 500"),
            })
            .unwrap();
        ctrl.poll_events();

        let last = ctrl.transcript().last().unwrap();
        assert!(last.is_error());
        assert_eq!(last.content(), GATEWAY_FALLBACK);
        assert_eq!(ctrl.error(), Some(GATEWAY_FALLBACK));
        assert!(!ctrl.is_loading());
    }

    #[test]
    fn test_next_submit_clears_error() {
        let (mut ctrl, commands, _) = controller();
        ctrl.submit("ek");
        let request_id = sent_id(&commands);
        ctrl.settle(request_id, Err(GatewayError::new("timeout")));
        assert!(ctrl.error().is_some());

        ctrl.submit("do");
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let (mut ctrl, commands, _) = controller();
        ctrl.submit("Namaste");
        sent_id(&commands);

        ctrl.settle(Uuid::new_v4(), Ok("late".to_string()));
        assert!(ctrl.is_loading());
        assert_eq!(ctrl.transcript().len(), 2);
    }

    #[test]
    fn test_dead_worker_settles_as_failure() {
        let (mut ctrl, commands, _) = controller();
        drop(commands);

        assert!(ctrl.submit("Namaste"));
        assert!(!ctrl.is_loading());
        assert!(ctrl.transcript().last().unwrap().is_error());
    }

    #[test]
    fn test_mic_toggle_without_recognizer_shows_notice() {
        let (mut ctrl, _, _) = controller();
        ctrl.toggle_mic();
        let view = ctrl.view();
        assert!(!view.is_listening);
        assert!(!view.mic_available);
        assert_eq!(view.mic_error, Some(VoiceError::NotSupported));
    }
}
