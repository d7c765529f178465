//! Scripted gateway and recognizer shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use habu::controller::ConversationController;
use habu::llm::{GatewayError, GatewayPipeline, ResponseGateway};
use habu::speech::{
    RecognitionEvent, RecognitionOptions, RecognitionResult, RecognizerError, SignalSink,
    SpeechRecognizer, VoiceCapture,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Replies from a script; `None` entries fail
pub struct ScriptedGateway {
    script: VecDeque<Option<String>>,
    pub received: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Option<&str>>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|reply| reply.map(str::to_string))
                .collect(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseGateway for ScriptedGateway {
    async fn send(&mut self, text: &str) -> Result<String, GatewayError> {
        self.received.lock().push(text.to_string());
        match self.script.pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(GatewayError::new("scripted failure")),
            None => Err(GatewayError::new("script exhausted")),
        }
    }
}

/// What the fake recognizer has seen
#[derive(Default)]
pub struct RecognizerLog {
    pub starts: usize,
    pub stops: usize,
    pub sink: Option<SignalSink>,
    pub options: Option<RecognitionOptions>,
}

/// Recognizer whose signals are driven by the test
#[derive(Clone, Default)]
pub struct FakeRecognizer {
    pub log: Arc<Mutex<RecognizerLog>>,
    pub fail_start: bool,
}

impl FakeRecognizer {
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Default::default()
        }
    }

    /// Emit on the sink of the most recent session
    pub fn emit(&self, event: RecognitionEvent) {
        let log = self.log.lock();
        let sink = log.sink.as_ref().expect("no session started");
        sink.emit(event);
    }

    pub fn say(&self, transcript: &str) {
        self.emit(RecognitionEvent::Result(vec![RecognitionResult::single(
            transcript,
        )]));
        self.emit(RecognitionEvent::End);
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn start(
        &mut self,
        options: &RecognitionOptions,
        sink: SignalSink,
    ) -> Result<(), RecognizerError> {
        if self.fail_start {
            return Err(RecognizerError("device busy".to_string()));
        }
        let mut log = self.log.lock();
        log.starts += 1;
        log.options = Some(options.clone());
        log.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().stops += 1;
    }
}

/// Controller wired to a real gateway worker running `gateway`
pub fn controller_with(
    gateway: ScriptedGateway,
    recognizer: Option<FakeRecognizer>,
) -> ConversationController {
    let pipeline = GatewayPipeline::new(Box::new(gateway));
    let handle = pipeline.handle();
    pipeline.start_worker().expect("worker starts");

    let recognizer = recognizer.map(|r| Box::new(r) as Box<dyn SpeechRecognizer>);
    ConversationController::new(handle, VoiceCapture::new(recognizer, RecognitionOptions::default()))
}

/// Poll until the pending request settles
pub fn wait_settled(controller: &mut ConversationController) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.is_loading() {
        assert!(Instant::now() < deadline, "request never settled");
        std::thread::sleep(Duration::from_millis(5));
        controller.poll_events();
    }
}
