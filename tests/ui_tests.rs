//! UI automation tests using egui_kittest and AccessKit
//!
//! These drive the real `HabuApp` frame function against a controller whose
//! gateway replies from a script, and check the accessibility tree for the
//! expected elements.

mod common;

use common::{controller_with, FakeRecognizer, ScriptedGateway};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use habu::controller::GATEWAY_FALLBACK;
use habu::llm::GREETING;
use habu::speech::VoiceError;
use habu::ui::{HabuApp, Theme, APP_TITLE};
use std::time::{Duration, Instant};

fn harness(app: HabuApp) -> Harness<'static, HabuApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(480.0, 720.0))
        .build_state(|ctx, app: &mut HabuApp| app.ui(ctx), app)
}

fn app(script: Vec<Option<&str>>, recognizer: Option<FakeRecognizer>) -> HabuApp {
    HabuApp::with_theme(
        controller_with(ScriptedGateway::new(script), recognizer),
        Theme::dark(),
    )
}

/// Run frames until the pending reply has been applied
fn run_until_settled(harness: &mut Harness<'_, HabuApp>) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while harness.state().controller().is_loading() {
        assert!(Instant::now() < deadline, "reply never arrived");
        std::thread::sleep(Duration::from_millis(10));
        harness.run();
    }
    harness.run();
}

fn send(harness: &mut Harness<'_, HabuApp>, text: &str) {
    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text(text);
    harness.run();
    harness.get_by_label("Send message").click();
    harness.run();
}

/// Test that the header shows the app title
#[test]
fn test_header_title() {
    let mut harness = harness(app(vec![], None));
    harness.run();

    let _title = harness.get_by_label(APP_TITLE);
}

/// Test that the conversation opens with the greeting
#[test]
fn test_greeting_is_shown() {
    let mut harness = harness(app(vec![], None));
    harness.run();

    let _greeting = harness.get_by_label(&format!("Habu reply: {GREETING}"));
}

/// Test that the input bar controls are accessible
#[test]
fn test_input_controls_exist() {
    let mut harness = harness(app(vec![], None));
    harness.run();

    let _input = harness.get_by_label("Message input");
    let _send = harness.get_by_label("Send message");
    let _mic = harness.get_by_label("Start voice input");
}

/// Test that typing text into the input field updates the controller
#[test]
fn test_type_text_into_input() {
    let mut harness = harness(app(vec![], None));
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text("Namaste");
    harness.run();

    assert_eq!(harness.state().controller().input, "Namaste");
}

/// Test that clicking send with a blank input does nothing
#[test]
fn test_cannot_send_empty_message() {
    let mut harness = harness(app(vec![Some("unused")], None));
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();

    let controller = harness.state().controller();
    assert_eq!(controller.transcript().len(), 1, "Only the greeting");
    assert!(!controller.is_loading());
}

/// Test the full send and reply flow
#[test]
fn test_send_message_gets_reply() {
    let mut harness = harness(app(vec![Some("Main theek hoon, dhanyavaad!")], None));
    harness.run();

    send(&mut harness, "Aap kaise hain?");

    assert!(harness.state().controller().input.is_empty(), "Input should be cleared");
    let _user_msg = harness.get_by_label("User message: Aap kaise hain?");

    run_until_settled(&mut harness);

    let _reply = harness.get_by_label("Habu reply: Main theek hoon, dhanyavaad!");
    assert_eq!(harness.state().controller().transcript().len(), 3);
}

/// Test that a failed reply renders as an error bubble plus banner
#[test]
fn test_failed_reply_shows_error() {
    let mut harness = harness(app(vec![None], None));
    harness.run();

    send(&mut harness, "Namaste");
    run_until_settled(&mut harness);

    let _bubble = harness.get_by_label(&format!("Habu error: {GATEWAY_FALLBACK}"));
    let _banner = harness.get_by_label(&format!("Error: {GATEWAY_FALLBACK}"));
}

/// Test that the mic reports missing voice support
#[test]
fn test_mic_without_support_shows_notice() {
    let mut harness = harness(app(vec![], None));
    harness.run();

    harness.get_by_label("Start voice input").click();
    harness.run();

    let notice = VoiceError::NotSupported.user_message();
    let _banner = harness.get_by_label(&format!("Voice error: {notice}"));
}

/// Test that the mic button toggles listening and dictation fills the input
#[test]
fn test_mic_toggle_and_dictation() {
    let recognizer = FakeRecognizer::default();
    let mut harness = harness(app(vec![], Some(recognizer.clone())));
    harness.run();

    harness.get_by_label("Start voice input").click();
    harness.run();
    assert!(harness.state().controller().view().is_listening);
    let _stop = harness.get_by_label("Stop voice input");

    recognizer.say("aaj ka mausam");
    harness.run();

    let controller = harness.state().controller();
    assert!(!controller.view().is_listening);
    assert_eq!(controller.input, "aaj ka mausam");
}
