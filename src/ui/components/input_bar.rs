//! Input bar component
//!
//! Text field, mic toggle and send button. The bar never acts on the
//! controller itself; it reports what the user asked for.

use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub const PLACEHOLDER_LISTENING: &str = "Bolna shuru karein...";
pub const PLACEHOLDER_LOADING: &str = "Habu soch raha hai...";
pub const PLACEHOLDER_IDLE: &str = "Habu se baat karein...";

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    ToggleMic,
}

/// Hint text for the input field. Listening takes precedence over loading.
pub fn placeholder_text(is_listening: bool, is_loading: bool) -> &'static str {
    if is_listening {
        PLACEHOLDER_LISTENING
    } else if is_loading {
        PLACEHOLDER_LOADING
    } else {
        PLACEHOLDER_IDLE
    }
}

pub struct InputBar<'a> {
    input: &'a mut String,
    is_loading: bool,
    is_listening: bool,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(input: &'a mut String, is_loading: bool, is_listening: bool, theme: &'a Theme) -> Self {
        Self {
            input,
            is_loading,
            is_listening,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<InputAction> {
        let Self {
            input,
            is_loading,
            is_listening,
            theme,
        } = self;
        let mut action = None;

        egui::Frame::none()
            .fill(theme.bg_secondary)
            .rounding(theme.card_rounding)
            .inner_margin(theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if mic_button(ui, is_listening, is_loading, theme) {
                        action = Some(InputAction::ToggleMic);
                    }

                    // Reserve space for the send button
                    let available_width = ui.available_width() - 60.0;
                    let text_edit = egui::TextEdit::singleline(&mut *input)
                        .hint_text(placeholder_text(is_listening, is_loading))
                        .desired_width(available_width)
                        .font(egui::TextStyle::Body)
                        .margin(egui::Margin::symmetric(12.0, 8.0))
                        .id(egui::Id::new("message_input"));

                    let response = ui.add(text_edit);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
                    });

                    let can_send = !is_loading && !input.trim().is_empty();

                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        if can_send {
                            action = Some(InputAction::Submit);
                        }
                        response.request_focus();
                    }

                    let send = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
                        .min_size(Vec2::splat(40.0))
                        .rounding(theme.button_rounding)
                        .fill(if can_send {
                            theme.primary
                        } else {
                            theme.text_muted
                        });

                    let send_response = ui.add_enabled(can_send, send);
                    send_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
                    });
                    if send_response.clicked() {
                        action = Some(InputAction::Submit);
                    }
                });
            });

        action
    }
}

/// Returns true when the mic button was clicked
fn mic_button(ui: &mut egui::Ui, is_listening: bool, is_loading: bool, theme: &Theme) -> bool {
    let (icon, label, color) = if is_listening {
        ("⏹", "Stop voice input", theme.listening)
    } else {
        ("🎤", "Start voice input", theme.text_secondary)
    };

    let mut button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
        .min_size(Vec2::splat(40.0))
        .rounding(theme.button_rounding);
    if is_listening {
        button = button.fill(theme.listening.gamma_multiply(0.2));
    }

    let enabled = !is_loading;
    let response = ui.add_enabled(enabled, button);
    response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label));

    if is_listening {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
        let rect = response.rect;
        ui.painter().circle_stroke(
            rect.center(),
            rect.width() / 2.0 + 2.0 + pulse * 3.0,
            egui::Stroke::new(2.0 * pulse, theme.listening.gamma_multiply(1.0 - pulse * 0.5)),
        );
        ui.ctx().request_repaint();
    }

    response.clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_follows_state() {
        assert_eq!(placeholder_text(false, false), PLACEHOLDER_IDLE);
        assert_eq!(placeholder_text(false, true), PLACEHOLDER_LOADING);
        assert_eq!(placeholder_text(true, false), PLACEHOLDER_LISTENING);
        assert_eq!(placeholder_text(true, true), PLACEHOLDER_LISTENING);
    }
}
