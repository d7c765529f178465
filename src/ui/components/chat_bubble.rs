//! One transcript entry

use crate::messages::Message;
use crate::ui::components::Avatar;
use crate::ui::theme::Theme;
use egui::{Align, Color32, Layout, RichText};

/// Accessibility label for a message, distinct per role and error state
pub fn message_label(message: &Message) -> String {
    if message.is_user() {
        format!("User message: {}", message.content())
    } else if message.is_error() {
        format!("Habu error: {}", message.content())
    } else {
        format!("Habu reply: {}", message.content())
    }
}

/// Message bubble: user turns on the right, Habu's on the left behind its
/// avatar, failures in the error style
pub struct ChatBubble<'a> {
    message: &'a Message,
    theme: &'a Theme,
}

impl<'a> ChatBubble<'a> {
    pub fn new(message: &'a Message, theme: &'a Theme) -> Self {
        Self { message, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let is_user = self.message.is_user();
        let layout = if is_user {
            Layout::right_to_left(Align::Min)
        } else {
            Layout::left_to_right(Align::Min)
        };

        ui.with_layout(layout, |ui| {
            if !is_user {
                Avatar::new(self.theme).show(ui);
            }
            self.show_bubble(ui);
        });
    }

    fn show_bubble(&self, ui: &mut egui::Ui) {
        let max_width = ui.available_width() * 0.75;
        let text_color = if self.message.is_user() || self.message.is_error() {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };

        egui::Frame::none()
            .fill(
                self.theme
                    .bubble_fill(self.message.is_user(), self.message.is_error()),
            )
            .rounding(self.theme.bubble_rounding)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    let response = ui.label(RichText::new(self.message.content()).color(text_color));
                    let label = message_label(self.message);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                    });

                    let time = self.message.timestamp().with_timezone(&chrono::Local);
                    ui.label(
                        RichText::new(time.format("%H:%M").to_string())
                            .size(10.0)
                            .color(text_color.gamma_multiply(0.7)),
                    );
                });
            });
    }
}
