//! Message list component
//!
//! Renders the transcript in order, the loading indicator while a reply is
//! pending and the gateway error banner underneath. Sticks to the bottom so
//! the newest entry stays visible.

use crate::messages::Message;
use crate::ui::components::{Banner, ChatBubble, LoadingIndicator};
use crate::ui::theme::Theme;

pub struct MessageList<'a> {
    messages: &'a [Message],
    is_loading: bool,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            is_loading: false,
            error: None,
            theme,
        }
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("transcript")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                for message in self.messages {
                    ChatBubble::new(message, self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                }

                if self.is_loading {
                    LoadingIndicator::new(self.theme).show(ui);
                }

                if let Some(error) = self.error {
                    ui.add_space(self.theme.spacing_sm);
                    Banner::new(error, "Error", self.theme).show(ui);
                }

                ui.add_space(self.theme.spacing);
            });
    }
}
