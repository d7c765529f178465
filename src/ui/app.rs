//! Main application struct and eframe integration

use crate::controller::ConversationController;
use crate::ui::components::{Banner, Header, InputAction, InputBar, MessageList};
use crate::ui::theme::Theme;
use egui::{CentralPanel, TopBottomPanel};
use tracing::info;

/// Main Habu application
pub struct HabuApp {
    controller: ConversationController,
    theme: Theme,
}

impl HabuApp {
    pub fn new(cc: &eframe::CreationContext<'_>, controller: ConversationController) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self::with_theme(controller, theme)
    }

    /// Build without an eframe creation context (headless tests)
    pub fn with_theme(controller: ConversationController, theme: Theme) -> Self {
        Self { controller, theme }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ConversationController {
        &mut self.controller
    }

    /// Poll the controller and draw one frame
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.controller.poll_events();

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                Header::new(&self.theme).show(ui);
            });

        let action = self.show_input_area(ctx);
        self.show_content(ctx);

        match action {
            Some(InputAction::Submit) => {
                self.controller.submit_input();
            }
            Some(InputAction::ToggleMic) => self.controller.toggle_mic(),
            None => {}
        }

        let view = self.controller.view();
        if view.is_loading || view.is_listening {
            ctx.request_repaint();
        }
    }

    fn show_input_area(&mut self, ctx: &egui::Context) -> Option<InputAction> {
        let view = self.controller.view();
        let (is_loading, is_listening) = (view.is_loading, view.is_listening);
        let mic_error = view.mic_error;
        let theme = &self.theme;
        let input = &mut self.controller.input;

        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(theme.bg_primary)
                    .inner_margin(theme.spacing),
            )
            .show(ctx, |ui| {
                if let Some(notice) = mic_error {
                    Banner::new(notice.user_message(), "Voice error", theme).show(ui);
                    ui.add_space(theme.spacing_sm);
                }

                InputBar::new(input, is_loading, is_listening, theme).show(ui)
            })
            .inner
    }

    fn show_content(&self, ctx: &egui::Context) {
        let view = self.controller.view();

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0)),
            )
            .show(ctx, |ui| {
                MessageList::new(view.messages, &self.theme)
                    .loading(view.is_loading)
                    .error(view.error)
                    .show(ui);
            });
    }
}

impl eframe::App for HabuApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Habu shutting down");
        self.controller.shutdown();
    }
}
