//! Top bar with Habu's avatar and title

use crate::ui::components::Avatar;
use crate::ui::theme::Theme;
use egui::RichText;

/// Window and header title
pub const APP_TITLE: &str = "Habu - Hindi Chatbot";

pub struct Header<'a> {
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            Avatar::new(self.theme).diameter(36.0).show(ui);
            ui.add_space(self.theme.spacing_sm);

            let response = ui.label(
                RichText::new(APP_TITLE)
                    .size(20.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Label, true, APP_TITLE)
            });
        });
    }
}
