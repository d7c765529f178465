use crate::ui::theme::Theme;
use egui::RichText;

/// Inline error banner
pub struct Banner<'a> {
    text: &'a str,
    label: &'a str,
    theme: &'a Theme,
}

impl<'a> Banner<'a> {
    /// `label` names the banner in the accessibility tree
    pub fn new(text: &'a str, label: &'a str, theme: &'a Theme) -> Self {
        Self { text, label, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.error.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, self.theme.error))
            .rounding(self.theme.button_rounding)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                let response = ui.label(RichText::new(self.text).color(self.theme.error));
                let label = format!("{}: {}", self.label, self.text);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                });
            });
    }
}
