use crate::ui::theme::Theme;
use egui::{Align2, FontId, Sense, Vec2};

/// Letter shown in Habu's avatar
pub const AVATAR_LETTER: &str = "H";

/// Round avatar with Habu's initial
pub struct Avatar<'a> {
    theme: &'a Theme,
    diameter: f32,
}

impl<'a> Avatar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            diameter: 32.0,
        }
    }

    pub fn diameter(mut self, diameter: f32) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.diameter), Sense::hover());
        let painter = ui.painter();

        painter.circle_filled(rect.center(), self.diameter / 2.0, self.theme.primary);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            AVATAR_LETTER,
            FontId::proportional(self.diameter * 0.5),
            egui::Color32::WHITE,
        );

        response
    }
}
