//! Three pulsing dots shown while Habu is answering

use crate::ui::components::Avatar;
use crate::ui::theme::Theme;
use egui::{Sense, Vec2};

/// Seconds between consecutive dots reaching their peak
const DOT_DELAY: f64 = 0.2;
/// Length of one pulse cycle in seconds
const PULSE_PERIOD: f64 = 1.2;

/// Brightness of dot `index` at time `t`, in `0.3..=1.0`
pub fn dot_intensity(t: f64, index: usize) -> f32 {
    let phase = ((t - index as f64 * DOT_DELAY) / PULSE_PERIOD).rem_euclid(1.0);
    let wave = (phase * std::f64::consts::TAU).sin() * 0.5 + 0.5;
    (0.3 + 0.7 * wave) as f32
}

pub struct LoadingIndicator<'a> {
    theme: &'a Theme,
}

impl<'a> LoadingIndicator<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            Avatar::new(self.theme).show(ui);

            egui::Frame::none()
                .fill(self.theme.model_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 12.0))
                .show(ui, |ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(Vec2::new(44.0, 10.0), Sense::hover());
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Label, true, "Habu is typing")
                    });

                    let t = ui.ctx().input(|i| i.time);
                    let painter = ui.painter();
                    for index in 0..3 {
                        let center = rect.left_center() + Vec2::new(5.0 + index as f32 * 17.0, 0.0);
                        let intensity = dot_intensity(t, index);
                        painter.circle_filled(
                            center,
                            3.0 + intensity * 2.0,
                            self.theme.text_secondary.gamma_multiply(intensity),
                        );
                    }
                });
        });

        ui.ctx().request_repaint();
    }
}
