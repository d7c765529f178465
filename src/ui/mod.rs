//! egui/eframe user interface
//!
//! Components are plain render functions over controller state. `HabuApp`
//! polls the controller once per frame and feeds user actions back to it.

mod app;
pub mod components;
mod theme;

pub use app::HabuApp;
pub use components::{InputAction, APP_TITLE};
pub use theme::Theme;

use crate::controller::ConversationController;

/// Open the main window and block until it is closed
pub fn run(controller: ConversationController) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "Habu",
        options,
        Box::new(|cc| Ok(Box::new(HabuApp::new(cc, controller)))),
    )
}
