//! Native Experiment Events Timeline
//!
//! A desktop app plotting experiment events as dots on a pannable,
//! zoomable time axis, one lane per experiment.

mod app;
mod chart;
mod events;
mod format;
mod settings;
mod theme;

use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 640.0])
            .with_title("Experiment Events Timeline"),
        persist_window: true, // Persist window state and egui memory between sessions
        ..Default::default()
    };

    eframe::run_native(
        "Experiment Events Timeline",
        options,
        Box::new(|cc| Ok(Box::new(app::TimelineApp::new(cc)))),
    )
}
