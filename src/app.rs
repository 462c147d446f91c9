//! Main application state and UI.

use crate::chart::{ChartOptions, TimelineChart};
use crate::events::{Event, EventLoader};
use crate::settings::Settings;
use crate::theme::{self, Theme};
use eframe::egui;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

/// Main timeline application
pub struct TimelineApp {
    loader: EventLoader,
    chart: TimelineChart,
    /// Last event clicked on the chart, written by the select callback.
    selected: Rc<RefCell<Option<Event>>>,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl TimelineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut settings = Settings::load();

        // A path on the command line wins over the saved one.
        if let Some(path) = std::env::args().nth(1) {
            settings.events_path = Some(PathBuf::from(path));
        }

        let mut loader = EventLoader::new(settings.events_path.clone());
        loader.load();

        let selected: Rc<RefCell<Option<Event>>> = Rc::default();
        let sink = selected.clone();
        let options = ChartOptions {
            enable_legends: settings.enable_legends,
            theme: settings.theme,
            on_select_event: Some(Box::new(move |e: &Event| {
                *sink.borrow_mut() = Some(e.clone());
            })),
            ..Default::default()
        };
        let chart = TimelineChart::new(loader.events(), options);

        Self {
            loader,
            chart,
            selected,
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        }
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    fn sync_settings_from_ui(&mut self) {
        self.settings.theme = self.chart.theme();
        self.settings.enable_legends = self.chart.legends_enabled();
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.sync_settings_from_ui();
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Experiment Events");
            ui.separator();

            for theme in [Theme::Dark, Theme::Light] {
                if ui
                    .selectable_label(self.chart.theme() == theme, theme.label())
                    .clicked()
                {
                    self.chart.set_theme(theme);
                    self.mark_settings_dirty();
                }
            }
            ui.separator();

            let mut legends = self.chart.legends_enabled();
            if ui.checkbox(&mut legends, "Legends").changed() {
                self.chart.set_legends_enabled(legends);
                self.mark_settings_dirty();
            }

            if ui.button("Reset View").clicked() {
                self.chart.reset_view();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Zoom: {:.0}%", self.chart.zoom() * 100.0));
                ui.separator();
                ui.label(format!(
                    "{} events in {} experiments",
                    self.chart.event_count(),
                    self.chart.grouping_count()
                ));
            });
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &*self.selected.borrow() {
                Some(event) => {
                    ui.label(format!(
                        "Selected: {} @ {}",
                        event.experiment, event.start_time
                    ));
                }
                None => {
                    ui.label(egui::RichText::new("Click a point to select it").weak());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.loader.parse_errors > 0 {
                    ui.colored_label(
                        egui::Color32::from_rgb(245, 158, 11),
                        format!("{} parse errors", self.loader.parse_errors),
                    );
                }
                if self.chart.skipped_count() > 0 {
                    ui.colored_label(
                        egui::Color32::from_rgb(245, 158, 11),
                        format!("{} events skipped", self.chart.skipped_count()),
                    );
                }
                if let Some(path) = self.loader.path() {
                    ui.label(egui::RichText::new(path.display().to_string()).weak());
                } else {
                    ui.label(egui::RichText::new("sample data").weak());
                }
            });
        });
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_save_settings();

        // Pick up new events when the watched file changes.
        if self.loader.needs_refresh() {
            self.loader.load();
            self.chart.update(self.loader.events());
        }

        match self.chart.theme() {
            Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
            Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        }

        let bg = theme::chart_colors(self.chart.theme()).bg;

        egui::TopBottomPanel::top("controls")
            .frame(
                egui::Frame::none()
                    .fill(bg)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0)),
            )
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        egui::TopBottomPanel::bottom("status")
            .frame(
                egui::Frame::none()
                    .fill(bg)
                    .inner_margin(egui::Margin::symmetric(12.0, 6.0)),
            )
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(bg))
            .show(ctx, |ui| {
                self.chart.show(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.sync_settings_from_ui();
            self.settings.save();
        }
    }
}
