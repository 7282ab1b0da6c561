use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LitterTallyApp {
    pub state: AppState,
    pub config: Config,
}

impl LitterTallyApp {
    pub fn new(state: AppState, config: Config) -> Self {
        Self { state, config }
    }
}

impl eframe::App for LitterTallyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.config);
        });

        // ---- Left side panel: summary, window, display options ----
        egui::SidePanel::left("side_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw rows ----
        if self.state.show_raw_table && self.state.dataset.is_some() {
            egui::TopBottomPanel::bottom("raw_table")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    panels::raw_table(ui, &self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::cumulative_plot(ui, &self.state);
        });
    }
}
