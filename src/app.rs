use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, login, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MeanAgeApp {
    pub state: AppState,
}

impl MeanAgeApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MeanAgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Passphrase gate: nothing else is shown until it opens ----
        if !self.state.gate.is_open() {
            egui::CentralPanel::default().show(ctx, |ui| {
                login::passphrase_prompt(ui, &mut self.state);
            });
            return;
        }

        // ---- Top panel: title + chart tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls & insights ----
        egui::SidePanel::left("filter_panel")
            .default_width(250.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw rows behind the current filters ----
        egui::TopBottomPanel::bottom("raw_data")
            .resizable(true)
            .show(ctx, |ui| {
                charts::raw_data(ui, &self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::chart_area(ui, &self.state);
        });
    }
}
