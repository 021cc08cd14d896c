use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{cards, chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExpansionTrackerApp {
    pub state: AppState,
}

impl ExpansionTrackerApp {
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_initial();
        Self { state }
    }
}

impl eframe::App for ExpansionTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + dataset metrics ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: summary chart ----
        egui::SidePanel::right("chart_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                chart::chart_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: pagination controls ----
        egui::TopBottomPanel::bottom("pagination_bar").show(ctx, |ui| {
            cards::pagination_controls(ui, &mut self.state);
        });

        // ---- Central panel: project cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::project_cards(ui, &mut self.state);
        });
    }
}
