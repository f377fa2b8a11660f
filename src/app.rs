use eframe::egui::{self, RichText, Ui};

use sales_dashboard::config::DashboardConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Start with the configured dataset already loaded, if it loads.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::default();
        state.open(&config.data_path);
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new("Sales Performance Dashboard").size(26.0).strong());
            ui.add_space(6.0);
            panels::kpi_row(ui, &self.state);
            ui.separator();
            plot::dashboard(ui, &self.state);
        });
    }
}
