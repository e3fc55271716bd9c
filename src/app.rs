use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, charts, summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| report_page(ui, &self.state));
        });
    }
}

fn report_page(ui: &mut Ui, state: &AppState) {
    ui.heading("CORD-19 Data Explorer");
    ui.label("Explore COVID-19 research papers using the CORD-19 metadata dataset.");
    ui.separator();

    ui.strong(format!("Showing {} papers after filtering", state.report.len()));
    if state.report.is_empty() {
        tables::empty_hint(ui);
    }
    ui.add_space(8.0);

    ui.heading("Sample of Papers");
    tables::preview_table(ui, state);
    ui.add_space(12.0);

    plot::charts(ui, state);
    ui.add_space(12.0);

    ui.heading("Summary Statistics");
    tables::summary(ui, state);
}
