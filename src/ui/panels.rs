use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Year range ----
    ui.strong("Select publication year range");
    let (lo, hi) = state.options.year_bounds;
    let (mut from, mut to) = state.filters.year_range;
    let mut moved = false;
    moved |= ui
        .add(egui::Slider::new(&mut from, lo..=hi).text("from"))
        .changed();
    moved |= ui
        .add(egui::Slider::new(&mut to, lo..=hi).text("to"))
        .changed();
    if moved {
        state.set_year_range(from, to);
    }
    ui.separator();

    // ---- Journal multi-select ----
    let journals = state.options.journals.clone();
    let n_selected = journals
        .iter()
        .filter(|j| state.filters.journals.contains(*j))
        .count();
    ui.strong(format!("Select journals  ({n_selected}/{})", journals.len()));

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_journals();
        }
        if ui.small_button("None").clicked() {
            state.select_no_journals();
        }
        if ui.small_button("Reset filters").clicked() {
            state.reset_filters();
        }
    });

    if journals.is_empty() {
        ui.label("No journals in this dataset.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for journal in &journals {
                let mut checked = state.filters.journals.contains(journal);
                let text = RichText::new(journal).color(state.journal_colors.color_for(journal));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_journal(journal);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} papers after cleaning",
            state.source_path.display(),
            state.table.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open paper metadata")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
