use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{AUTHORS, JOURNAL, TITLE, YEAR};
use crate::data::stats::ColumnStats;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const PREVIEW_COLUMNS: [&str; 4] = [TITLE, AUTHORS, JOURNAL, YEAR];

// ---------------------------------------------------------------------------
// "Sample of Papers"
// ---------------------------------------------------------------------------

/// First rows of the filtered view: title, authors, journal, year.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let papers = &state.table.papers;
    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::initial(360.0).resizable(true).clip(true))
            .column(Column::initial(220.0).resizable(true).clip(true))
            .column(Column::initial(180.0).resizable(true).clip(true))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for name in PREVIEW_COLUMNS {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for &idx in &state.report.preview {
                    let paper = &papers[idx];
                    body.row(ROW_HEIGHT, |mut row| {
                        for name in PREVIEW_COLUMNS {
                            row.col(|ui| {
                                let value = paper.cell(name);
                                let text = value.as_text().unwrap_or_default();
                                ui.label(&text).on_hover_text(&text);
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// "Summary Statistics"
// ---------------------------------------------------------------------------

/// describe(), null counts, column list and dimensions of the filtered view.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let summary = &state.report.summary;

    ui.label("Basic numeric stats");
    ui.push_id("describe_table", |ui: &mut Ui| describe_table(ui, &summary.stats));
    ui.add_space(8.0);

    ui.label("Missing values per column");
    ui.push_id("null_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(180.0))
            .column(Column::remainder())
            .body(|mut body| {
                for (column, nulls) in &summary.null_counts {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.monospace(column);
                        });
                        row.col(|ui| {
                            ui.monospace(nulls.to_string());
                        });
                    });
                }
            });
    });
    ui.add_space(8.0);

    ui.label("Columns in the dataset");
    ui.monospace(format!("{:?}", summary.columns));
    ui.add_space(8.0);

    ui.label("Data dimensions");
    let (rows, cols) = summary.dimensions();
    ui.label(format!("Rows: {rows}, Columns: {cols}"));
}

fn describe_table(ui: &mut Ui, stats: &[ColumnStats]) {
    const STAT_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(120.0), stats.len())
        .header(ROW_HEIGHT, |mut header| {
            header.col(|_ui| {});
            for s in stats {
                header.col(|ui| {
                    ui.strong(&s.column);
                });
            }
        })
        .body(|mut body| {
            for (i, name) in STAT_NAMES.iter().enumerate() {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.strong(*name);
                    });
                    for s in stats {
                        row.col(|ui| {
                            ui.monospace(stat_cell(s, i));
                        });
                    }
                });
            }
        });
}

/// Text of row `i` of the describe table for one column.
fn stat_cell(s: &ColumnStats, i: usize) -> String {
    let value = match i {
        0 => return s.count.to_string(),
        1 => s.mean,
        2 => s.std,
        3 => s.min,
        4 => s.q25,
        5 => s.median,
        6 => s.q75,
        _ => s.max,
    };
    value.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))
}

/// Placeholder shown instead of charts when the filters match nothing.
pub fn empty_hint(ui: &mut Ui) {
    ui.label(
        egui::RichText::new("No papers match the current filters.")
            .italics()
            .weak(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::describe;

    #[test]
    fn stat_cells_format_like_pandas() {
        let s = describe("year", &[2020.0, 2021.0]);
        assert_eq!(stat_cell(&s, 0), "2");
        assert_eq!(stat_cell(&s, 1), "2020.500000");
        assert_eq!(stat_cell(&s, 7), "2021.000000");

        let empty = describe("year", &[]);
        assert_eq!(stat_cell(&empty, 0), "0");
        assert_eq!(stat_cell(&empty, 2), "NaN");
    }
}
