use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::generate_palette;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const MAX_TICK_LABEL: usize = 14;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart of the current report.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let report = &state.report;

    ui.heading("Publications by Year");
    yearly_chart(ui, &report.yearly);

    ui.heading("Top Journals");
    let journal_bars: Vec<_> = report
        .journals
        .iter()
        .map(|(j, n)| (j.clone(), *n, state.journal_colors.color_for(j)))
        .collect();
    category_chart(
        ui,
        "journal_chart",
        "Top Journals Publishing COVID-19 Research",
        "Number of Papers",
        journal_bars,
    );

    ui.heading("Most Frequent Words in Titles");
    category_chart(
        ui,
        "word_chart",
        "Top 20 Words in Paper Titles",
        "Frequency",
        with_palette(&report.words),
    );

    if let Some(sources) = &report.sources {
        ui.heading("Papers by Source");
        category_chart(
            ui,
            "source_chart",
            "Top Sources of Papers",
            "Number of Papers",
            with_palette(sources),
        );
    }
}

fn with_palette(counts: &[(String, usize)]) -> Vec<(String, usize, Color32)> {
    counts
        .iter()
        .zip(generate_palette(counts.len()))
        .map(|((label, n), c)| (label.clone(), *n, c))
        .collect()
}

/// Bars sit on their year; the axis is numeric.
fn yearly_chart(ui: &mut Ui, yearly: &[(i32, usize)]) {
    let bars: Vec<Bar> = yearly
        .iter()
        .map(|&(year, n)| {
            Bar::new(f64::from(year), n as f64)
                .name(year.to_string())
                .width(0.8)
        })
        .collect();
    let chart = BarChart::new(bars)
        .name("Publications by Year")
        .color(Color32::LIGHT_BLUE);

    Plot::new("yearly_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Papers")
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// One bar per category at positions 0, 1, 2, … labelled on the x axis.
fn category_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    y_label: &str,
    entries: Vec<(String, usize, Color32)>,
) {
    let labels: Vec<String> = entries.iter().map(|(l, _, _)| l.clone()).collect();
    let bars: Vec<Bar> = entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, n, color))| {
            Bar::new(i as f64, n as f64)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();
    let chart = BarChart::new(bars)
        .name(title)
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}: {}", bar.name, bar.value)
        }));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Category label for an axis mark, shortened to fit under a bar.
fn tick_label(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    match labels.get(value as usize) {
        Some(label) if label.chars().count() > MAX_TICK_LABEL => {
            let short: String = label.chars().take(MAX_TICK_LABEL - 1).collect();
            format!("{short}…")
        }
        Some(label) => label.clone(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_only_on_whole_positions() {
        let labels = vec!["covid".to_string(), "a very long journal name".to_string()];
        assert_eq!(tick_label(&labels, 0.0), "covid");
        assert_eq!(tick_label(&labels, 0.5), "");
        assert_eq!(tick_label(&labels, -1.0), "");
        assert_eq!(tick_label(&labels, 2.0), "");
        assert_eq!(tick_label(&labels, 1.0), "a very long j…");
    }

    #[test]
    fn palette_follows_counts() {
        let bars = with_palette(&[("a".to_string(), 3), ("b".to_string(), 1)]);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].1, 3);
        assert_ne!(bars[0].2, bars[1].2);
        assert!(with_palette(&[]).is_empty());
    }
}
