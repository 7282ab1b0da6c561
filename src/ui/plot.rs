use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::data::model::CumulativePoint;
use crate::state::AppState;

const LINE_COLOR: Color32 = Color32::from_rgb(46, 139, 87);

// ---------------------------------------------------------------------------
// Date <-> plot coordinate
// ---------------------------------------------------------------------------

/// X coordinate of a date: days since 0001-01-01.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Axis label for an x coordinate, empty if it is not a representable date.
pub fn x_to_label(x: f64) -> String {
    if !x.is_finite() || x.abs() > i32::MAX as f64 {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Cumulative mass plot (central panel)
// ---------------------------------------------------------------------------

/// Render the cumulative-mass chart in the central panel.
pub fn cumulative_plot(ui: &mut Ui, state: &AppState) {
    let Some(series) = &state.series else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = if state.dataset.is_some() {
                "The dataset has rows that cannot be summed (see the error above)"
            } else {
                "Open a file or reload from URL  (File → …)"
            };
            ui.heading(hint);
        });
        return;
    };

    let points: Vec<&CumulativePoint> = state
        .visible_indices
        .iter()
        .map(|&i| &series.points[i])
        .collect();

    Plot::new("cumulative_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Cumulative mass (kg)")
        .x_axis_formatter(|mark, _range| x_to_label(mark.value))
        .label_formatter(|name, value| {
            let prefix = if name.is_empty() {
                String::new()
            } else {
                format!("{name}\n")
            };
            format!("{prefix}{}\n{:.2} kg", x_to_label(value.x), value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.color_by_year {
                for (year, segment) in year_segments(&points) {
                    let line = Line::new(PlotPoints::from(segment))
                        .name(year.to_string())
                        .color(state.year_colors.color_for(year))
                        .width(2.0);
                    plot_ui.line(with_fill(line, state.fill_area));
                }
            } else {
                let coords: PlotPoints = points
                    .iter()
                    .map(|p| [date_to_x(p.date), p.cumulative_mass])
                    .collect();
                let line = Line::new(coords)
                    .name("Cumulative mass")
                    .color(LINE_COLOR)
                    .width(2.0);
                plot_ui.line(with_fill(line, state.fill_area));
            }
        });
}

fn with_fill(line: Line, fill: bool) -> Line {
    if fill {
        line.fill(0.0_f32)
    } else {
        line
    }
}

/// Split points into consecutive runs sharing a calendar year.
///
/// Each run after the first starts at the previous run's last point so the
/// curve stays connected.
pub fn year_segments(points: &[&CumulativePoint]) -> Vec<(i32, Vec<[f64; 2]>)> {
    let mut segments: Vec<(i32, Vec<[f64; 2]>)> = Vec::new();
    let mut prev: Option<[f64; 2]> = None;

    for p in points {
        let coord = [date_to_x(p.date), p.cumulative_mass];
        let year = p.date.year();
        match segments.last_mut() {
            Some((y, seg)) if *y == year => seg.push(coord),
            _ => segments.push((year, prev.into_iter().chain([coord]).collect())),
        }
        prev = Some(coord);
    }
    segments
}
