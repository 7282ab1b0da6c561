use chrono::{Datelike, NaiveDate};

use crate::color::YearColors;
use crate::data::aggregate::compute_cumulative;
use crate::data::filter::DateWindow;
use crate::data::model::{CumulativeSeries, MassDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Raw rows of the last successful load.
    pub dataset: Option<MassDataset>,

    /// Running total derived from `dataset`; `None` if aggregation failed.
    pub series: Option<CumulativeSeries>,

    /// Date range currently shown (None until a series exists).
    pub window: Option<DateWindow>,

    /// Indices of series points inside `window` (cached).
    pub visible_indices: Vec<usize>,

    /// Colours for the per-year plot segments.
    pub year_colors: YearColors,

    /// Draw the area under the curve.
    pub fill_area: bool,

    /// Split the curve into one coloured segment per calendar year.
    pub color_by_year: bool,

    /// Show the raw data table under the plot.
    pub show_raw_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            series: None,
            window: None,
            visible_indices: Vec::new(),
            year_colors: YearColors::default(),
            fill_area: true,
            color_by_year: false,
            show_raw_table: true,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and derive its cumulative series.
    ///
    /// A bad row leaves `series` empty; the raw rows stay visible so the
    /// offending value can be found in the table.
    pub fn set_dataset(&mut self, dataset: MassDataset) {
        match compute_cumulative(&dataset.records) {
            Ok(series) => {
                self.year_colors = YearColors::new(series.points.iter().map(|p| p.date.year()));
                self.window = DateWindow::spanning(&series);
                self.series = Some(series);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot aggregate {}: {e}", dataset.source);
                self.series = None;
                self.window = None;
                self.year_colors = YearColors::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Record a failed load without discarding what is already shown.
    pub fn set_error(&mut self, context: &str, err: &anyhow::Error) {
        log::error!("{context}: {err:#}");
        self.status_message = Some(format!("{context}: {err:#}"));
    }

    /// Restrict the view to `[from, to]` (swapped if reversed).
    pub fn set_window(&mut self, from: NaiveDate, to: NaiveDate) {
        if self.series.is_some() {
            self.window = Some(DateWindow::new(from, to));
            self.refilter();
        }
    }

    /// Show the whole series again.
    pub fn reset_window(&mut self) {
        self.window = self.series.as_ref().and_then(DateWindow::spanning);
        self.refilter();
    }

    /// Recompute `visible_indices` after a window change.
    pub fn refilter(&mut self) {
        self.visible_indices = match (&self.series, &self.window) {
            (Some(series), Some(window)) => window.visible_indices(series),
            _ => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DataSource, RawRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(rows: Vec<RawRecord>) -> MassDataset {
        MassDataset::new(rows, DataSource::Url("https://example.org/m.tsv".into()))
    }

    #[test]
    fn good_dataset_builds_series_and_full_window() {
        let mut state = AppState::default();
        state.set_dataset(dataset(vec![
            RawRecord::new("2023-12-30", 1.0),
            RawRecord::new("2024-01-02", 2.0),
        ]));
        assert_eq!(state.series.as_ref().unwrap().total(), 3.0);
        assert_eq!(
            state.window,
            Some(DateWindow::new(date(2023, 12, 30), date(2024, 1, 2)))
        );
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.year_colors.legend_entries().len(), 2);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn bad_row_clears_series_and_reports() {
        let mut state = AppState::default();
        state.set_dataset(dataset(vec![RawRecord::new("2024-01-01", 1.0)]));
        state.set_dataset(dataset(vec![RawRecord {
            date: "not-a-date".into(),
            mass: "1".into(),
            extra: Vec::new(),
        }]));
        assert!(state.series.is_none());
        assert!(state.visible_indices.is_empty());
        assert!(state.dataset.is_some());
        assert!(state.status_message.unwrap().contains("not-a-date"));
    }

    #[test]
    fn window_narrows_and_resets() {
        let mut state = AppState::default();
        state.set_dataset(dataset(vec![
            RawRecord::new("2024-01-01", 1.0),
            RawRecord::new("2024-02-01", 1.0),
            RawRecord::new("2024-03-01", 1.0),
        ]));
        state.set_window(date(2024, 2, 15), date(2024, 1, 15));
        assert_eq!(state.visible_indices, vec![1]);
        state.reset_window();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn load_error_keeps_previous_data() {
        let mut state = AppState::default();
        state.set_dataset(dataset(vec![RawRecord::new("2024-01-01", 1.0)]));
        state.set_error("Reload failed", &anyhow::anyhow!("timed out"));
        assert!(state.series.is_some());
        assert_eq!(state.status_message.as_deref(), Some("Reload failed: timed out"));
    }
}
