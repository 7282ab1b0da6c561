use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// RawRecord – one row as it appears in the source table
// ---------------------------------------------------------------------------

/// A single source row, typed at the ingestion boundary but not yet parsed.
///
/// Both cells are kept as text so that the aggregator can report exactly
/// which row and value failed to parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date / YYYY-MM-DD", alias = "Date", alias = "date")]
    pub date: String,
    #[serde(rename = "Mass / kg", alias = "Mass", alias = "mass")]
    pub mass: String,
    /// Remaining cells, aligned with [`MassDataset::extra_columns`].
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl RawRecord {
    /// Build a row from an already typed mass value.
    pub fn new(date: impl Into<String>, mass: f64) -> Self {
        RawRecord {
            date: date.into(),
            mass: mass.to_string(),
            extra: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – a parsed row
// ---------------------------------------------------------------------------

/// One observation: collection date and collected mass in kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub mass: f64,
}

// ---------------------------------------------------------------------------
// MassDataset – everything read by one load
// ---------------------------------------------------------------------------

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{u}"),
        }
    }
}

/// The rows of one load, in file order.
#[derive(Debug, Clone)]
pub struct MassDataset {
    pub records: Vec<RawRecord>,
    /// Headers of the columns other than date and mass, in source order.
    pub extra_columns: Vec<String>,
    pub source: DataSource,
}

impl MassDataset {
    pub fn new(records: Vec<RawRecord>, source: DataSource) -> Self {
        MassDataset {
            records,
            extra_columns: Vec::new(),
            source,
        }
    }

    pub fn with_extra_columns(mut self, columns: Vec<String>) -> Self {
        self.extra_columns = columns;
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CumulativeSeries – derived running total
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub cumulative_mass: f64,
}

/// Running mass total, one point per input row, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulativeSeries {
    pub points: Vec<CumulativePoint>,
}

/// Headline numbers shown next to the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub rows: usize,
    pub total_mass: f64,
    /// Earliest date in the series (chronologically, not by row).
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl CumulativeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Final running total, or 0 for an empty series.
    pub fn total(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative_mass)
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            rows: self.len(),
            total_mass: self.total(),
            first_date: self.points.iter().map(|p| p.date).min(),
            last_date: self.points.iter().map(|p| p.date).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_record_new_keeps_exact_mass_text() {
        let r = RawRecord::new("2024-01-01", 0.1);
        assert_eq!(r.mass.parse::<f64>().unwrap(), 0.1);
        assert_eq!(r.date, "2024-01-01");
    }

    #[test]
    fn empty_series_summary() {
        let s = CumulativeSeries::default();
        let summary = s.summary();
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.total_mass, 0.0);
        assert_eq!(summary.first_date, None);
        assert_eq!(summary.last_date, None);
    }

    #[test]
    fn summary_uses_chronological_span_and_last_total() {
        let s = CumulativeSeries {
            points: vec![
                CumulativePoint { date: date(2024, 3, 1), cumulative_mass: 1.0 },
                CumulativePoint { date: date(2023, 12, 24), cumulative_mass: 4.0 },
                CumulativePoint { date: date(2024, 2, 1), cumulative_mass: 3.5 },
            ],
        };
        let summary = s.summary();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.total_mass, 3.5);
        assert_eq!(summary.first_date, Some(date(2023, 12, 24)));
        assert_eq!(summary.last_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn data_source_display() {
        let u = DataSource::Url("https://example.org/m.tsv".into());
        assert_eq!(u.to_string(), "https://example.org/m.tsv");
        let f = DataSource::File(PathBuf::from("data/m.tsv"));
        assert_eq!(f.to_string(), "data/m.tsv");
    }
}
