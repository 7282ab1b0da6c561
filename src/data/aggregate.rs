use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{CumulativePoint, CumulativeSeries, RawRecord, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A row that could not be turned into a [`Record`].
///
/// `row` is the zero-based position in the input sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("row {row}: cannot parse date '{value}'")]
    DateParse { row: usize, value: String },

    #[error("row {row}: mass '{value}' is not a number")]
    Value { row: usize, value: String },
}

/// A single cell that could not be parsed, before it is tied to a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    #[error("cannot parse date '{0}'")]
    Date(String),

    #[error("mass '{0}' is not a number")]
    Mass(String),
}

impl CellError {
    fn at_row(self, row: usize) -> AggregateError {
        match self {
            CellError::Date(value) => AggregateError::DateParse { row, value },
            CellError::Mass(value) => AggregateError::Value { row, value },
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a date cell. Timestamps are accepted and truncated to their date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CellError> {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(CellError::Date(raw.to_string()))
}

/// Parse a mass cell in kg. NaN and infinities are rejected.
pub fn parse_mass(raw: &str) -> Result<f64, CellError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CellError::Mass(raw.to_string())),
    }
}

/// Parse one row, tagging any failure with its index.
pub fn parse_record(row: usize, raw: &RawRecord) -> Result<Record, AggregateError> {
    Ok(Record {
        date: parse_date(&raw.date).map_err(|e| e.at_row(row))?,
        mass: parse_mass(&raw.mass).map_err(|e| e.at_row(row))?,
    })
}

// ---------------------------------------------------------------------------
// Running total
// ---------------------------------------------------------------------------

/// Running sum of mass in input order.
///
/// Rows are not sorted by date and sums are not clamped, so negative
/// corrections show up as a dip. The first bad row aborts the whole
/// computation.
pub fn compute_cumulative(rows: &[RawRecord]) -> Result<CumulativeSeries, AggregateError> {
    let mut running = 0.0_f64;
    let points = rows
        .iter()
        .enumerate()
        .map(|(i, raw)| -> Result<CumulativePoint, AggregateError> {
            let rec = parse_record(i, raw)?;
            running += rec.mass;
            Ok(CumulativePoint {
                date: rec.date,
                cumulative_mass: running,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("computed cumulative mass over {} rows", points.len());
    Ok(CumulativeSeries { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2024-01-05")]
    #[case("  2024-01-05 ")]
    #[case("2024/01/05")]
    #[case("05.01.2024")]
    #[case("05/01/2024")]
    #[case("2024-01-05T13:45:00")]
    #[case("2024-01-05 08:00:00")]
    fn accepted_date_formats(#[case] raw: &str) {
        assert_eq!(parse_date(raw).unwrap(), date(2024, 1, 5));
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("")]
    #[case("2024-13-01")]
    #[case("2023-02-29")]
    fn rejected_dates(#[case] raw: &str) {
        assert!(matches!(parse_date(raw), Err(CellError::Date(_))));
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("NaN")]
    #[case("inf")]
    #[case("1,5")]
    fn rejected_masses(#[case] raw: &str) {
        assert!(matches!(parse_mass(raw), Err(CellError::Mass(_))));
    }

    #[test]
    fn standalone_cell_errors_name_no_row() {
        let err = parse_date("31/02/2024").unwrap_err();
        assert_eq!(err.to_string(), "cannot parse date '31/02/2024'");
        assert_eq!(
            err.at_row(7),
            AggregateError::DateParse {
                row: 7,
                value: "31/02/2024".into()
            }
        );
        assert_eq!(parse_mass("lots").unwrap_err().to_string(), "mass 'lots' is not a number");
    }

    #[test]
    fn mass_allows_fractions_and_negatives() {
        assert_relative_eq!(parse_mass(" 0.35 ").unwrap(), 0.35);
        assert_relative_eq!(parse_mass("-1.25").unwrap(), -1.25);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let out = compute_cumulative(&[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn single_row_is_its_own_mass() {
        let out = compute_cumulative(&[RawRecord::new("2024-01-01", 5.0)]).unwrap();
        assert_eq!(
            out.points,
            vec![CumulativePoint {
                date: date(2024, 1, 1),
                cumulative_mass: 5.0
            }]
        );
    }

    #[test]
    fn negative_contribution_is_not_clamped() {
        let rows = [
            RawRecord::new("2024-01-01", 2.0),
            RawRecord::new("2024-01-02", 3.0),
            RawRecord::new("2024-01-03", -1.0),
        ];
        let out = compute_cumulative(&rows).unwrap();
        let got: Vec<(NaiveDate, f64)> = out
            .points
            .iter()
            .map(|p| (p.date, p.cumulative_mass))
            .collect();
        assert_eq!(
            got,
            vec![
                (date(2024, 1, 1), 2.0),
                (date(2024, 1, 2), 5.0),
                (date(2024, 1, 3), 4.0),
            ]
        );
    }

    #[test]
    fn bad_date_aborts_with_row_index() {
        let rows = [
            RawRecord::new("2024-01-01", 1.0),
            RawRecord::new("not-a-date", 1.0),
            RawRecord::new("2024-01-03", 1.0),
        ];
        let err = compute_cumulative(&rows).unwrap_err();
        assert_eq!(
            err,
            AggregateError::DateParse {
                row: 1,
                value: "not-a-date".into()
            }
        );
        assert_eq!(err.to_string(), "row 1: cannot parse date 'not-a-date'");
    }

    #[test]
    fn non_numeric_mass_names_the_row() {
        let rows = [
            RawRecord::new("2024-01-01", 1.0),
            RawRecord::new("2024-01-02", 1.0),
            RawRecord {
                date: "2024-01-03".into(),
                mass: "heavy".into(),
                extra: Vec::new(),
            },
        ];
        assert_eq!(
            compute_cumulative(&rows).unwrap_err(),
            AggregateError::Value {
                row: 2,
                value: "heavy".into()
            }
        );
    }

    #[test]
    fn output_follows_input_order_not_chronology() {
        let rows = [
            RawRecord::new("2024-03-01", 1.0),
            RawRecord::new("2024-01-01", 2.0),
            RawRecord::new("2024-02-01", 3.0),
        ];
        let out = compute_cumulative(&rows).unwrap();
        let dates: Vec<NaiveDate> = out.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 1), date(2024, 1, 1), date(2024, 2, 1)]
        );
        assert_relative_eq!(out.total(), 6.0);
    }

    #[test]
    fn length_preserved_and_monotone_for_non_negative_masses() {
        let masses = [0.0, 1.5, 0.25, 0.0, 12.0, 3.75, 0.1, 8.0];
        let rows: Vec<RawRecord> = masses
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let d = date(2024, 1, 1) + chrono::Days::new(i as u64);
                RawRecord::new(d.format("%Y-%m-%d").to_string(), m)
            })
            .collect();
        let out = compute_cumulative(&rows).unwrap();
        assert_eq!(out.len(), rows.len());
        assert!(out
            .points
            .windows(2)
            .all(|w| w[0].cumulative_mass <= w[1].cumulative_mass));
        assert_relative_eq!(out.total(), masses.iter().sum::<f64>());
    }

    #[test]
    fn source_rows_are_untouched() {
        let rows = vec![RawRecord::new("2024-01-01", 1.0)];
        let before = rows.clone();
        let _ = compute_cumulative(&rows).unwrap();
        assert_eq!(rows, before);
    }
}
