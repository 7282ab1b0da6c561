use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{DataSource, MassDataset, RawRecord};

// ---------------------------------------------------------------------------
// Source formats
// ---------------------------------------------------------------------------

/// Text layouts the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Column-aligned text: cells split by a TAB or 3+ whitespace chars.
    Aligned,
    /// Comma-separated with a header row.
    Csv,
    /// `[{ "Date / YYYY-MM-DD": "...", "Mass / kg": 1.2 }, ...]`
    Json,
}

impl TableFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tsv" | "txt" => Some(TableFormat::Aligned),
            "csv" => Some(TableFormat::Csv),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }

    /// Guess from the last path segment of a URL; aligned text by default.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| TableFormat::from_extension(ext))
            .unwrap_or(TableFormat::Aligned)
    }
}

/// Rows of one table plus the headers of the columns that are neither date
/// nor mass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl ParsedTable {
    fn into_dataset(self, source: DataSource) -> MassDataset {
        MassDataset::new(self.records, source).with_extra_columns(self.extra_columns)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a mass dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.tsv` / `.txt` – column-aligned table (the upstream `MassData.tsv`)
/// * `.csv`          – comma separated with a header row
/// * `.json`         – array of row objects
pub fn load_file(path: &Path) -> Result<MassDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let Some(format) = TableFormat::from_extension(ext) else {
        bail!("Unsupported file extension: .{ext}");
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let table = parse_text(&text, format)
        .with_context(|| format!("parsing {}", path.display()))?;

    Ok(table.into_dataset(DataSource::File(path.to_path_buf())))
}

/// Fetch a mass dataset over HTTP with a single blocking GET.
pub fn load_url(url: &str, timeout: Duration) -> Result<MassDataset> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")?;

    log::info!("Fetching {url}");
    let text = client
        .get(url)
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?
        .text()
        .with_context(|| format!("reading response body from {url}"))?;

    let table = parse_text(&text, TableFormat::from_url(url))
        .with_context(|| format!("parsing data from {url}"))?;

    Ok(table.into_dataset(DataSource::Url(url.to_string())))
}

/// Parse already-loaded text in the given format.
pub fn parse_text(text: &str, format: TableFormat) -> Result<ParsedTable> {
    match format {
        TableFormat::Aligned => parse_delimited(&normalize_aligned(text), b'\t'),
        TableFormat::Csv => parse_delimited(text, b','),
        TableFormat::Json => parse_json(text),
    }
}

// ---------------------------------------------------------------------------
// Delimited text (aligned / CSV)
// ---------------------------------------------------------------------------

/// Rewrite a column-aligned table as TAB-separated text.
///
/// A TAB or a run of three or more whitespace characters ends a cell;
/// shorter runs stay inside it (`Date / YYYY-MM-DD` is one header).
/// Leading blanks are kept so an empty first cell stays a column. Blank
/// lines are dropped.
pub fn normalize_aligned(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            continue;
        }
        let cells = split_aligned_line(line);
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

fn split_aligned_line(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut cell_start = 0;
    let mut gap_start: Option<usize> = None;
    let mut gap_len = 0;
    let mut gap_has_tab = false;

    for (i, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if gap_start.is_none() {
                gap_start = Some(i);
                gap_len = 0;
                gap_has_tab = false;
            }
            gap_len += 1;
            gap_has_tab |= ch == '\t';
        } else if let Some(start) = gap_start.take() {
            if gap_has_tab || gap_len >= 3 {
                cells.push(&line[cell_start..start]);
                cell_start = i;
            }
        }
    }
    // `line` is trimmed at the end, so it never ends inside a gap.
    cells.push(&line[cell_start..]);
    cells
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("reading headers")?.clone();
    let date_idx = column_index(&headers, &DATE_KEYS).context("missing date column")?;
    let mass_idx = column_index(&headers, &MASS_KEYS).context("missing mass column")?;
    let extra_idx: Vec<usize> = (0..headers.len())
        .filter(|&i| i != date_idx && i != mass_idx)
        .collect();

    let records = reader
        .records()
        .enumerate()
        .map(|(row_no, result)| -> Result<RawRecord> {
            let mut record = result.with_context(|| format!("row {row_no}"))?;
            // Rows that stop early leave their trailing cells empty.
            while record.len() < headers.len() {
                record.push_field("");
            }
            let mut raw: RawRecord = record
                .deserialize(Some(&headers))
                .with_context(|| format!("row {row_no}"))?;
            raw.extra = extra_idx.iter().map(|&i| record[i].to_string()).collect();
            Ok(raw)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedTable {
        extra_columns: extra_idx.iter().map(|&i| headers[i].to_string()).collect(),
        records,
    })
}

fn column_index(headers: &csv::StringRecord, keys: &[&str]) -> Option<usize> {
    headers.iter().position(|h| keys.contains(&h))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

const DATE_KEYS: [&str; 3] = ["Date / YYYY-MM-DD", "Date", "date"];
const MASS_KEYS: [&str; 3] = ["Mass / kg", "Mass", "mass"];

fn parse_json(text: &str) -> Result<ParsedTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let objects = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    // Extra columns in first-seen order across all rows.
    let mut extra_columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            let known = DATE_KEYS.contains(&key.as_str()) || MASS_KEYS.contains(&key.as_str());
            if !known && !extra_columns.contains(key) {
                extra_columns.push(key.clone());
            }
        }
    }

    let records = objects
        .iter()
        .enumerate()
        .map(|(i, obj)| -> Result<RawRecord> {
            let date = DATE_KEYS
                .iter()
                .find_map(|k| obj.get(*k))
                .with_context(|| format!("Row {i}: missing date field"))?;
            let mass = MASS_KEYS
                .iter()
                .find_map(|k| obj.get(*k))
                .with_context(|| format!("Row {i}: missing mass field"))?;
            Ok(RawRecord {
                date: json_cell_text(date),
                mass: json_cell_text(mass),
                extra: extra_columns
                    .iter()
                    .map(|c| obj.get(c).map(json_cell_text).unwrap_or_default())
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedTable {
        extra_columns,
        records,
    })
}

fn json_cell_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
