//! CSV loading for the daily stock dataset
//!
//! The file carries a header row followed by one row per trading day:
//! `Date, Open, High, Low, Close, [Adj Close,] Volume`. Two readers share one
//! row converter: a blocking reader built on `csv` and an async reader built
//! on `csv-async` over tokio.

use crate::errors::{DataError, Result};
use crate::types::StockRecord;
use chrono::{DateTime, NaiveDate};
use futures_util::StreamExt;
use std::io::Read;
use std::path::Path;

/// Column positions of the fields we read from each row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::with_volume_column(5)
    }
}

impl ColumnLayout {
    /// Fixed positional layout with volume at the given index
    pub fn with_volume_column(volume: usize) -> Self {
        Self {
            date: 0,
            open: 1,
            high: 2,
            low: 3,
            close: 4,
            volume,
        }
    }

    /// Resolve positions from header names, falling back to `self`.
    ///
    /// Names are matched case-insensitively. The fallback applies unless every
    /// one of the six names is present.
    pub fn resolve<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> ColumnLayout {
        let names: Vec<String> = headers
            .into_iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);

        match (
            find("date"),
            find("open"),
            find("high"),
            find("low"),
            find("close"),
            find("volume"),
        ) {
            (Some(date), Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                ColumnLayout {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }
            }
            _ => *self,
        }
    }

    /// Minimum number of fields a row needs under this layout
    pub fn min_fields(&self) -> usize {
        [self.date, self.open, self.high, self.low, self.close, self.volume]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Reader that turns the dataset file into [`StockRecord`]s
#[derive(Debug, Clone, Default)]
pub struct StockCsvReader {
    layout: ColumnLayout,
}

impl StockCsvReader {
    /// Reader with the default positional fallback (volume in column 5)
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader whose positional fallback puts volume at `volume_column`
    pub fn with_volume_column(volume_column: usize) -> Self {
        Self {
            layout: ColumnLayout::with_volume_column(volume_column),
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    /// Read every usable record from `path`, in file order
    pub fn read_records<P: AsRef<Path>>(&self, path: P) -> Result<Vec<StockRecord>> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        self.read_from(std::io::BufReader::new(file), path)
    }

    /// Read records from any reader; `origin` names the source in errors and logs
    pub fn read_from<R: Read>(&self, reader: R, origin: &Path) -> Result<Vec<StockRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut converter = RowConverter::new(self.layout, headers.iter())?;

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            let fields: Vec<&str> = row.iter().collect();
            if let Some(record) = converter.convert(line, &fields)? {
                records.push(record);
            }
        }

        converter.finish(records, origin)
    }

    /// Async variant of [`read_records`](Self::read_records) over tokio file I/O
    pub async fn read_records_async<P: AsRef<Path>>(&self, path: P) -> Result<Vec<StockRecord>> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let mut csv_reader = csv_async::AsyncReaderBuilder::new()
            .has_headers(true)
            .trim(csv_async::Trim::All)
            .flexible(true)
            .create_reader(file);

        let headers: Vec<String> = csv_reader
            .headers()
            .await?
            .iter()
            .map(str::to_owned)
            .collect();
        let mut converter = RowConverter::new(self.layout, headers.iter().map(String::as_str))?;

        let mut records = Vec::new();
        let mut rows = csv_reader.records();
        while let Some(row) = rows.next().await {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            let fields: Vec<&str> = row.iter().collect();
            if let Some(record) = converter.convert(line, &fields)? {
                records.push(record);
            }
        }

        converter.finish(records, path)
    }
}

/// Per-file conversion state shared by the sync and async readers.
///
/// Both readers run in flexible mode so field-count checks happen here, with
/// the row's own line number.
struct RowConverter {
    layout: ColumnLayout,
    header_len: usize,
    excluded: u64,
}

impl RowConverter {
    fn new<'a>(fallback: ColumnLayout, headers: impl Iterator<Item = &'a str>) -> Result<Self> {
        let headers: Vec<&str> = headers.collect();
        let layout = fallback.resolve(headers.iter().copied());

        // An empty header means an empty file; `finish` reports it.
        if !headers.is_empty() && headers.len() < layout.min_fields() {
            return Err(DataError::Parse {
                line: 1,
                message: format!(
                    "header has {} columns, expected at least {}",
                    headers.len(),
                    layout.min_fields()
                ),
            });
        }

        Ok(Self {
            layout,
            header_len: headers.len(),
            excluded: 0,
        })
    }

    /// Convert one row. `Ok(None)` means the row was excluded for a bad number.
    fn convert(&mut self, line: u64, fields: &[&str]) -> Result<Option<StockRecord>> {
        if fields.len() != self.header_len || fields.len() < self.layout.min_fields() {
            return Err(DataError::Parse {
                line,
                message: format!(
                    "found {} fields, header has {}",
                    fields.len(),
                    self.header_len
                ),
            });
        }

        let raw_date = fields[self.layout.date];
        let date = parse_date(raw_date).ok_or_else(|| DataError::Parse {
            line,
            message: format!("invalid date {:?}", raw_date),
        })?;

        let record = (|| {
            Some(StockRecord {
                date,
                open: parse_price(fields[self.layout.open])?,
                high: parse_price(fields[self.layout.high])?,
                low: parse_price(fields[self.layout.low])?,
                close: parse_price(fields[self.layout.close])?,
                volume: parse_volume(fields[self.layout.volume])?,
            })
        })();

        if record.is_none() {
            self.excluded += 1;
            tracing::debug!(line, "excluding row with non-numeric field");
        }
        Ok(record)
    }

    fn finish(self, records: Vec<StockRecord>, origin: &Path) -> Result<Vec<StockRecord>> {
        if self.excluded > 0 {
            tracing::warn!(
                excluded = self.excluded,
                kept = records.len(),
                path = %origin.display(),
                "rows excluded during load"
            );
        }
        if records.is_empty() {
            return Err(DataError::Empty {
                path: origin.to_path_buf(),
            });
        }
        Ok(records)
    }
}

/// Parse a calendar date in ISO (`2024-01-31`), US (`01/31/2024`) or RFC 3339 form
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Finite, strictly positive decimal
fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

/// Non-negative integer; whole-number decimals such as `1200.0` are accepted and
/// fractional parts truncate
fn parse_volume(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && *v < u64::MAX as f64)
            .map(|v| v.trunc() as u64)
    })
}
