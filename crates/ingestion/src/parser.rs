//! CSV record parsing with per-column type coercion.
//!
//! The header row is classified once into [`ColumnKind`]s. Each data row is
//! then decoded into a typed [`RegionRow`]:
//!
//! - `RegionName`: trimmed and left-padded with `0` to five characters
//! - date columns (`YYYY-MM` or `YYYY-MM-DD`): empty is null, numeric is a
//!   number, anything else is kept as text
//! - everything else: metadata, kept only for the columns
//!   [`RegionMetadata`] knows about

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use zhvi_common::{CellValue, RegionKey, RegionMetadata};

use crate::error::{IngestionError, Result};

/// Column holding the ZIP code.
pub const REGION_COLUMN: &str = "RegionName";

static DATE_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}(-\d{2})?$").expect("valid date column pattern"));

/// True if a header names a date column.
pub fn is_date_column(name: &str) -> bool {
    DATE_COLUMN.is_match(name)
}

/// Coerce a raw date-column cell.
///
/// Returns `None` for an empty cell.
pub fn coerce_date_cell(raw: &str) -> Option<CellValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(CellValue::Number(v)),
        _ => Some(CellValue::Text(raw.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Region,
    Date(String),
    Metadata(String),
}

impl ColumnKind {
    pub fn classify(name: &str) -> Self {
        if name == REGION_COLUMN {
            ColumnKind::Region
        } else if is_date_column(name) {
            ColumnKind::Date(name.to_string())
        } else {
            ColumnKind::Metadata(name.to_string())
        }
    }
}

/// One decoded data row.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    /// Padded region name, `None` if the cell was empty.
    pub region: Option<String>,
    pub metadata: RegionMetadata,
    /// Date cells in column order; `None` marks an empty cell.
    pub points: Vec<(String, Option<CellValue>)>,
}

/// Column layout derived from the header row.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    columns: Vec<ColumnKind>,
}

impl HeaderLayout {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let columns: Vec<ColumnKind> = headers.iter().map(ColumnKind::classify).collect();
        if !columns.contains(&ColumnKind::Region) {
            return Err(IngestionError::InvalidHeader(format!(
                "missing {} column",
                REGION_COLUMN
            )));
        }
        Ok(Self { columns })
    }

    pub fn date_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| matches!(c, ColumnKind::Date(_)))
            .count()
    }

    pub fn columns(&self) -> &[ColumnKind] {
        &self.columns
    }

    pub fn decode(&self, record: &StringRecord) -> RegionRow {
        let mut row = RegionRow {
            region: None,
            metadata: RegionMetadata::default(),
            points: Vec::with_capacity(self.date_columns()),
        };

        for (kind, field) in self.columns.iter().zip(record.iter()) {
            match kind {
                ColumnKind::Region => {
                    let field = field.trim();
                    if !field.is_empty() {
                        row.region = Some(RegionKey::pad(field));
                    }
                }
                ColumnKind::Date(date) => {
                    row.points.push((date.clone(), coerce_date_cell(field)));
                }
                ColumnKind::Metadata(name) => row.metadata.set(name, field.trim()),
            }
        }

        row
    }
}

/// Lazily decodes rows from a CSV byte source.
///
/// Every field is trimmed, and lines that are empty or whitespace-only are
/// skipped. A row whose field count differs from the header, or with invalid
/// UTF-8, yields an [`IngestionError::Parse`] and iteration carries on with
/// the next row. An I/O error from the underlying reader ends iteration.
pub struct RecordParser<R: Read> {
    reader: csv::Reader<R>,
    layout: HeaderLayout,
    record: StringRecord,
    source: String,
    done: bool,
}

impl<R: Read> RecordParser<R> {
    /// Read the header row from `reader`. `source` labels errors.
    pub fn new(reader: R, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| match IngestionError::from_csv(e, &source) {
                IngestionError::Parse { message, .. } => IngestionError::InvalidHeader(message),
                other => other,
            })?
            .clone();
        let layout = HeaderLayout::from_headers(&headers)?;

        Ok(Self {
            reader,
            layout,
            record: StringRecord::new(),
            source,
            done: false,
        })
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }
}

impl<R: Read> Iterator for RecordParser<R> {
    type Item = Result<RegionRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) if is_blank(&self.record) => continue,
                Ok(true) => {
                    return Some(self.check_width().map(|()| self.layout.decode(&self.record)));
                }
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    let err = IngestionError::from_csv(e, &self.source);
                    if err.is_fatal() {
                        self.done = true;
                    }
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<R: Read> RecordParser<R> {
    fn check_width(&self) -> Result<()> {
        let expected = self.layout.columns().len();
        if self.record.len() == expected {
            return Ok(());
        }
        Err(IngestionError::Parse {
            line: self.record.position().map(|p| p.line()),
            message: format!(
                "found record with {} fields, but the header has {} fields",
                self.record.len(),
                expected
            ),
        })
    }
}

/// Whitespace-only lines come back from the reader as a record of empty fields.
fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}
