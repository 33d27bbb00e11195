//! Untyped, string-backed tables as read from disk.
//!
//! A [`RawTable`] is the input to field resolution. Load failures are not
//! fatal for the dashboard: [`RawTable::load_or_empty`] logs the error and
//! hands back a zero-row table that every downstream stage accepts.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, error, info};

use crate::{data::normalize_column_name, io_utils};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Rows are padded or truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        let mut rows = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {}", idx + 2))?;
            rows.push(decoded);
        }
        Ok(Self::new(headers, rows))
    }

    pub fn load_or_empty(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Self {
        match Self::load(path, delimiter, encoding) {
            Ok(table) => {
                info!(
                    "Loaded {:?} -> {} row(s) x {} column(s)",
                    path,
                    table.row_count(),
                    table.headers.len()
                );
                table
            }
            Err(err) => {
                error!("Failed to load {path:?}: {err:#}");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Canonicalizes every header. Values are untouched.
    pub fn normalize_columns(mut self) -> Self {
        for header in &mut self.headers {
            let normalized = normalize_column_name(header);
            if normalized != *header {
                debug!("Renamed column '{header}' -> '{normalized}'");
                *header = normalized;
            }
        }
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First candidate that is present, by priority order of `candidates`.
    pub fn find_column(&self, candidates: &[String]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|candidate| self.column_index(candidate))
    }

    /// First column (in table order) whose name contains every fragment.
    pub fn find_column_containing(&self, fragments: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| fragments.iter().all(|fragment| h.contains(fragment)))
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}
