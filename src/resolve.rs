//! Candidate-column resolution.
//!
//! Each semantic field is looked up once, against normalized headers, and
//! the result is frozen into a field map. Later stages read typed values
//! through the map and never inspect raw column names again.

use log::{debug, warn};

use crate::{config::FieldCandidates, data::title_case, frame::RawTable};

pub const UNKNOWN_AREA: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaSource {
    Column(usize),
    /// No area-like column; every row belongs to [`UNKNOWN_AREA`].
    Unknown,
}

impl AreaSource {
    pub fn resolve(table: &RawTable, candidates: &[String]) -> Self {
        if let Some(idx) = table.find_column(candidates) {
            return AreaSource::Column(idx);
        }
        match table.find_column_containing(&["area"]) {
            Some(idx) => {
                debug!("Using '{}' as area_name", table.headers[idx]);
                AreaSource::Column(idx)
            }
            None => {
                if !table.is_empty() {
                    warn!("No area-like column found; defaulting every row to '{UNKNOWN_AREA}'");
                }
                AreaSource::Unknown
            }
        }
    }

    pub fn value(&self, table: &RawTable, row: usize) -> String {
        match self {
            AreaSource::Column(idx) => clean_area_name(table.cell(row, *idx)),
            AreaSource::Unknown => UNKNOWN_AREA.to_string(),
        }
    }
}

/// Title-cased and trimmed. Blank cells fall back to [`UNKNOWN_AREA`].
pub fn clean_area_name(raw: &str) -> String {
    let cleaned = title_case(raw.trim());
    if cleaned.is_empty() {
        UNKNOWN_AREA.to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFieldMap {
    pub area: AreaSource,
    pub occurred_at: Option<usize>,
    pub reported_at: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub crime: Option<usize>,
    pub premise: Option<usize>,
    pub status: Option<usize>,
    pub victim_age: Option<usize>,
    pub victim_age_bin: Option<usize>,
}

impl DetailFieldMap {
    pub fn resolve(table: &RawTable, fields: &FieldCandidates) -> Self {
        let map = Self {
            area: AreaSource::resolve(table, &fields.area),
            occurred_at: table.find_column(&fields.occurred_at),
            reported_at: table.find_column(&fields.reported_at),
            latitude: table.find_column(&fields.latitude),
            longitude: table.find_column(&fields.longitude),
            crime: table.find_column(&fields.crime),
            premise: table.find_column(&fields.premise),
            status: table.find_column(&fields.status),
            victim_age: table.find_column(&fields.victim_age),
            victim_age_bin: table.find_column(&fields.victim_age_bin),
        };
        if !table.is_empty() && map.occurred_at.is_none() {
            warn!("Detail table has no occurrence timestamp; time fields will be empty");
        }
        debug!("Resolved detail fields: {map:?}");
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSource {
    Column(usize),
    /// Count detail rows per area; zero when the detail table is empty.
    FromDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSource {
    Column(usize),
    Date(usize),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFieldMap {
    pub area: AreaSource,
    pub year: YearSource,
    pub police_count: Option<usize>,
    pub total_crimes: TotalSource,
}

impl SummaryFieldMap {
    pub fn resolve(table: &RawTable, fields: &FieldCandidates) -> Self {
        let year = match table.find_column(&fields.year) {
            Some(idx) => YearSource::Column(idx),
            None => table
                .find_column(&fields.summary_date)
                .map_or(YearSource::Missing, YearSource::Date),
        };
        let police_count = table.find_column(&fields.police_count);
        if police_count.is_none() && !table.is_empty() {
            warn!("Aggregate table has no police count column; defaulting to 0");
        }
        let total_crimes = table
            .find_column(&fields.total_crimes)
            .or_else(|| table.find_column_containing(&["total", "crime"]))
            .map_or(TotalSource::FromDetail, TotalSource::Column);
        if total_crimes == TotalSource::FromDetail && !table.is_empty() {
            debug!("Aggregate table has no total crimes column; counting detail rows per area");
        }
        let map = Self {
            area: AreaSource::resolve(table, &fields.area),
            year,
            police_count,
            total_crimes,
        };
        debug!("Resolved summary fields: {map:?}");
        map
    }
}
