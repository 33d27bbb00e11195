//! Per-area summary table built from the aggregate source.
//!
//! Every row carries the same five fields whatever the source looked like:
//! area, optional year, total incidents, police count, and the
//! incidents-per-police ratio. Totals missing from the aggregate source are
//! backfilled by counting detail records per area.

use std::collections::HashMap;

use chrono::Datelike;
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::{
    config::FieldCandidates,
    data::{parse_count, parse_naive_datetime, parse_number},
    frame::RawTable,
    incident::IncidentTable,
    resolve::{SummaryFieldMap, TotalSource, YearSource},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub area_name: String,
    pub year: Option<i32>,
    pub total_crimes: u64,
    pub police_count: u64,
    /// `None` when there are no police to divide by.
    pub crimes_per_police: Option<f64>,
}

impl AreaSummary {
    pub fn new(area_name: String, year: Option<i32>, total_crimes: u64, police_count: u64) -> Self {
        Self {
            area_name,
            year,
            total_crimes,
            police_count,
            crimes_per_police: crimes_per_police(total_crimes, police_count),
        }
    }
}

pub fn crimes_per_police(total_crimes: u64, police_count: u64) -> Option<f64> {
    (police_count > 0).then(|| total_crimes as f64 / police_count as f64)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<AreaSummary>,
}

fn year_of(table: &RawTable, row: usize, source: YearSource) -> Option<i32> {
    match source {
        YearSource::Column(idx) => parse_number(table.cell(row, idx)).map(|y| y.trunc() as i32),
        YearSource::Date(idx) => {
            parse_naive_datetime(table.cell(row, idx)).map(|dt| dt.year())
        }
        YearSource::Missing => None,
    }
}

impl SummaryTable {
    /// `aggregate` must already have normalized headers.
    pub fn build(aggregate: &RawTable, detail: &IncidentTable, fields: &FieldCandidates) -> Self {
        if aggregate.is_empty() {
            debug!("Aggregate table is empty; summary has no rows");
            return Self::default();
        }
        let map = SummaryFieldMap::resolve(aggregate, fields);
        let detail_counts: HashMap<&str, usize> = match map.total_crimes {
            TotalSource::FromDetail => detail
                .records
                .iter()
                .map(|record| record.area_name.as_str())
                .counts(),
            TotalSource::Column(_) => HashMap::new(),
        };

        let mut rows: Vec<AreaSummary> = Vec::new();
        let mut positions: HashMap<(String, Option<i32>), usize> = HashMap::new();
        for row in 0..aggregate.row_count() {
            let area_name = map.area.value(aggregate, row);
            let year = year_of(aggregate, row, map.year);
            let total_crimes = match map.total_crimes {
                TotalSource::Column(idx) => parse_count(aggregate.cell(row, idx)),
                TotalSource::FromDetail => {
                    detail_counts.get(area_name.as_str()).copied().unwrap_or(0) as u64
                }
            };
            let police_count = map
                .police_count
                .map_or(0, |idx| parse_count(aggregate.cell(row, idx)));

            let key = (area_name.clone(), year);
            match positions.get(&key).copied() {
                Some(idx) => {
                    let existing = &mut rows[idx];
                    // Detail backfill already counts every incident of the area.
                    if matches!(map.total_crimes, TotalSource::Column(_)) {
                        existing.total_crimes = existing.total_crimes.saturating_add(total_crimes);
                    }
                    existing.police_count = existing.police_count.saturating_add(police_count);
                }
                None => {
                    positions.insert(key, rows.len());
                    rows.push(AreaSummary::new(area_name, year, total_crimes, police_count));
                }
            }
        }
        for row in &mut rows {
            row.crimes_per_police = crimes_per_police(row.total_crimes, row.police_count);
        }
        if rows.len() < aggregate.row_count() {
            debug!(
                "Merged {} aggregate row(s) into {} area/year row(s)",
                aggregate.row_count(),
                rows.len()
            );
        }
        info!("Built summary table with {} row(s)", rows.len());
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_crimes(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, row| acc.saturating_add(row.total_crimes))
    }

    /// First row for `area`, in source order.
    pub fn find(&self, area: &str) -> Option<&AreaSummary> {
        self.rows.iter().find(|row| row.area_name == area)
    }

    pub fn areas(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.area_name.clone())
            .sorted()
            .dedup()
            .collect()
    }
}
