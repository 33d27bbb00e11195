//! Incident-level detail records with derived time fields.

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::debug;
use serde::Serialize;

use crate::{
    config::FieldCandidates,
    data::{parse_naive_datetime, parse_number},
    frame::RawTable,
    resolve::{AreaSource, DetailFieldMap},
};

pub const AREA_COLUMN: &str = "area_name";

/// Format of parsed timestamps in the record table.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Time fields derived from an occurrence timestamp. They exist together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccurrenceTime {
    pub hour: u32,
    /// Monday = 0.
    pub day_of_week: u32,
    pub year: i32,
}

impl OccurrenceTime {
    pub fn from_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self {
            hour: timestamp.hour(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            year: timestamp.year(),
        }
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.day_of_week as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub area_name: String,
    pub crime: Option<String>,
    pub premise: Option<String>,
    pub status: Option<String>,
    pub victim_age: Option<f64>,
    pub victim_age_bin: Option<String>,
    pub occurred_at: Option<NaiveDateTime>,
    pub reported_at: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time: Option<OccurrenceTime>,
    /// Normalized source row, aligned with [`IncidentTable::columns`].
    pub raw: Vec<String>,
}

impl Incident {
    /// Recomputes [`Incident::time`] from the occurrence timestamp.
    pub fn derive_time_fields(&mut self) {
        self.time = self.occurred_at.as_ref().map(OccurrenceTime::from_timestamp);
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentTable {
    pub columns: Vec<String>,
    pub records: Vec<Incident>,
}

fn text(table: &RawTable, row: usize, column: Option<usize>) -> Option<String> {
    column
        .map(|idx| table.cell(row, idx).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number(table: &RawTable, row: usize, column: Option<usize>) -> Option<f64> {
    column.and_then(|idx| parse_number(table.cell(row, idx)))
}

fn timestamp(table: &RawTable, row: usize, column: Option<usize>) -> Option<NaiveDateTime> {
    column.and_then(|idx| parse_naive_datetime(table.cell(row, idx)))
}

impl IncidentTable {
    /// Builds typed records from a table whose headers are already normalized.
    pub fn from_raw(table: &RawTable, fields: &FieldCandidates) -> Self {
        if table.is_empty() {
            return Self::default();
        }
        let map = DetailFieldMap::resolve(table, fields);
        let mut columns = table.headers.clone();
        let area_slot = match table.column_index(AREA_COLUMN) {
            Some(idx) => idx,
            None => {
                columns.push(AREA_COLUMN.to_string());
                columns.len() - 1
            }
        };

        let mut unparsed_timestamps = 0usize;
        let records = (0..table.row_count())
            .map(|row| {
                let area_name = map.area.value(table, row);
                let mut raw = table.rows[row].clone();
                raw.resize(columns.len(), String::new());
                raw[area_slot] = area_name.clone();

                let occurred_at = timestamp(table, row, map.occurred_at);
                if occurred_at.is_none()
                    && map
                        .occurred_at
                        .is_some_and(|idx| !table.cell(row, idx).trim().is_empty())
                {
                    unparsed_timestamps += 1;
                }
                let mut incident = Incident {
                    area_name,
                    crime: text(table, row, map.crime),
                    premise: text(table, row, map.premise),
                    status: text(table, row, map.status),
                    victim_age: number(table, row, map.victim_age),
                    victim_age_bin: text(table, row, map.victim_age_bin),
                    occurred_at,
                    reported_at: timestamp(table, row, map.reported_at),
                    latitude: number(table, row, map.latitude),
                    longitude: number(table, row, map.longitude),
                    time: None,
                    raw,
                };
                incident.derive_time_fields();
                for (slot, value) in [
                    (map.occurred_at, incident.occurred_at),
                    (map.reported_at, incident.reported_at),
                ] {
                    if let (Some(idx), Some(value)) = (slot, value) {
                        incident.raw[idx] = value.format(TIMESTAMP_DISPLAY_FORMAT).to_string();
                    }
                }
                incident
            })
            .collect::<Vec<_>>();

        if unparsed_timestamps > 0 {
            debug!("{unparsed_timestamps} occurrence timestamp(s) could not be parsed");
        }
        if map.area == AreaSource::Unknown {
            debug!("Detail area_name synthesized for {} row(s)", records.len());
        }
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn for_area<'a>(&'a self, area: Option<&'a str>) -> impl Iterator<Item = &'a Incident> + 'a {
        let area = area.filter(|a| !a.is_empty());
        self.records
            .iter()
            .filter(move |record| area.is_none_or(|a| record.area_name == a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn derives_time_fields_from_occurrence() {
        let table = raw(
            &["area_name", "date_time_occ", "crm"],
            &[&["central", "2024-01-07 23:15:00", "THEFT"]],
        );
        let incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        let time = incidents.records[0].time.unwrap();
        assert_eq!(time.hour, 23);
        assert_eq!(time.day_of_week, 6);
        assert_eq!(time.day_name(), "Sunday");
        assert_eq!(time.year, 2024);
    }

    #[test]
    fn bad_timestamps_blank_time_fields_but_keep_row() {
        let table = raw(
            &["area_name", "date_time_occ", "lat", "lon"],
            &[&["Central", "yesterday", "34.05", "north"]],
        );
        let incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        assert_eq!(incidents.len(), 1);
        let record = &incidents.records[0];
        assert!(record.occurred_at.is_none());
        assert!(record.time.is_none());
        assert_eq!(record.latitude, Some(34.05));
        assert_eq!(record.longitude, None);
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn parsed_timestamps_are_shown_in_one_format() {
        let table = raw(
            &["date_rptd", "date_time_occ", "crm"],
            &[
                &["01/02/2024 12:00:00 AM", "2024-01-01T10:15", "THEFT"],
                &["unknown", "", "ARSON"],
            ],
        );
        let incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        let first = &incidents.records[0];
        assert_eq!(
            first.reported_at,
            NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(first.raw[0], "2024-01-02 00:00:00");
        assert_eq!(first.raw[1], "2024-01-01 10:15:00");
        let second = &incidents.records[1];
        assert_eq!(second.reported_at, None);
        assert_eq!(second.raw[0], "unknown");
        assert_eq!(second.raw[1], "");
    }

    #[test]
    fn derive_time_fields_is_idempotent() {
        let table = raw(&["date_time_occ"], &[&["2023-05-01T08:00:00"]]);
        let mut incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        let first = incidents.records[0].clone();
        incidents.records[0].derive_time_fields();
        assert_eq!(incidents.records[0], first);
        assert_eq!(
            first.occurred_at.unwrap().date(),
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
    }

    #[test]
    fn synthesizes_area_column_when_absent() {
        let table = raw(&["crm"], &[&["THEFT"], &["ARSON"]]);
        let incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        assert_eq!(incidents.columns, vec!["crm", "area_name"]);
        assert!(incidents.records.iter().all(|r| r.area_name == "Unknown"));
        assert_eq!(incidents.records[1].raw, vec!["ARSON", "Unknown"]);
    }

    #[test]
    fn raw_area_cell_holds_cleaned_name() {
        let table = raw(&["area_name", "crm"], &[&[" NEWTON ", "THEFT"]]);
        let incidents = IncidentTable::from_raw(&table, &FieldCandidates::default());
        assert_eq!(incidents.records[0].raw[0], "Newton");
        assert_eq!(incidents.for_area(Some("Newton")).count(), 1);
        assert_eq!(incidents.for_area(Some("Central")).count(), 0);
        assert_eq!(incidents.for_area(None).count(), 1);
        assert_eq!(incidents.for_area(Some("")).count(), 1);
    }

    #[test]
    fn empty_table_builds_no_records() {
        let incidents = IncidentTable::from_raw(&RawTable::default(), &FieldCandidates::default());
        assert!(incidents.is_empty());
        assert!(incidents.columns.is_empty());
    }
}
