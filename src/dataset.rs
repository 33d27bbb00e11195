//! The two immutable tables the dashboard renders from.

use std::path::Path;

use encoding_rs::Encoding;
use itertools::Itertools;
use log::info;

use crate::{
    config::FieldCandidates, frame::RawTable, incident::IncidentTable, io_utils,
    summary::SummaryTable,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub incidents: IncidentTable,
    pub summary: SummaryTable,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Dataset {
    /// Never fails: an unreadable file is logged and treated as an empty table.
    pub fn load(detail: &Path, aggregate: &Path, options: LoadOptions, fields: &FieldCandidates) -> Self {
        let detail_raw = RawTable::load_or_empty(
            detail,
            io_utils::resolve_input_delimiter(detail, options.delimiter),
            options.encoding,
        );
        let aggregate_raw = RawTable::load_or_empty(
            aggregate,
            io_utils::resolve_input_delimiter(aggregate, options.delimiter),
            options.encoding,
        );
        Self::from_raw(detail_raw, aggregate_raw, fields)
    }

    pub fn from_raw(detail: RawTable, aggregate: RawTable, fields: &FieldCandidates) -> Self {
        let incidents = IncidentTable::from_raw(&detail.normalize_columns(), fields);
        let summary = SummaryTable::build(&aggregate.normalize_columns(), &incidents, fields);
        info!(
            "Dataset ready: {} incident(s), {} summary row(s)",
            incidents.len(),
            summary.len()
        );
        Self { incidents, summary }
    }

    /// Sorted selectable areas: the summary's if it has any, else the detail table's.
    pub fn areas(&self) -> Vec<String> {
        if !self.summary.is_empty() {
            return self.summary.areas();
        }
        self.incidents
            .records
            .iter()
            .map(|record| record.area_name.clone())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn default_area(&self) -> Option<String> {
        self.areas().into_iter().next()
    }
}
