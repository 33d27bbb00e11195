//! Dashboard configuration.
//!
//! All knobs have defaults matching the public crime datasets the dashboard
//! was built around, so the YAML file is optional and may be partial. The
//! candidate lists are matched against *normalized* column names.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{0}' must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("candidate list '{0}' must name at least one column")]
    EmptyCandidates(&'static str),
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Ordered source-column candidates per semantic field. First present wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FieldCandidates {
    pub area: Vec<String>,
    pub occurred_at: Vec<String>,
    pub reported_at: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
    pub crime: Vec<String>,
    pub premise: Vec<String>,
    pub status: Vec<String>,
    pub victim_age: Vec<String>,
    pub victim_age_bin: Vec<String>,
    pub police_count: Vec<String>,
    pub total_crimes: Vec<String>,
    pub year: Vec<String>,
    pub summary_date: Vec<String>,
}

impl Default for FieldCandidates {
    fn default() -> Self {
        Self {
            area: strings(&["area_name"]),
            occurred_at: strings(&["date_time_occ"]),
            reported_at: strings(&["date_rptd", "date_rptd_time", "date_occ"]),
            latitude: strings(&["lat", "latitude"]),
            longitude: strings(&["lon", "longitude"]),
            crime: strings(&["crm"]),
            premise: strings(&["premis", "premis_desc", "location", "premise"]),
            status: strings(&["status"]),
            victim_age: strings(&["vict_age"]),
            victim_age_bin: strings(&["vict_age_bin"]),
            police_count: strings(&["police_count", "police", "count", "police_count_"]),
            total_crimes: strings(&["total_crimes"]),
            year: strings(&["year_occ", "year"]),
            summary_date: strings(&["date"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub fields: FieldCandidates,
    /// Point count at which the map switches to a density layer.
    pub density_threshold: usize,
    pub max_table_rows: usize,
    pub top_crimes: usize,
    pub top_premises: usize,
    pub age_bins: usize,
    pub table_columns: Vec<String>,
    /// Used when none of `table_columns` exist in the detail table.
    pub fallback_table_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            fields: FieldCandidates::default(),
            density_threshold: 200,
            max_table_rows: 200,
            top_crimes: 12,
            top_premises: 10,
            age_bins: 20,
            table_columns: strings(&[
                "date_rptd",
                "date_time_occ",
                "area_name",
                "rpt_dist_no",
                "part_1_2",
                "crm",
                "vict_age",
                "vict_sex",
                "vict_descent",
                "premis",
                "status",
                "location",
                "cross_street",
                "lat",
                "lon",
                "district",
                "vict_age_bin",
            ]),
            fallback_table_width: 8,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        let config: DashboardConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        config
            .validate()
            .with_context(|| format!("Validating config file {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("density_threshold", self.density_threshold),
            ("max_table_rows", self.max_table_rows),
            ("top_crimes", self.top_crimes),
            ("top_premises", self.top_premises),
            ("age_bins", self.age_bins),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroLimit(*name));
        }
        let required = [
            ("area", &self.fields.area),
            ("occurred_at", &self.fields.occurred_at),
            ("police_count", &self.fields.police_count),
            ("total_crimes", &self.fields.total_crimes),
        ];
        if let Some((name, _)) = required.iter().find(|(_, list)| list.is_empty()) {
            return Err(ConfigError::EmptyCandidates(*name));
        }
        Ok(())
    }
}
