//! The dashboard view as a pure function of the selected area.
//!
//! [`render`] reads the incident and summary tables and produces every
//! display artifact at once. It holds no state between calls and never
//! mutates its inputs; a selection that matches nothing yields placeholder
//! artifacts rather than an error.

use serde::Serialize;

use crate::{
    config::DashboardConfig,
    frequency::{FrequencyCounter, Ranked},
    incident::{DAY_NAMES, Incident, IncidentTable},
    summary::SummaryTable,
};

pub const PLACEHOLDER: &str = "—";
pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub selected_area: Option<String>,
    pub national: NationalInsight,
    pub area: AreaInsight,
    pub comparison: Vec<ComparisonBar>,
    pub heatmap: Heatmap,
    pub map: MapLayer,
    pub top_crimes: Vec<Ranked<String>>,
    pub top_premises: Vec<Ranked<String>>,
    pub ages: AgeDistribution,
    pub records: RecordTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationalInsight {
    pub total_incidents: usize,
    pub top_crime: Option<String>,
    pub top_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaInsight {
    pub area: Option<String>,
    pub total_incidents: usize,
    pub top_crime: Option<String>,
    pub peak_day: Option<String>,
    pub peak_hour: Option<u32>,
    pub average_age: Option<i64>,
    pub crimes_per_police: Option<f64>,
}

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

impl AreaInsight {
    pub fn top_crime_display(&self) -> String {
        or_placeholder(self.top_crime.as_deref())
    }

    pub fn peak_day_display(&self) -> String {
        or_placeholder(self.peak_day.as_deref())
    }

    pub fn peak_hour_display(&self) -> String {
        or_placeholder(self.peak_hour.map(|h| format!("{h}.00")))
    }

    pub fn average_age_display(&self) -> String {
        or_placeholder(self.average_age)
    }

    pub fn ratio_display(&self) -> String {
        or_placeholder(self.crimes_per_police.map(|r| format!("{r:.2}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
    pub area_name: String,
    pub year: Option<i32>,
    pub total_crimes: u64,
    pub police_count: u64,
    pub selected: bool,
}

/// Occurrence counts by weekday (Monday first) and hour. Always 7x24.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: [&'static str; DAYS_PER_WEEK],
    pub counts: [[u64; HOURS_PER_DAY]; DAYS_PER_WEEK],
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            days: DAY_NAMES,
            counts: [[0; HOURS_PER_DAY]; DAYS_PER_WEEK],
        }
    }
}

impl Heatmap {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Incident>) -> Self {
        let mut heatmap = Self::default();
        for time in records.into_iter().filter_map(|record| record.time) {
            heatmap.counts[time.day_of_week as usize][time.hour as usize] += 1;
        }
        heatmap
    }

    pub fn cell(&self, day_of_week: usize, hour: usize) -> u64 {
        self.counts[day_of_week][hour]
    }

    pub fn cell_count(&self) -> usize {
        self.counts.iter().map(|row| row.len()).sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub crime: Option<String>,
    pub victim_age: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapLayer {
    Empty,
    Points { points: Vec<GeoPoint> },
    Density { center: (f64, f64), points: Vec<GeoPoint> },
}

impl MapLayer {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Incident>, density_threshold: usize) -> Self {
        let points = records
            .into_iter()
            .filter_map(|record| {
                record.coordinates().map(|(lat, lon)| GeoPoint {
                    lat,
                    lon,
                    crime: record.crime.clone(),
                    victim_age: record.victim_age,
                    status: record.status.clone(),
                })
            })
            .collect::<Vec<_>>();
        if points.is_empty() {
            return MapLayer::Empty;
        }
        if points.len() < density_threshold {
            return MapLayer::Points { points };
        }
        let n = points.len() as f64;
        let center = (
            points.iter().map(|p| p.lat).sum::<f64>() / n,
            points.iter().map(|p| p.lon).sum::<f64>() / n,
        );
        MapLayer::Density { center, points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        match self {
            MapLayer::Empty => &[],
            MapLayer::Points { points } | MapLayer::Density { points, .. } => points.as_slice(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeDistribution {
    Empty,
    Histogram { bins: Vec<AgeBin> },
    Groups { groups: Vec<Ranked<String>> },
}

impl AgeDistribution {
    /// Raw ages win over pre-binned age groups.
    pub fn from_records(records: &[&Incident], bins: usize) -> Self {
        let ages = records.iter().filter_map(|r| r.victim_age).collect::<Vec<_>>();
        if !ages.is_empty() {
            return AgeDistribution::Histogram {
                bins: histogram(&ages, bins.max(1)),
            };
        }
        let groups = records
            .iter()
            .filter_map(|r| r.victim_age_bin.clone())
            .collect::<FrequencyCounter<_>>();
        if groups.is_empty() {
            AgeDistribution::Empty
        } else {
            AgeDistribution::Groups {
                groups: groups.ranked(),
            }
        }
    }
}

fn histogram(values: &[f64], bins: usize) -> Vec<AgeBin> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![AgeBin {
            start: min,
            end: min + 1.0,
            count: values.len(),
        }];
    }
    let width = (max - min) / bins as f64;
    let mut output = (0..bins)
        .map(|i| AgeBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect::<Vec<_>>();
    for value in values {
        let idx = (((value - min) / width).floor() as usize).min(bins - 1);
        output[idx].count += 1;
    }
    output
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Matching records before the row cap.
    pub total_matches: usize,
}

/// Preferred columns that exist, else the first few columns of the table.
pub fn display_columns(incidents: &IncidentTable, config: &DashboardConfig) -> Vec<usize> {
    let preferred = config
        .table_columns
        .iter()
        .filter_map(|name| incidents.columns.iter().position(|c| c == name))
        .collect::<Vec<_>>();
    if !preferred.is_empty() || incidents.is_empty() {
        return preferred;
    }
    (0..incidents.columns.len().min(config.fallback_table_width)).collect()
}

impl RecordTable {
    fn from_records(records: &[&Incident], incidents: &IncidentTable, config: &DashboardConfig) -> Self {
        let indices = display_columns(incidents, config);
        let columns = indices
            .iter()
            .map(|&idx| incidents.columns[idx].clone())
            .collect();
        let rows = records
            .iter()
            .take(config.max_table_rows)
            .map(|record| {
                indices
                    .iter()
                    .map(|&idx| record.raw.get(idx).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self {
            columns,
            rows,
            total_matches: records.len(),
        }
    }
}

fn national_insight(incidents: &IncidentTable, summary: &SummaryTable) -> NationalInsight {
    let top_crime = incidents
        .records
        .iter()
        .filter_map(|r| r.crime.clone())
        .collect::<FrequencyCounter<_>>()
        .mode();
    let top_area = if summary.total_crimes() > 0 {
        summary
            .rows
            .iter()
            .max_by(|a, b| {
                a.total_crimes
                    .cmp(&b.total_crimes)
                    .then_with(|| b.area_name.cmp(&a.area_name))
            })
            .map(|row| row.area_name.clone())
    } else {
        incidents
            .records
            .iter()
            .map(|r| r.area_name.clone())
            .collect::<FrequencyCounter<_>>()
            .mode()
    };
    NationalInsight {
        total_incidents: incidents.len(),
        top_crime,
        top_area,
    }
}

fn area_insight(area: Option<&str>, records: &[&Incident], summary: &SummaryTable) -> AreaInsight {
    let top_crime = records
        .iter()
        .filter_map(|r| r.crime.clone())
        .collect::<FrequencyCounter<_>>()
        .mode();
    let peak_day = records
        .iter()
        .filter_map(|r| r.time.map(|t| t.day_name()))
        .collect::<FrequencyCounter<_>>()
        .mode()
        .map(str::to_string);
    let peak_hour = records
        .iter()
        .filter_map(|r| r.time.map(|t| t.hour))
        .collect::<FrequencyCounter<_>>()
        .mode();
    let ages = records.iter().filter_map(|r| r.victim_age).collect::<Vec<_>>();
    let average_age = (!ages.is_empty())
        .then(|| (ages.iter().sum::<f64>() / ages.len() as f64).round_ties_even() as i64);
    let crimes_per_police = area
        .and_then(|a| summary.find(a))
        .and_then(|row| row.crimes_per_police);
    AreaInsight {
        area: area.map(str::to_string),
        total_incidents: records.len(),
        top_crime,
        peak_day,
        peak_hour,
        average_age,
        crimes_per_police,
    }
}

fn comparison(area: Option<&str>, summary: &SummaryTable) -> Vec<ComparisonBar> {
    let mut bars = summary
        .rows
        .iter()
        .map(|row| ComparisonBar {
            area_name: row.area_name.clone(),
            year: row.year,
            total_crimes: row.total_crimes,
            police_count: row.police_count,
            selected: area == Some(row.area_name.as_str()),
        })
        .collect::<Vec<_>>();
    bars.sort_by(|a, b| {
        b.total_crimes
            .cmp(&a.total_crimes)
            .then_with(|| a.area_name.cmp(&b.area_name))
    });
    bars
}

fn ranked_text<'a, F>(records: &[&'a Incident], field: F, top: usize) -> Vec<Ranked<String>>
where
    F: Fn(&'a Incident) -> Option<&'a String>,
{
    records
        .iter()
        .filter_map(|r| field(*r).cloned())
        .collect::<FrequencyCounter<_>>()
        .top(top)
}

/// Builds every artifact for `selection`. `None` or an empty string means no filter.
pub fn render(
    selection: Option<&str>,
    incidents: &IncidentTable,
    summary: &SummaryTable,
    config: &DashboardConfig,
) -> ViewModel {
    let area = selection.filter(|a| !a.is_empty());
    let records = incidents.for_area(area).collect::<Vec<_>>();

    ViewModel {
        selected_area: area.map(str::to_string),
        national: national_insight(incidents, summary),
        area: area_insight(area, &records, summary),
        comparison: comparison(area, summary),
        heatmap: Heatmap::from_records(records.iter().copied()),
        map: MapLayer::from_records(records.iter().copied(), config.density_threshold),
        top_crimes: ranked_text(&records, |r| r.crime.as_ref(), config.top_crimes),
        top_premises: ranked_text(&records, |r| r.premise.as_ref(), config.top_premises),
        ages: AgeDistribution::from_records(&records, config.age_bins),
        records: RecordTable::from_records(&records, incidents, config),
    }
}
