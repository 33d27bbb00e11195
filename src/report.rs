//! Terminal and JSON renderings of the dashboard artifacts.

use std::{fmt::Write as _, path::Path};

use anyhow::{Context, Result};

use crate::{
    frequency::Ranked,
    io_utils,
    summary::SummaryTable,
    table::{Align, render_table, render_table_aligned},
    view::{AgeDistribution, MapLayer, PLACEHOLDER, ViewModel},
};

const SUMMARY_HEADERS: [&str; 5] = [
    "area_name",
    "year_occ",
    "total_crimes",
    "police_count",
    "crimes_per_police",
];

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn section(output: &mut String, title: &str) {
    let _ = writeln!(output, "\n== {title} ==");
}

pub fn summary_rows(summary: &SummaryTable) -> Vec<Vec<String>> {
    summary
        .rows
        .iter()
        .map(|row| {
            vec![
                row.area_name.clone(),
                row.year.map(|y| y.to_string()).unwrap_or_default(),
                row.total_crimes.to_string(),
                row.police_count.to_string(),
                row.crimes_per_police
                    .map(|r| format!("{r:.2}"))
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

pub fn render_summary(summary: &SummaryTable) -> String {
    render_table_aligned(
        &headers(&SUMMARY_HEADERS),
        &summary_rows(summary),
        &[Align::Left, Align::Right, Align::Right, Align::Right, Align::Right],
    )
}

pub fn write_summary_csv(summary: &SummaryTable, path: &Path) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(Some(path), io_utils::DEFAULT_CSV_DELIMITER)?;
    writer
        .write_record(SUMMARY_HEADERS)
        .with_context(|| format!("Writing header to {path:?}"))?;
    for row in summary_rows(summary) {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing summary row to {path:?}"))?;
    }
    writer.flush().with_context(|| format!("Flushing {path:?}"))?;
    Ok(())
}

fn ranked_rows(items: &[Ranked<String>]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| vec![item.value.clone(), item.count.to_string()])
        .collect()
}

fn push_ranked(output: &mut String, title: &str, label: &str, items: &[Ranked<String>]) {
    section(output, title);
    if items.is_empty() {
        let _ = writeln!(output, "No data");
        return;
    }
    output.push_str(&render_table_aligned(
        &headers(&[label, "count"]),
        &ranked_rows(items),
        &[Align::Left, Align::Right],
    ));
}

pub fn render_text(view: &ViewModel) -> String {
    let mut output = String::new();

    section(&mut output, "National overview");
    let national = &view.national;
    let _ = writeln!(output, "Total incidents:   {}", national.total_incidents);
    let _ = writeln!(
        output,
        "Top crime:         {}",
        national.top_crime.as_deref().unwrap_or(PLACEHOLDER)
    );
    let _ = writeln!(
        output,
        "Top area:          {}",
        national.top_area.as_deref().unwrap_or(PLACEHOLDER)
    );

    section(&mut output, "Area insight");
    let area = &view.area;
    let _ = writeln!(
        output,
        "Area:              {}",
        area.area.as_deref().unwrap_or("All areas")
    );
    let _ = writeln!(output, "Incidents:         {}", area.total_incidents);
    let _ = writeln!(output, "Top crime:         {}", area.top_crime_display());
    let _ = writeln!(output, "Peak day:          {}", area.peak_day_display());
    let _ = writeln!(output, "Peak hour:         {}", area.peak_hour_display());
    let _ = writeln!(output, "Avg victim age:    {}", area.average_age_display());
    let _ = writeln!(output, "Crimes per police: {}", area.ratio_display());

    section(&mut output, "Crimes vs police by area");
    if view.comparison.is_empty() {
        let _ = writeln!(output, "No summary data");
    } else {
        let rows = view
            .comparison
            .iter()
            .map(|bar| {
                vec![
                    if bar.selected { "*" } else { "" }.to_string(),
                    bar.area_name.clone(),
                    bar.year.map(|y| y.to_string()).unwrap_or_default(),
                    bar.total_crimes.to_string(),
                    bar.police_count.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        output.push_str(&render_table_aligned(
            &headers(&["", "area", "year", "total_crimes", "police_count"]),
            &rows,
            &[Align::Left, Align::Left, Align::Right, Align::Right, Align::Right],
        ));
    }

    section(&mut output, "Day x hour");
    if view.heatmap.total() == 0 {
        let _ = writeln!(output, "No day/hour information");
    } else {
        let mut heat_headers = vec!["day".to_string()];
        heat_headers.extend((0..24).map(|h| h.to_string()));
        let rows = view
            .heatmap
            .days
            .iter()
            .zip(view.heatmap.counts.iter())
            .map(|(day, counts)| {
                let mut row = vec![day[..3].to_string()];
                row.extend(counts.iter().map(|c| c.to_string()));
                row
            })
            .collect::<Vec<_>>();
        let mut aligns = vec![Align::Left];
        aligns.extend(std::iter::repeat_n(Align::Right, 24));
        output.push_str(&render_table_aligned(&heat_headers, &rows, &aligns));
    }

    section(&mut output, "Map");
    match &view.map {
        MapLayer::Empty => {
            let _ = writeln!(output, "No coordinate data");
        }
        MapLayer::Points { points } => {
            let _ = writeln!(output, "{} point(s)", points.len());
            let rows = points
                .iter()
                .map(|p| {
                    vec![
                        format!("{:.5}", p.lat),
                        format!("{:.5}", p.lon),
                        p.crime.clone().unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            output.push_str(&render_table(&headers(&["lat", "lon", "crime"]), &rows));
        }
        MapLayer::Density { center, points } => {
            let _ = writeln!(
                output,
                "Density layer: {} point(s) centred on ({:.5}, {:.5})",
                points.len(),
                center.0,
                center.1
            );
        }
    }

    push_ranked(&mut output, "Top crimes", "crime", &view.top_crimes);
    push_ranked(&mut output, "Top premises", "premise", &view.top_premises);

    section(&mut output, "Victim age");
    match &view.ages {
        AgeDistribution::Empty => {
            let _ = writeln!(output, "No victim age data");
        }
        AgeDistribution::Histogram { bins } => {
            let rows = bins
                .iter()
                .map(|bin| {
                    vec![
                        format!("{:.1}-{:.1}", bin.start, bin.end),
                        bin.count.to_string(),
                    ]
                })
                .collect::<Vec<_>>();
            output.push_str(&render_table_aligned(
                &headers(&["age", "count"]),
                &rows,
                &[Align::Left, Align::Right],
            ));
        }
        AgeDistribution::Groups { groups } => {
            output.push_str(&render_table_aligned(
                &headers(&["age group", "count"]),
                &ranked_rows(groups),
                &[Align::Left, Align::Right],
            ));
        }
    }

    section(&mut output, "Records");
    let records = &view.records;
    if records.rows.is_empty() {
        let _ = writeln!(output, "No matching records");
    } else {
        let _ = writeln!(
            output,
            "Showing {} of {} record(s)",
            records.rows.len(),
            records.total_matches
        );
        output.push_str(&render_table(&records.columns, &records.rows));
    }
    output
}

pub fn render_json(view: &ViewModel) -> Result<String> {
    serde_json::to_string_pretty(view).context("Serializing view model to JSON")
}
