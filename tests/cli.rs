mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn dashboard() -> Command {
    Command::cargo_bin("crime-dashboard").expect("binary exists")
}

fn data_args(fixture: &common::Fixture) -> Vec<String> {
    vec![
        "-d".to_string(),
        fixture.detail.to_str().unwrap().to_string(),
        "-a".to_string(),
        fixture.aggregate.to_str().unwrap().to_string(),
    ]
}

#[test]
fn areas_lists_sorted_unique_names() {
    let fixture = common::fixture();
    dashboard()
        .arg("areas")
        .args(data_args(&fixture))
        .assert()
        .success()
        .stdout("Central\nNewton\n");
}

#[test]
fn summary_prints_ratio_table() {
    let fixture = common::fixture();
    dashboard()
        .arg("summary")
        .args(data_args(&fixture))
        .assert()
        .success()
        .stdout(contains("crimes_per_police"))
        .stdout(contains("10.00"));
}

#[test]
fn summary_exports_csv() {
    let fixture = common::fixture();
    let output = fixture.dir.path().join("summary.csv");
    dashboard()
        .arg("summary")
        .args(data_args(&fixture))
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();
    let contents = fs::read_to_string(&output).expect("read summary");
    assert_eq!(
        contents,
        "area_name,year_occ,total_crimes,police_count,crimes_per_police\n\
         Central,2024,100,10,10.00\n\
         Newton,2024,50,0,\n"
    );
}

#[test]
fn view_defaults_to_first_sorted_area() {
    let fixture = common::fixture();
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .assert()
        .success()
        .stdout(contains("Area:              Central"))
        .stdout(contains("Peak hour:         10.00"))
        .stdout(contains("Crimes per police: 10.00"));
}

#[test]
fn view_matches_area_case_insensitively() {
    let fixture = common::fixture();
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--area", "NEWTON", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"selected_area\": \"Newton\""))
        .stdout(contains("\"crimes_per_police\": null"));
}

#[test]
fn view_blank_area_means_all_areas() {
    let fixture = common::fixture();
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--area", "  "])
        .assert()
        .success()
        .stdout(contains("Area:              All areas"))
        .stdout(contains("Showing 5 of 5 record(s)"));
}

#[test]
fn view_unknown_area_shows_placeholders() {
    let fixture = common::fixture();
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--area", "Harbor"])
        .assert()
        .success()
        .stdout(contains("Top crime:         —"))
        .stdout(contains("No matching records"));
}

#[test]
fn view_respects_row_cap() {
    let fixture = common::fixture();
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--all", "--rows", "2"])
        .assert()
        .success()
        .stdout(contains("Showing 2 of 5 record(s)"));
}

#[test]
fn missing_inputs_degrade_to_empty_dashboard() {
    let dir = tempfile::tempdir().expect("temp dir");
    dashboard()
        .args([
            "view",
            "-d",
            dir.path().join("nope.csv").to_str().unwrap(),
            "-a",
            dir.path().join("nada.csv").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("No summary data"))
        .stdout(contains("No coordinate data"));
}

#[test]
fn invalid_config_is_fatal() {
    let fixture = common::fixture();
    let config = fixture.dir.path().join("dashboard.yaml");
    fs::write(&config, "top_crimes: 0\n").expect("write config");
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("top_crimes").and(contains("greater than zero")));
}

#[test]
fn config_overrides_candidates() {
    let fixture = common::fixture_with(
        "district,offense\nharbor,THEFT\nharbor,ROBBERY\nharbor,THEFT\n",
        "district,officers\nharbor,3\n",
    );
    let config = fixture.dir.path().join("dashboard.yaml");
    fs::write(
        &config,
        "fields:\n  area: [district]\n  crime: [offense]\n  police_count: [officers]\n",
    )
    .expect("write config");
    dashboard()
        .arg("view")
        .args(data_args(&fixture))
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Area:              Harbor"))
        .stdout(contains("Top crime:         THEFT"))
        .stdout(contains("Crimes per police: 1.00"));
}
