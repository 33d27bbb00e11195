#![allow(dead_code)]

use std::{fs, path::PathBuf};

use tempfile::TempDir;

pub const DETAIL_CSV: &str = "\
DR_NO,Date Rptd,DATE-TIME OCC,AREA NAME,Crm,Vict Age,Premis,Status,LAT,LON
1,2024-01-02,2024-01-01 10:00:00,central,THEFT,30,STREET,IC,34.05,-118.25
2,2024-01-02,2024-01-01 10:45:00,CENTRAL,THEFT,40,STREET,AO,34.06,-118.24
3,2024-01-03,2024-01-02 22:10:00,Central,ARSON,,PARKING LOT,IC,,
4,2024-01-07,2024-01-06 03:00:00,newton,BURGLARY,51,DWELLING,IC,33.99,-118.26
5,2024-01-08,not a date,Newton,THEFT,abc,STREET,IC,oops,-118.27
";

pub const AGGREGATE_CSV: &str = "\
Area Name,Year OCC,Total Crimes,Police Count
Central,2024,100,10
Newton,2024,50,0
";

pub struct Fixture {
    pub dir: TempDir,
    pub detail: PathBuf,
    pub aggregate: PathBuf,
}

pub fn fixture_with(detail: &str, aggregate: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let detail_path = dir.path().join("detail.csv");
    let aggregate_path = dir.path().join("aggregate.csv");
    fs::write(&detail_path, detail).expect("write detail csv");
    fs::write(&aggregate_path, aggregate).expect("write aggregate csv");
    Fixture {
        dir,
        detail: detail_path,
        aggregate: aggregate_path,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(DETAIL_CSV, AGGREGATE_CSV)
}
