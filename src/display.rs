use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::RosterResult;
use crate::report::RosterReport;

pub const GRID_FILE: &str = "排班表.csv";
pub const STATS_FILE: &str = "人员统计.csv";
pub const WARNINGS_FILE: &str = "异常提示.csv";

fn write_table(path: &Path, rows: &[Vec<String>]) -> RosterResult<()> {
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the grid, stats and (if any) warning sheets as CSV files into
/// `dir`, returning the paths written.
pub fn write_report_csv(report: &RosterReport, dir: &Path) -> RosterResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let grid_path = dir.join(GRID_FILE);
    write_table(&grid_path, &report.grid_table())?;
    written.push(grid_path);

    let stats_path = dir.join(STATS_FILE);
    write_table(&stats_path, &report.stats_table())?;
    written.push(stats_path);

    let warnings_path = dir.join(WARNINGS_FILE);
    match report.warning_table() {
        Some(rows) => {
            write_table(&warnings_path, &rows)?;
            written.push(warnings_path);
        }
        // Drop a stale sheet from an earlier run.
        None if warnings_path.exists() => fs::remove_file(&warnings_path)?,
        None => {}
    }
    Ok(written)
}

pub fn write_report_json(report: &RosterReport, path: &Path) -> RosterResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

/// Prints the roster in a readable format
pub fn print_report(report: &RosterReport) {
    println!("\n=== Duty Roster ===");
    for row in &report.grid {
        println!("\n{} (need {}):", row.slot, row.required);
        for cell in &row.cells {
            let status = if cell.status.is_empty() { "[EMPTY]" } else { cell.status.as_str() };
            println!("  {} -> {}", cell.day, status);
        }
    }

    println!("\n=== People ===");
    for person in &report.people {
        let marker = if person.total >= 1 { "✅" } else { "❌" };
        println!(
            "{} {}: {} shift(s) over {} day(s) [{}]",
            marker,
            person.name,
            person.total,
            person.days_served,
            person.days.join(", ")
        );
    }

    if !report.warnings.is_empty() {
        println!("\n⚠️  Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}
