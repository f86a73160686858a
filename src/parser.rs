use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

use crate::config::RosterConfig;
use crate::error::{RosterError, RosterResult};
use crate::schedule::Availability;

/// Removes annotations in full-width or ASCII parentheses, e.g. "张三（请假）".
/// Text after an unclosed parenthesis is kept as written.
fn strip_annotations(cell: &str) -> String {
    let mut cleaned = String::with_capacity(cell.len());
    let mut pending = String::new();
    let mut depth = 0usize;
    for ch in cell.chars() {
        match ch {
            '（' | '(' => {
                depth += 1;
                pending.push(ch);
            }
            '）' | ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    pending.clear();
                } else {
                    pending.push(ch);
                }
            }
            _ if depth > 0 => pending.push(ch),
            _ => cleaned.push(ch),
        }
    }
    cleaned.push_str(&pending);
    cleaned
}

/// Splits a cell of comma-separated names (ASCII or full-width commas).
/// Names are trimmed, empty entries dropped, duplicates dropped keeping the
/// first occurrence.
pub fn split_names(cell: &str) -> Vec<String> {
    let cleaned = strip_annotations(cell);
    let mut names: Vec<String> = Vec::new();
    for part in cleaned.split([',', '，']) {
        let name = part.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn header_position(headers: &StringRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
}

/// Reads an availability table: one row per slot, one column per day.
pub fn read_availability<R: Read>(reader: R, config: &RosterConfig) -> RosterResult<Availability> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let slot_col = header_position(&headers, &config.slot_column).ok_or_else(|| RosterError::MissingColumn {
        column: config.slot_column.clone(),
        table: "availability table",
    })?;
    let day_cols = config
        .days
        .iter()
        .map(|day| {
            header_position(&headers, day).ok_or_else(|| RosterError::MissingColumn {
                column: day.clone(),
                table: "availability table",
            })
        })
        .collect::<RosterResult<Vec<usize>>>()?;

    let mut availability = Availability::new(config.slots.len(), config.days.len());
    for result in reader.records() {
        let record = result?;
        let slot_name = record.get(slot_col).unwrap_or("").trim();
        if slot_name.is_empty() {
            continue;
        }
        let Some(slot) = config.slot_index(slot_name) else {
            log::warn!("Skipping availability row for unknown slot '{}'", slot_name);
            continue;
        };
        for (day, &col) in day_cols.iter().enumerate() {
            let cell = record.get(col).unwrap_or("");
            availability.insert(slot, day, split_names(cell));
        }
    }

    log::info!(
        "Loaded availability for {} people across {} slots x {} days",
        availability.people().len(),
        config.slots.len(),
        config.days.len()
    );
    Ok(availability)
}

pub fn load_availability<P: AsRef<Path>>(path: P, config: &RosterConfig) -> RosterResult<Availability> {
    let file = std::fs::File::open(path)?;
    read_availability(file, config)
}
