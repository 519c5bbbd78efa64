//! Decode wide-format time-series sheets
//!
//! A wide sheet's first column is the time axis (used only for row
//! alignment); every other column header is `"<name>,<scenario>"` or a bare
//! `"<name>"`. Each column decodes into one [`ValueInput`] attached to its
//! entity, in column order, so an entity can collect several descriptors
//! across scenario columns.

use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;

use crate::model::ValueInput;
use crate::tabular::Sheet;

/// Entity name to decoded descriptors, preserving source column order.
pub type SeriesMap = IndexMap<String, Vec<ValueInput>>;

/// Load a wide series sheet from disk, degrading to an empty map when the
/// file is missing, empty or has no data columns.
pub fn load_series_map(path: &Path, label: &str) -> Result<SeriesMap> {
    if !path.is_file() {
        log::info!("no {} csv found at {}, skipping", label, path.display());
        return Ok(SeriesMap::new());
    }

    let sheet = Sheet::load(path)?;
    if sheet.headers().len() <= 1 || sheet.is_empty() {
        log::warn!("{} csv at {} has no data columns, skipping", label, path.display());
        return Ok(SeriesMap::new());
    }

    Ok(decode_wide_sheet(&sheet))
}

/// Decode every `"<name>,<scenario>"` column of a wide sheet.
///
/// Cells that do not parse as numbers are dropped from the column (not
/// zero-filled); a column with no decodable values is skipped entirely.
/// A column whose decoded values are all equal collapses to a constant
/// descriptor. The equality check is exact f64 comparison after coercion:
/// intentionally sensitive to float noise, kept as an accepted
/// simplification.
pub fn decode_wide_sheet(sheet: &Sheet) -> SeriesMap {
    let mut map = SeriesMap::new();

    for col in 1..sheet.headers().len() {
        let header = sheet.headers()[col].trim();
        if header.is_empty() {
            continue;
        }

        let (name, scenario) = split_header(header);
        if name.is_empty() {
            continue;
        }

        let values = column_floats(sheet, col);
        if values.is_empty() {
            continue;
        }

        let descriptor = if values.iter().all(|v| *v == values[0]) {
            ValueInput::constant(scenario, values[0])
        } else {
            ValueInput::series(scenario, values)
        };

        map.entry(name).or_default().push(descriptor);
    }

    map
}

/// Split a column header on its first comma into entity name and scenario.
/// A bare header and a scenario spelled `ALL` (any case) both mean
/// "applies to all scenarios".
fn split_header(header: &str) -> (String, Option<String>) {
    match header.split_once(',') {
        Some((name, scenario)) => {
            let scenario = scenario.trim();
            let scenario = if scenario.eq_ignore_ascii_case("ALL") {
                None
            } else {
                Some(scenario.to_string())
            };
            (name.trim().to_string(), scenario)
        }
        None => (header.to_string(), None),
    }
}

/// Collect one column's decodable values in row order, accepting both
/// decimal-point and decimal-comma spellings.
fn column_floats(sheet: &Sheet, col: usize) -> Vec<f64> {
    let mut values = Vec::new();
    for row in 0..sheet.n_rows() {
        let cell = sheet.cell(row, col).trim();
        if cell.is_empty() {
            continue;
        }
        if let Ok(v) = cell.replace(',', ".").parse::<f64>() {
            values.push(v);
        }
    }
    values
}
