//! Parse the processes sheet

use std::path::Path;

use anyhow::{Result, bail};

use crate::model::{Conversion, NewProcess};
use crate::parse::values::{parse_bool, parse_float};
use crate::tabular::Sheet;

const REQUIRED_COLUMNS: [&str; 15] = [
    "process",
    "is_cf_fix",
    "is_online",
    "is_res",
    "conversion",
    "eff",
    "load_min",
    "load_max",
    "start_cost",
    "min_online",
    "min_offline",
    "max_online",
    "max_offline",
    "initial_state",
    "scenario_independent_online",
];

/// Parse `processes.csv` into [`NewProcess`] records.
///
/// The processes sheet is mandatory, and so is a recognizable `conversion`
/// cell on every kept row: the conversion kind has no safe default.
pub fn parse_processes(path: &Path) -> Result<Vec<NewProcess>> {
    if !path.is_file() {
        bail!("processes.csv not found at {}", path.display());
    }
    let sheet = Sheet::load(path)?;
    parse_processes_sheet(&sheet)
}

fn parse_processes_sheet(sheet: &Sheet) -> Result<Vec<NewProcess>> {
    for col in REQUIRED_COLUMNS {
        if !sheet.has_column(col) {
            bail!(
                "processes.csv is missing required column '{}'. Available columns: {:?}",
                col,
                sheet.headers()
            );
        }
    }

    let mut processes = Vec::new();

    for row in sheet.rows() {
        let name = row.get("process").unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let conversion = map_conversion(row.get("conversion").unwrap_or(""))?;

        processes.push(NewProcess {
            name,
            conversion,
            is_cf_fix: parse_bool(row.get("is_cf_fix").unwrap_or("")),
            is_online: parse_bool(row.get("is_online").unwrap_or("")),
            is_res: parse_bool(row.get("is_res").unwrap_or("")),
            eff: parse_float(row.get("eff").unwrap_or(""), 1.0),
            load_min: parse_float(row.get("load_min").unwrap_or(""), 0.0),
            load_max: parse_float(row.get("load_max").unwrap_or(""), 1.0),
            start_cost: parse_float(row.get("start_cost").unwrap_or(""), 0.0),
            min_online: parse_float(row.get("min_online").unwrap_or(""), 0.0),
            max_online: parse_float(row.get("max_online").unwrap_or(""), 0.0),
            min_offline: parse_float(row.get("min_offline").unwrap_or(""), 0.0),
            max_offline: parse_float(row.get("max_offline").unwrap_or(""), 0.0),
            initial_state: parse_bool(row.get("initial_state").unwrap_or("")),
            is_scenario_independent: parse_bool(
                row.get("scenario_independent_online").unwrap_or(""),
            ),
            cf: Vec::new(),
            eff_ts: Vec::new(),
            eff_ops_fun: Vec::new(),
        });
    }

    Ok(processes)
}

/// Map the `conversion` cell to its enum: spreadsheet codes 1/2/3 or the
/// synonym strings Unit/Transfer/Market.
fn map_conversion(raw: &str) -> Result<Conversion> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "unit" | "u" => Ok(Conversion::Unit),
        "2" | "transfer" | "t" => Ok(Conversion::Transfer),
        "3" | "market" | "m" => Ok(Conversion::Market),
        _ => bail!(
            "unsupported conversion value '{}' in processes.csv; expected 1/2/3 or Unit/Transfer/Market",
            raw
        ),
    }
}
