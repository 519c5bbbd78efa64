//! Parse the scenarios sheet

use std::path::Path;

use anyhow::Result;

use crate::model::ScenarioWeight;
use crate::parse::values::parse_float;
use crate::tabular::Sheet;

/// Parse `scenarios.csv` into name/weight pairs.
///
/// The weight column is accepted under both its correct spelling
/// (`probability`) and the misspelling (`propability`) that ships in older
/// workbooks. The sheet is optional and degrades to an empty result.
pub fn parse_scenarios(path: &Path) -> Result<Vec<ScenarioWeight>> {
    if !path.is_file() {
        log::warn!("scenarios csv not found at {}, skipping scenarios", path.display());
        return Ok(Vec::new());
    }

    let sheet = Sheet::load(path)?;
    if sheet.is_empty() {
        log::warn!("scenarios csv at {} has no data rows, skipping scenarios", path.display());
        return Ok(Vec::new());
    }

    let weight_column = ["probability", "propability"]
        .into_iter()
        .find(|c| sheet.has_column(c));
    let weight_column = match weight_column {
        Some(col) if sheet.has_column("name") => col,
        _ => {
            log::warn!(
                "scenarios csv missing required columns 'name' + probability/propability (has {:?}), skipping scenarios",
                sheet.headers()
            );
            return Ok(Vec::new());
        }
    };

    let mut scenarios = Vec::new();
    for row in sheet.rows() {
        let name = row.get("name").unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        scenarios.push(ScenarioWeight {
            name,
            weight: parse_float(row.get(weight_column).unwrap_or(""), 0.0),
        });
    }

    Ok(scenarios)
}
