//! Parse the risk sheet

use std::path::Path;

use anyhow::Result;

use crate::model::NewRisk;
use crate::parse::values::parse_float;
use crate::tabular::Sheet;

/// Parse `risk.csv` (parameter,value rows) into [`NewRisk`] records.
///
/// The sheet is optional and degrades to an empty result with a warning.
pub fn parse_risks(path: &Path) -> Result<Vec<NewRisk>> {
    if !path.is_file() {
        log::warn!("risk.csv not found at {}, skipping risk", path.display());
        return Ok(Vec::new());
    }

    let sheet = Sheet::load(path)?;
    if sheet.is_empty() {
        log::warn!("risk.csv at {} has no data rows, skipping risk", path.display());
        return Ok(Vec::new());
    }

    for col in ["parameter", "value"] {
        if !sheet.has_column(col) {
            log::warn!(
                "risk.csv missing column '{}' (has {:?}), skipping risk",
                col,
                sheet.headers()
            );
            return Ok(Vec::new());
        }
    }

    let mut risks = Vec::new();
    for row in sheet.rows() {
        let parameter = row.get("parameter").unwrap_or("").trim().to_string();
        if parameter.is_empty() {
            continue;
        }
        risks.push(NewRisk {
            parameter,
            value: parse_float(row.get("value").unwrap_or(""), 0.0),
        });
    }

    Ok(risks)
}
