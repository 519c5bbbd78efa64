//! Parse the setup sheet into global run parameters

use std::path::Path;

use anyhow::{Result, bail};

use crate::model::InputDataSetup;
use crate::parse::values::{parse_bool, parse_float, parse_int};
use crate::tabular::Sheet;

/// Parse `setup.csv` (parameter,value rows) into an [`InputDataSetup`].
///
/// The setup sheet is mandatory: a missing file or a missing required
/// column aborts the run. Parameter rows the service does not know are
/// ignored; rows with an empty value cell leave their field unset so it is
/// omitted from the serialized record.
pub fn parse_setup(path: &Path) -> Result<InputDataSetup> {
    if !path.is_file() {
        bail!("setup.csv not found at {}", path.display());
    }
    let sheet = Sheet::load(path)?;
    parse_setup_sheet(&sheet)
}

fn parse_setup_sheet(sheet: &Sheet) -> Result<InputDataSetup> {
    for col in ["parameter", "value"] {
        if !sheet.has_column(col) {
            bail!(
                "setup.csv is missing required column '{}'. Available columns: {:?}",
                col,
                sheet.headers()
            );
        }
    }

    let mut setup = InputDataSetup::default();

    for row in sheet.rows() {
        let parameter = row.get("parameter").unwrap_or("").trim().to_string();
        let value = row.get("value").unwrap_or("").trim().to_string();
        if value.is_empty() {
            continue;
        }

        match parameter.as_str() {
            "use_market_bids" => setup.use_market_bids = Some(parse_bool(&value)),
            "use_reserves" => setup.use_reserves = Some(parse_bool(&value)),
            "use_reserve_realisation" => {
                setup.use_reserve_realisation = Some(parse_bool(&value))
            }
            "use_node_dummy_variables" => {
                setup.use_node_dummy_variables = Some(parse_bool(&value))
            }
            "use_ramp_dummy_variables" => {
                setup.use_ramp_dummy_variables = Some(parse_bool(&value))
            }
            "common_start_timesteps" => setup.common_timesteps = parse_int(&value),
            "common_scenario_name" => setup.common_scenario_name = Some(value),
            "node_dummy_variable_cost" => {
                setup.node_dummy_variable_cost = Some(parse_float(&value, 0.0))
            }
            "ramp_dummy_variable_cost" => {
                setup.ramp_dummy_variable_cost = Some(parse_float(&value, 0.0))
            }
            // unknown parameters are not ours to interpret
            _ => {}
        }
    }

    Ok(setup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[(&str, &str)]) -> Sheet {
        Sheet::new(
            vec!["parameter".to_string(), "value".to_string()],
            rows.iter()
                .map(|(p, v)| vec![p.to_string(), v.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_parse_setup_typed_fields() {
        let setup = parse_setup_sheet(&sheet(&[
            ("use_market_bids", "1"),
            ("use_reserves", "no"),
            ("common_start_timesteps", "24"),
            ("common_scenario_name", "base"),
            ("node_dummy_variable_cost", "1000,5"),
        ]))
        .unwrap();

        assert_eq!(setup.use_market_bids, Some(true));
        assert_eq!(setup.use_reserves, Some(false));
        assert_eq!(setup.common_timesteps, Some(24));
        assert_eq!(setup.common_scenario_name.as_deref(), Some("base"));
        assert_eq!(setup.node_dummy_variable_cost, Some(1000.5));
        assert_eq!(setup.use_reserve_realisation, None);
    }

    #[test]
    fn test_unknown_and_empty_parameters_are_skipped() {
        let setup = parse_setup_sheet(&sheet(&[
            ("mystery_knob", "7"),
            ("use_reserves", ""),
        ]))
        .unwrap();

        assert_eq!(setup, InputDataSetup::default());
        let json = serde_json::to_value(&setup).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let bad = Sheet::new(
            vec!["parameter".to_string()],
            vec![vec!["use_reserves".to_string()]],
        );
        assert!(parse_setup_sheet(&bad).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(parse_setup(Path::new("/nonexistent/setup.csv")).is_err());
    }
}
