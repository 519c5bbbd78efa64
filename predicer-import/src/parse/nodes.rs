//! Parse the nodes sheet into node and node-state records

use std::path::Path;

use anyhow::{Result, bail};

use crate::model::{NewNode, NewNodeState, NodeStateRow};
use crate::parse::values::{parse_bool, parse_float};
use crate::tabular::Sheet;

const REQUIRED_COLUMNS: [&str; 4] = ["node", "is_commodity", "is_res", "is_market"];

/// Parse `nodes.csv` into [`NewNode`] records.
///
/// The nodes sheet is mandatory. `cost` and `inflow` start empty and are
/// filled later from the price and inflow sheets.
pub fn parse_nodes(path: &Path) -> Result<Vec<NewNode>> {
    if !path.is_file() {
        bail!("nodes.csv not found at {}", path.display());
    }
    let sheet = Sheet::load(path)?;
    parse_nodes_sheet(&sheet)
}

fn parse_nodes_sheet(sheet: &Sheet) -> Result<Vec<NewNode>> {
    for col in REQUIRED_COLUMNS {
        if !sheet.has_column(col) {
            bail!(
                "nodes.csv is missing required column '{}'. Available columns: {:?}",
                col,
                sheet.headers()
            );
        }
    }

    let mut nodes = Vec::new();

    for row in sheet.rows() {
        let name = row.get("node").unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        nodes.push(NewNode {
            name,
            is_commodity: parse_bool(row.get("is_commodity").unwrap_or("")),
            is_market: parse_bool(row.get("is_market").unwrap_or("")),
            is_res: parse_bool(row.get("is_res").unwrap_or("")),
            cost: Vec::new(),
            inflow: Vec::new(),
        });
    }

    Ok(nodes)
}

/// Parse node states out of `nodes.csv`.
///
/// Only rows whose `is_state` cell is truthy produce a state; when the
/// column is absent every node gets one. Absent parameter columns keep the
/// state's defaults.
pub fn parse_node_states(path: &Path) -> Result<Vec<NodeStateRow>> {
    if !path.is_file() {
        bail!("nodes.csv not found at {}", path.display());
    }
    let sheet = Sheet::load(path)?;
    parse_node_states_sheet(&sheet)
}

fn parse_node_states_sheet(sheet: &Sheet) -> Result<Vec<NodeStateRow>> {
    if !sheet.has_column("node") {
        bail!("nodes.csv must have a 'node' column for node names");
    }

    let has_state_flag = sheet.has_column("is_state");
    let mut states = Vec::new();

    for row in sheet.rows() {
        let name = row.get("node").unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        if has_state_flag && !parse_bool(row.get("is_state").unwrap_or("")) {
            continue;
        }

        let mut state = NewNodeState::default();
        if let Some(raw) = row.get("in_max") {
            state.in_max = parse_float(raw, state.in_max);
        }
        if let Some(raw) = row.get("out_max") {
            state.out_max = parse_float(raw, state.out_max);
        }
        if let Some(raw) = row.get("state_loss_proportional") {
            state.state_loss_proportional = parse_float(raw, state.state_loss_proportional);
        }
        if let Some(raw) = row.get("state_min") {
            state.state_min = parse_float(raw, state.state_min);
        }
        if let Some(raw) = row.get("state_max") {
            state.state_max = parse_float(raw, state.state_max);
        }
        if let Some(raw) = row.get("initial_state") {
            state.initial_state = parse_float(raw, state.initial_state);
        }
        if let Some(raw) = row.get("scenario_independent_state") {
            state.is_scenario_independent = parse_bool(raw);
        }
        if let Some(raw) = row.get("is_temp") {
            state.is_temp = parse_bool(raw);
        }
        if let Some(raw) = row.get("t_e_conversion") {
            state.t_e_conversion = parse_float(raw, state.t_e_conversion);
        }
        if let Some(raw) = row.get("residual_value") {
            state.residual_value = parse_float(raw, state.residual_value);
        }

        states.push(NodeStateRow {
            node_name: name,
            state,
        });
    }

    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_parse_nodes_booleans_and_empty_series() {
        let nodes = parse_nodes_sheet(&sheet(
            &["node", "is_commodity", "is_res", "is_market"],
            &[&["tank1", "0", "0", "0"], &["grid", "no", "yes", "1"]],
        ))
        .unwrap();

        assert_eq!(nodes.len(), 2);
        let tank = &nodes[0];
        assert_eq!(tank.name, "tank1");
        assert!(!tank.is_commodity && !tank.is_market && !tank.is_res);
        assert!(tank.cost.is_empty() && tank.inflow.is_empty());

        let grid = &nodes[1];
        assert!(!grid.is_commodity);
        assert!(grid.is_res);
        assert!(grid.is_market);
    }

    #[test]
    fn test_blank_node_name_rows_are_skipped() {
        let nodes = parse_nodes_sheet(&sheet(
            &["node", "is_commodity", "is_res", "is_market"],
            &[&["", "1", "1", "1"], &["  ", "1", "1", "1"], &["ok", "0", "0", "0"]],
        ))
        .unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "ok");
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let result = parse_nodes_sheet(&sheet(&["node", "is_commodity"], &[]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("is_res"));
    }

    #[test]
    fn test_states_only_for_flagged_rows() {
        let states = parse_node_states_sheet(&sheet(
            &["node", "is_state", "state_max", "t_e_conversion"],
            &[
                &["tank1", "1", "500", "0.5"],
                &["grid", "0", "100", "1"],
            ],
        ))
        .unwrap();

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].node_name, "tank1");
        assert_eq!(states[0].state.state_max, 500.0);
        assert_eq!(states[0].state.t_e_conversion, 0.5);
        // untouched columns keep their defaults
        assert_eq!(states[0].state.in_max, 0.0);
        assert!(states[0].state.is_scenario_independent);
    }

    #[test]
    fn test_absent_is_state_column_means_every_node() {
        let states = parse_node_states_sheet(&sheet(
            &["node", "in_max"],
            &[&["a", "10"], &["b", ""]],
        ))
        .unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].state.in_max, 10.0);
        // empty cell keeps the default
        assert_eq!(states[1].state.in_max, 0.0);
    }
}
