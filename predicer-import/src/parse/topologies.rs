//! Parse the process topology sheet

use std::path::Path;

use anyhow::Result;

use crate::model::{NewTopology, TopologyRow};
use crate::parse::values::parse_float;
use crate::tabular::Sheet;

const REQUIRED_COLUMNS: [&str; 9] = [
    "process",
    "source_sink",
    "node",
    "capacity",
    "vom_cost",
    "ramp_up",
    "ramp_down",
    "initial_load",
    "initial_flow",
];

/// Which end of the link the row's node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Source,
    Sink,
}

/// Parse the topology sheet into process-node links.
///
/// The sheet is optional: a missing file, an empty sheet or a missing
/// column degrade to an empty result with a warning. Rows whose role cell
/// is unrecognized are dropped with a warning.
pub fn parse_topologies(path: &Path) -> Result<Vec<TopologyRow>> {
    if !path.is_file() {
        log::info!("no topology csv found at {}, skipping topologies", path.display());
        return Ok(Vec::new());
    }

    let sheet = Sheet::load(path)?;
    if sheet.is_empty() {
        log::warn!("topology csv at {} has no data rows, skipping topologies", path.display());
        return Ok(Vec::new());
    }

    for col in REQUIRED_COLUMNS {
        if !sheet.has_column(col) {
            log::warn!(
                "topology csv missing column '{}' (has {:?}), skipping topologies",
                col,
                sheet.headers()
            );
            return Ok(Vec::new());
        }
    }

    Ok(parse_topology_rows(&sheet))
}

fn parse_topology_rows(sheet: &Sheet) -> Vec<TopologyRow> {
    let mut topologies = Vec::new();

    for row in sheet.rows() {
        let process_name = row.get("process").unwrap_or("").trim().to_string();
        let node_name = row.get("node").unwrap_or("").trim().to_string();
        if process_name.is_empty() || node_name.is_empty() {
            continue;
        }

        let role = match split_role(row.get("source_sink").unwrap_or("")) {
            Some(role) => role,
            None => continue,
        };
        let (source_node_name, sink_node_name) = match role {
            Role::Source => (Some(node_name), None),
            Role::Sink => (None, Some(node_name)),
        };

        topologies.push(TopologyRow {
            process_name,
            source_node_name,
            sink_node_name,
            topology: NewTopology {
                capacity: parse_float(row.get("capacity").unwrap_or(""), 0.0),
                vom_cost: parse_float(row.get("vom_cost").unwrap_or(""), 0.0),
                ramp_up: parse_float(row.get("ramp_up").unwrap_or(""), 0.0),
                ramp_down: parse_float(row.get("ramp_down").unwrap_or(""), 0.0),
                initial_load: parse_float(row.get("initial_load").unwrap_or(""), 0.0),
                initial_flow: parse_float(row.get("initial_flow").unwrap_or(""), 0.0),
                cap_ts: Vec::new(),
            },
        });
        // conversion_coeff is ignored: it has no slot in NewTopology
    }

    topologies
}

/// Map the role cell to source or sink. An empty cell skips the row
/// silently; anything unrecognized warns before the row is dropped.
fn split_role(raw: &str) -> Option<Role> {
    let r = raw.trim().to_lowercase();
    match r.as_str() {
        "" => None,
        "source" | "src" | "s" | "in" | "input" => Some(Role::Source),
        "sink" | "snk" | "d" | "out" | "output" => Some(Role::Sink),
        _ => {
            log::warn!("unknown source_sink value '{}', row skipped", raw.trim());
            None
        }
    }
}
