//! Parse the groups sheet into group sets and memberships

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use crate::model::{GroupData, NodeMembership, ProcessMembership};
use crate::tabular::Sheet;

/// Parse `groups.csv` (group_type,entity,group rows).
///
/// Group name sets come out deduplicated and lexicographically sorted;
/// memberships keep sheet row order. The sheet is optional and degrades to
/// an all-empty result with a warning.
pub fn parse_groups(path: &Path) -> Result<GroupData> {
    if !path.is_file() {
        log::info!("no groups.csv found at {}, skipping groups", path.display());
        return Ok(GroupData::default());
    }

    let sheet = Sheet::load(path)?;
    if sheet.is_empty() {
        log::warn!("groups.csv at {} has no data rows, skipping groups", path.display());
        return Ok(GroupData::default());
    }

    for col in ["group_type", "entity", "group"] {
        if !sheet.has_column(col) {
            log::warn!(
                "groups.csv missing column '{}' (has {:?}), skipping groups",
                col,
                sheet.headers()
            );
            return Ok(GroupData::default());
        }
    }

    Ok(parse_group_rows(&sheet))
}

fn parse_group_rows(sheet: &Sheet) -> GroupData {
    let mut node_groups = BTreeSet::new();
    let mut process_groups = BTreeSet::new();
    let mut node_memberships = Vec::new();
    let mut process_memberships = Vec::new();

    for row in sheet.rows() {
        let group_type = row.get("group_type").unwrap_or("").trim().to_lowercase();
        let entity = row.get("entity").unwrap_or("").trim().to_string();
        let group = row.get("group").unwrap_or("").trim().to_string();

        if entity.is_empty() || group.is_empty() {
            continue;
        }

        match group_type.as_str() {
            "node" => {
                node_groups.insert(group.clone());
                node_memberships.push(NodeMembership {
                    node_name: entity,
                    group_name: group,
                });
            }
            "process" => {
                process_groups.insert(group.clone());
                process_memberships.push(ProcessMembership {
                    process_name: entity,
                    group_name: group,
                });
            }
            _ => {
                log::warn!("unknown group_type '{}' in groups.csv, row skipped", group_type);
            }
        }
    }

    GroupData {
        node_groups: node_groups.into_iter().collect(),
        process_groups: process_groups.into_iter().collect(),
        node_memberships,
        process_memberships,
    }
}
