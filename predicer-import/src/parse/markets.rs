//! Parse the markets sheet

use std::path::Path;

use anyhow::{Result, bail};

use crate::model::{MarketDirection, MarketType, NewMarket, ValueInput};
use crate::parse::values::{parse_bool, parse_float};
use crate::tabular::Sheet;

const REQUIRED_COLUMNS: [&str; 12] = [
    "market",
    "market_type",
    "node",
    "processgroup",
    "direction",
    "realisation",
    "reserve_type",
    "is_bid",
    "is_limited",
    "min_bid",
    "max_bid",
    "fee",
];

/// Parse `markets.csv` into [`NewMarket`] records.
///
/// A missing or empty file degrades to no markets, but once the sheet is
/// present its required columns are mandatory. Unknown enum cells fall back
/// with a warning (`ENERGY` for the type, no direction); only `price` among
/// the series slots is filled later by enrichment.
pub fn parse_markets(path: &Path) -> Result<Vec<NewMarket>> {
    if !path.is_file() {
        log::warn!("markets.csv not found at {}, skipping markets", path.display());
        return Ok(Vec::new());
    }

    let sheet = Sheet::load(path)?;
    if sheet.is_empty() {
        log::warn!("markets.csv at {} has no data rows, skipping markets", path.display());
        return Ok(Vec::new());
    }

    parse_markets_sheet(&sheet)
}

fn parse_markets_sheet(sheet: &Sheet) -> Result<Vec<NewMarket>> {
    for col in REQUIRED_COLUMNS {
        if !sheet.has_column(col) {
            bail!(
                "markets.csv is missing required column '{}'. Available columns: {:?}",
                col,
                sheet.headers()
            );
        }
    }

    // legacy sheets carry the node under a market_node column
    let node_column = if sheet.has_column("market_node") {
        "market_node"
    } else {
        "node"
    };

    let mut markets = Vec::new();

    for row in sheet.rows() {
        let name = row.get("market").unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let realisation_cell = row.get("realisation").unwrap_or("").trim();
        let realisation = if realisation_cell.is_empty() {
            Vec::new()
        } else {
            vec![ValueInput::constant(None, parse_float(realisation_cell, 0.0))]
        };

        let reserve_type_cell = row.get("reserve_type").unwrap_or("").trim();
        let reserve_type = if reserve_type_cell.is_empty() {
            None
        } else {
            Some(reserve_type_cell.to_string())
        };

        markets.push(NewMarket {
            name,
            m_type: map_market_type(row.get("market_type").unwrap_or("")),
            node: row.get(node_column).unwrap_or("").trim().to_string(),
            process_group: row.get("processgroup").unwrap_or("").trim().to_string(),
            direction: map_direction(row.get("direction").unwrap_or("")),
            realisation,
            reserve_type,
            is_bid: parse_bool(row.get("is_bid").unwrap_or("")),
            is_limited: parse_bool(row.get("is_limited").unwrap_or("")),
            min_bid: parse_float(row.get("min_bid").unwrap_or(""), 0.0),
            max_bid: parse_float(row.get("max_bid").unwrap_or(""), 0.0),
            fee: parse_float(row.get("fee").unwrap_or(""), 0.0),
            price: Vec::new(),
            up_price: Vec::new(),
            down_price: Vec::new(),
            reserve_activation_price: Vec::new(),
        });
    }

    Ok(markets)
}

/// Map the market_type cell; unknown values warn and default to ENERGY.
fn map_market_type(raw: &str) -> MarketType {
    match raw.trim().to_lowercase().as_str() {
        "" | "energy" | "e" => MarketType::Energy,
        "reserve" | "res" | "r" => MarketType::Reserve,
        _ => {
            log::warn!("unknown market_type '{}', defaulting to ENERGY", raw.trim());
            MarketType::Energy
        }
    }
}

/// Map the direction cell; empty means no direction, unknown values warn
/// and stay unset.
fn map_direction(raw: &str) -> Option<MarketDirection> {
    match raw.trim().to_lowercase().as_str() {
        "" => None,
        "up" | "u" => Some(MarketDirection::Up),
        "down" | "d" => Some(MarketDirection::Down),
        "up_down" | "updown" | "both" => Some(MarketDirection::UpDown),
        "res_up" | "rup" | "reserve_up" => Some(MarketDirection::ResUp),
        "res_down" | "rdown" | "reserve_down" => Some(MarketDirection::ResDown),
        _ => {
            log::warn!("unknown direction '{}', leaving as None", raw.trim());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        Sheet::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn full_row<'a>(name: &'a str, market_type: &'a str, direction: &'a str) -> Vec<&'a str> {
        // market, market_type, node, processgroup, direction, realisation,
        // reserve_type, is_bid, is_limited, min_bid, max_bid, fee
        vec![
            name, market_type, "n1", "pg", direction, "", "", "1", "0", "0", "100", "0.5",
        ]
    }

    #[test]
    fn test_parse_market_fields() {
        let rows = vec![full_row("spot", "energy", "up")];
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let markets = parse_markets_sheet(&sheet(&rows)).unwrap();

        assert_eq!(markets.len(), 1);
        let m = &markets[0];
        assert_eq!(m.name, "spot");
        assert_eq!(m.m_type, MarketType::Energy);
        assert_eq!(m.node, "n1");
        assert_eq!(m.process_group, "pg");
        assert_eq!(m.direction, Some(MarketDirection::Up));
        assert!(m.realisation.is_empty());
        assert_eq!(m.reserve_type, None);
        assert!(m.is_bid && !m.is_limited);
        assert_eq!(m.max_bid, 100.0);
        assert_eq!(m.fee, 0.5);
        assert!(m.price.is_empty());
    }

    #[test]
    fn test_reserve_type_with_bogus_direction_warns_and_continues() {
        let rows = vec![full_row("fcr", "reserve", "bogus")];
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let markets = parse_markets_sheet(&sheet(&rows)).unwrap();

        assert_eq!(markets[0].m_type, MarketType::Reserve);
        assert_eq!(markets[0].direction, None);
        assert_eq!(
            serde_json::to_value(&markets[0]).unwrap()["mType"],
            serde_json::json!("RESERVE")
        );
    }

    #[test]
    fn test_unknown_market_type_defaults_to_energy() {
        assert_eq!(map_market_type("hydrogen"), MarketType::Energy);
        assert_eq!(map_market_type("reserve"), MarketType::Reserve);
        assert_eq!(map_market_type("R"), MarketType::Reserve);
    }

    #[test]
    fn test_direction_synonyms() {
        assert_eq!(map_direction("up_down"), Some(MarketDirection::UpDown));
        assert_eq!(map_direction("both"), Some(MarketDirection::UpDown));
        assert_eq!(map_direction("rup"), Some(MarketDirection::ResUp));
        assert_eq!(map_direction("reserve_down"), Some(MarketDirection::ResDown));
        assert_eq!(map_direction(""), None);
    }

    #[test]
    fn test_realisation_constant_from_cell() {
        let mut row = full_row("spot", "energy", "");
        row[5] = "0,95";
        let rows: Vec<&[&str]> = vec![row.as_slice()];
        let markets = parse_markets_sheet(&sheet(&rows)).unwrap();

        assert_eq!(
            markets[0].realisation,
            vec![ValueInput::constant(None, 0.95)]
        );
    }

    #[test]
    fn test_missing_column_is_fatal_when_sheet_present() {
        let bad = Sheet::new(
            vec!["market".to_string()],
            vec![vec!["spot".to_string()]],
        );
        assert!(parse_markets_sheet(&bad).is_err());
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let markets = parse_markets(Path::new("/nonexistent/markets.csv")).unwrap();
        assert!(markets.is_empty());
    }
}
