//! Typed input records for the Predicer model API
//!
//! One record type per workbook sheet, shaped after the GraphQL input
//! objects the model service accepts. Records are plain value objects:
//! parsers build them, enrichment fills their series fields, assembly
//! serializes them into mutation variables.

use serde::Serialize;

/// A decoded time-series value, optionally scoped to a scenario.
///
/// `scenario: None` means the value applies to every scenario (the `ALL`
/// column form). When all decoded samples in a column are equal the
/// representation collapses to a single constant, otherwise the full series
/// is kept in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueInput {
    pub scenario: Option<String>,
    #[serde(flatten)]
    pub repr: SeriesRepr,
}

/// Constant-or-series representation of a decoded column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesRepr {
    Constant(f64),
    Series(Vec<f64>),
}

impl ValueInput {
    pub fn constant(scenario: Option<String>, value: f64) -> Self {
        Self {
            scenario,
            repr: SeriesRepr::Constant(value),
        }
    }

    pub fn series(scenario: Option<String>, values: Vec<f64>) -> Self {
        Self {
            scenario,
            repr: SeriesRepr::Series(values),
        }
    }
}

/// Global solver/run parameters from the setup sheet.
///
/// Every field is optional: a parameter whose row is absent (or whose value
/// cell is empty) is omitted from the serialized record rather than
/// defaulted, so the service keeps its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDataSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_market_bids: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_reserves: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_reserve_realisation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_node_dummy_variables: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ramp_dummy_variables: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_timesteps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_scenario_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_dummy_variable_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp_dummy_variable_cost: Option<f64>,
}

/// A network node (commodity, market or reserve node).
///
/// `cost` and `inflow` start empty and are filled from the price and inflow
/// sheets by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    pub name: String,
    pub is_commodity: bool,
    pub is_market: bool,
    pub is_res: bool,
    pub cost: Vec<ValueInput>,
    pub inflow: Vec<ValueInput>,
}

/// Storage state parameters attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNodeState {
    pub in_max: f64,
    pub out_max: f64,
    pub state_loss_proportional: f64,
    pub state_min: f64,
    pub state_max: f64,
    pub initial_state: f64,
    pub is_scenario_independent: bool,
    pub is_temp: bool,
    pub t_e_conversion: f64,
    pub residual_value: f64,
}

impl Default for NewNodeState {
    fn default() -> Self {
        Self {
            in_max: 0.0,
            out_max: 0.0,
            state_loss_proportional: 0.0,
            state_min: 0.0,
            state_max: 0.0,
            initial_state: 0.0,
            is_scenario_independent: true,
            is_temp: false,
            t_e_conversion: 1.0,
            residual_value: 0.0,
        }
    }
}

/// A node state paired with the node it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStateRow {
    pub node_name: String,
    pub state: NewNodeState,
}

/// What a process converts: a unit, a transfer link or a market exchange.
///
/// The sheet encodes this as 1/2/3 or a synonym string. There is no safe
/// default: an unrecognized value aborts the process sheet because the kind
/// changes downstream model semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conversion {
    Unit,
    Transfer,
    Market,
}

/// A conversion process (plant, link or market interface).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProcess {
    pub name: String,
    pub conversion: Conversion,
    pub is_cf_fix: bool,
    pub is_online: bool,
    pub is_res: bool,
    pub eff: f64,
    pub load_min: f64,
    pub load_max: f64,
    pub start_cost: f64,
    pub min_online: f64,
    pub max_online: f64,
    pub min_offline: f64,
    pub max_offline: f64,
    pub initial_state: bool,
    pub is_scenario_independent: bool,
    pub cf: Vec<ValueInput>,
    pub eff_ts: Vec<ValueInput>,
    pub eff_ops_fun: Vec<ValueInput>,
}

/// Flow parameters of a process-node link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopology {
    pub capacity: f64,
    pub vom_cost: f64,
    pub ramp_up: f64,
    pub ramp_down: f64,
    pub initial_load: f64,
    pub initial_flow: f64,
    pub cap_ts: Vec<ValueInput>,
}

/// A directed link between a process and a node.
///
/// Exactly one of `source_node_name` / `sink_node_name` is set, depending on
/// the role column of the sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyRow {
    pub process_name: String,
    pub source_node_name: Option<String>,
    pub sink_node_name: Option<String>,
    pub topology: NewTopology,
}

/// Node-to-group membership.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMembership {
    pub node_name: String,
    pub group_name: String,
}

/// Process-to-group membership.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMembership {
    pub process_name: String,
    pub group_name: String,
}

/// Everything the groups sheet produces: the deduplicated, sorted group
/// name sets plus the memberships in sheet row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupData {
    pub node_groups: Vec<String>,
    pub process_groups: Vec<String>,
    pub node_memberships: Vec<NodeMembership>,
    pub process_memberships: Vec<ProcessMembership>,
}

impl GroupData {
    pub fn is_empty(&self) -> bool {
        self.node_groups.is_empty()
            && self.process_groups.is_empty()
            && self.node_memberships.is_empty()
            && self.process_memberships.is_empty()
    }
}

/// Energy or reserve market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    Energy,
    Reserve,
}

/// Bid direction of a reserve market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketDirection {
    Up,
    Down,
    UpDown,
    ResUp,
    ResDown,
}

/// A market the model can trade on.
///
/// Of the four series slots only `price` is filled by enrichment; the rest
/// stay empty until the service supports their sheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarket {
    pub name: String,
    pub m_type: MarketType,
    pub node: String,
    pub process_group: String,
    pub direction: Option<MarketDirection>,
    pub realisation: Vec<ValueInput>,
    pub reserve_type: Option<String>,
    pub is_bid: bool,
    pub is_limited: bool,
    pub min_bid: f64,
    pub max_bid: f64,
    pub fee: f64,
    pub price: Vec<ValueInput>,
    pub up_price: Vec<ValueInput>,
    pub down_price: Vec<ValueInput>,
    pub reserve_activation_price: Vec<ValueInput>,
}

/// A single risk parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRisk {
    pub parameter: String,
    pub value: f64,
}

/// A scenario and its probability weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioWeight {
    pub name: String,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_input_constant_serialization() {
        let vi = ValueInput::constant(None, 1.0);
        let json = serde_json::to_value(&vi).unwrap();
        assert_eq!(json, serde_json::json!({"scenario": null, "constant": 1.0}));
    }

    #[test]
    fn test_value_input_series_serialization() {
        let vi = ValueInput::series(Some("s1".to_string()), vec![1.0, 2.0]);
        let json = serde_json::to_value(&vi).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"scenario": "s1", "series": [1.0, 2.0]})
        );
    }

    #[test]
    fn test_setup_omits_absent_fields() {
        let setup = InputDataSetup {
            use_reserves: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&setup).unwrap();
        assert_eq!(json, serde_json::json!({"useReserves": true}));
    }

    #[test]
    fn test_node_state_defaults() {
        let state = NewNodeState::default();
        assert!(state.is_scenario_independent);
        assert!(!state.is_temp);
        assert_eq!(state.t_e_conversion, 1.0);
        assert_eq!(state.in_max, 0.0);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["tEConversion"], 1.0);
        assert_eq!(json["isScenarioIndependent"], true);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(Conversion::Transfer).unwrap(),
            serde_json::json!("TRANSFER")
        );
        assert_eq!(
            serde_json::to_value(MarketType::Reserve).unwrap(),
            serde_json::json!("RESERVE")
        );
        assert_eq!(
            serde_json::to_value(MarketDirection::UpDown).unwrap(),
            serde_json::json!("UP_DOWN")
        );
        assert_eq!(
            serde_json::to_value(MarketDirection::ResDown).unwrap(),
            serde_json::json!("RES_DOWN")
        );
    }

    #[test]
    fn test_topology_row_serializes_null_source() {
        let row = TopologyRow {
            process_name: "p1".to_string(),
            source_node_name: None,
            sink_node_name: Some("n1".to_string()),
            topology: NewTopology {
                capacity: 10.0,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["processName"], "p1");
        assert_eq!(json["sourceNodeName"], serde_json::Value::Null);
        assert_eq!(json["sinkNodeName"], "n1");
        assert_eq!(json["topology"]["capacity"], 10.0);
        assert_eq!(json["topology"]["capTs"], serde_json::json!([]));
    }
}
