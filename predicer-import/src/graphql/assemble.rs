//! Build mutation envelopes from typed records

use anyhow::Result;

use crate::model::{
    InputDataSetup, NewMarket, NewNode, NewProcess, NewRisk, NodeMembership, NodeStateRow,
    ProcessMembership, ScenarioWeight, TopologyRow,
};

use super::Envelope;

pub const CREATE_INPUT_DATA_SETUP: &str = "\
mutation CreateInputDataSetup($setup: InputDataSetupInput!) {
  createInputDataSetup(setupUpdate: $setup) {
    errors { field message }
  }
}";

pub const CREATE_SCENARIO: &str = "\
mutation CreateScenario($scenario: NewScenario!) {
  createScenario(scenario: $scenario) {
    errors { field message }
  }
}";

pub const CREATE_NODE: &str = "\
mutation CreateNode($node: NewNode!) {
  createNode(node: $node) {
    errors { field message }
  }
}";

pub const ADD_NODE_STATE: &str = "\
mutation AddNodeState($nodeName: String!, $state: NewState!) {
  addNodeState(nodeName: $nodeName, state: $state) {
    errors { field message }
  }
}";

pub const CREATE_PROCESS: &str = "\
mutation CreateProcess($process: NewProcess!) {
  createProcess(process: $process) {
    errors { field message }
  }
}";

pub const CREATE_NODE_GROUP: &str = "\
mutation CreateNodeGroup($name: String!) {
  createNodeGroup(name: $name) {
    errors { field message }
  }
}";

pub const CREATE_PROCESS_GROUP: &str = "\
mutation CreateProcessGroup($name: String!) {
  createProcessGroup(name: $name) {
    errors { field message }
  }
}";

pub const ADD_NODE_TO_GROUP: &str = "\
mutation AddNodeToGroup($nodeName: String!, $groupName: String!) {
  addNodeToGroup(nodeName: $nodeName, groupName: $groupName) {
    errors { field message }
  }
}";

pub const ADD_PROCESS_TO_GROUP: &str = "\
mutation AddProcessToGroup($processName: String!, $groupName: String!) {
  addProcessToGroup(processName: $processName, groupName: $groupName) {
    errors { field message }
  }
}";

pub const CREATE_TOPOLOGY: &str = "\
mutation CreateTopology($processName: String!, $sourceNodeName: String, $sinkNodeName: String, $topology: NewTopology!) {
  createTopology(processName: $processName, sourceNodeName: $sourceNodeName, sinkNodeName: $sinkNodeName, topology: $topology) {
    errors { field message }
  }
}";

pub const CREATE_MARKET: &str = "\
mutation CreateMarket($market: NewMarket!) {
  createMarket(market: $market) {
    errors { field message }
  }
}";

pub const CREATE_RISK: &str = "\
mutation CreateRisk($risk: NewRisk!) {
  createRisk(risk: $risk) {
    errors { field message }
  }
}";

pub fn setup_envelope(setup: &InputDataSetup) -> Result<Envelope> {
    Envelope::single(CREATE_INPUT_DATA_SETUP, "setup", setup)
}

pub fn scenario_envelope(scenario: &ScenarioWeight) -> Result<Envelope> {
    Envelope::single(CREATE_SCENARIO, "scenario", scenario)
}

pub fn node_envelope(node: &NewNode) -> Result<Envelope> {
    Envelope::single(CREATE_NODE, "node", node)
}

/// Node states dispatch as a relationship: the node name and the state
/// record become the mutation's two variables.
pub fn node_state_envelope(row: &NodeStateRow) -> Result<Envelope> {
    Envelope::from_record(ADD_NODE_STATE, row)
}

pub fn process_envelope(process: &NewProcess) -> Result<Envelope> {
    Envelope::single(CREATE_PROCESS, "process", process)
}

pub fn node_group_envelope(name: &str) -> Result<Envelope> {
    Envelope::single(CREATE_NODE_GROUP, "name", &name)
}

pub fn process_group_envelope(name: &str) -> Result<Envelope> {
    Envelope::single(CREATE_PROCESS_GROUP, "name", &name)
}

pub fn node_membership_envelope(membership: &NodeMembership) -> Result<Envelope> {
    Envelope::from_record(ADD_NODE_TO_GROUP, membership)
}

pub fn process_membership_envelope(membership: &ProcessMembership) -> Result<Envelope> {
    Envelope::from_record(ADD_PROCESS_TO_GROUP, membership)
}

pub fn topology_envelope(topology: &TopologyRow) -> Result<Envelope> {
    Envelope::from_record(CREATE_TOPOLOGY, topology)
}

pub fn market_envelope(market: &NewMarket) -> Result<Envelope> {
    Envelope::single(CREATE_MARKET, "market", market)
}

pub fn risk_envelope(risk: &NewRisk) -> Result<Envelope> {
    Envelope::single(CREATE_RISK, "risk", risk)
}
