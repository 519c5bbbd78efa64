//! End-to-end import pipeline
//!
//! Fully sequential: workbook conversion, sheet parsing, series decoding,
//! enrichment, envelope assembly, persistence, then the optional dispatch
//! phase. Fatal conditions (mandatory sheet problems, an unmappable
//! process conversion) abort the run; everything else degrades with a
//! warning and the run produces a best-effort output set.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::dispatch::{self, DispatchPlan, DispatchReport, Stage};
use crate::graphql::{self, BatchWriter, Envelope, GraphQlClient};
use crate::model::{GroupData, InputDataSetup, NewMarket, NewNode, NewProcess, NewRisk,
    NodeStateRow, ScenarioWeight, TopologyRow};
use crate::parse::{enrich, groups, markets, nodes, processes, risk, scenarios, series, setup,
    topologies};
use crate::workbook;

/// Everything parsed out of one workbook, after enrichment.
#[derive(Debug)]
pub struct ParsedModel {
    pub setup: InputDataSetup,
    pub scenarios: Vec<ScenarioWeight>,
    pub nodes: Vec<NewNode>,
    pub node_states: Vec<NodeStateRow>,
    pub processes: Vec<NewProcess>,
    pub groups: GroupData,
    pub topologies: Vec<TopologyRow>,
    pub markets: Vec<NewMarket>,
    pub risks: Vec<NewRisk>,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub entities_parsed: usize,
    pub files_written: usize,
    pub dispatch: Option<DispatchReport>,
}

/// Run the whole import.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let dirs = workbook::create_folder_structure(&config.base_dir)?;
    workbook::excel_to_csv(&config.workbook, &dirs.csv)?;

    let model = parse_model(&dirs)?;
    log::info!(
        "parsed {} nodes, {} node states, {} processes, {} topologies, {} markets, {} scenarios, {} risks",
        model.nodes.len(),
        model.node_states.len(),
        model.processes.len(),
        model.topologies.len(),
        model.markets.len(),
        model.scenarios.len(),
        model.risks.len(),
    );

    let plan = assemble_plan(&model)?;
    let mut writer = BatchWriter::new(&dirs.graphql);
    persist_plan(&model, &mut writer)?;

    let mut summary = RunSummary {
        entities_parsed: plan.total_items(),
        files_written: writer.files_written(),
        dispatch: None,
    };

    if config.submit {
        let client = GraphQlClient::new(
            &config.endpoint,
            config.bearer_token.clone(),
            config.timeout(),
        )?;
        let report = dispatch::dispatch_all(&client, &plan).await;
        if report.failed > 0 {
            log::warn!(
                "{} of {} submissions failed; the model on the service is partial",
                report.failed,
                report.submitted
            );
        }
        summary.dispatch = Some(report);
    } else {
        log::info!("dispatch disabled, payloads only persisted to {}", dirs.graphql.display());
    }

    Ok(summary)
}

/// Parse every sheet and join the series maps onto the base records.
fn parse_model(dirs: &workbook::OutputDirs) -> Result<ParsedModel> {
    let setup = setup::parse_setup(&dirs.sheet("setup"))?;
    let scenarios = scenarios::parse_scenarios(&dirs.sheet("scenarios"))?;
    let mut nodes = nodes::parse_nodes(&dirs.sheet("nodes"))?;
    let node_states = nodes::parse_node_states(&dirs.sheet("nodes"))?;
    let mut processes = processes::parse_processes(&dirs.sheet("processes"))?;
    let groups = groups::parse_groups(&dirs.sheet("groups"))?;
    let topologies = topologies::parse_topologies(&dirs.sheet("process_topology"))?;
    let mut markets = markets::parse_markets(&dirs.sheet("markets"))?;
    let risks = risk::parse_risks(&dirs.sheet("risk"))?;

    let node_costs = series::load_series_map(&dirs.sheet("price"), "node price")?;
    let node_inflow = series::load_series_map(&dirs.sheet("inflow"), "inflow")?;
    let process_cf = series::load_series_map(&dirs.sheet("cf"), "cf")?;
    let market_prices = series::load_series_map(&dirs.sheet("market_prices"), "market prices")?;

    enrich::attach_node_costs(&mut nodes, &node_costs);
    enrich::attach_node_inflow(&mut nodes, &node_inflow);
    enrich::attach_process_cf(&mut processes, &process_cf);
    enrich::attach_market_prices(&mut markets, &market_prices);

    Ok(ParsedModel {
        setup,
        scenarios,
        nodes,
        node_states,
        processes,
        groups,
        topologies,
        markets,
        risks,
    })
}

/// Assemble every record into its envelope, grouped by dispatch stage.
fn assemble_plan(model: &ParsedModel) -> Result<DispatchPlan> {
    let mut plan = DispatchPlan::new();

    plan.push(
        Stage::Setup,
        "input data setup",
        graphql::setup_envelope(&model.setup)?,
    );
    for scenario in &model.scenarios {
        plan.push(
            Stage::Scenarios,
            format!("scenario {}", scenario.name),
            graphql::scenario_envelope(scenario)?,
        );
    }
    for node in &model.nodes {
        plan.push(
            Stage::Nodes,
            format!("node {}", node.name),
            graphql::node_envelope(node)?,
        );
    }
    for state in &model.node_states {
        plan.push(
            Stage::NodeStates,
            format!("state of {}", state.node_name),
            graphql::node_state_envelope(state)?,
        );
    }
    for process in &model.processes {
        plan.push(
            Stage::Processes,
            format!("process {}", process.name),
            graphql::process_envelope(process)?,
        );
    }
    for group in &model.groups.node_groups {
        plan.push(
            Stage::NodeGroups,
            format!("node group {}", group),
            graphql::node_group_envelope(group)?,
        );
    }
    for group in &model.groups.process_groups {
        plan.push(
            Stage::ProcessGroups,
            format!("process group {}", group),
            graphql::process_group_envelope(group)?,
        );
    }
    for membership in &model.groups.node_memberships {
        plan.push(
            Stage::NodeMemberships,
            format!("{} in {}", membership.node_name, membership.group_name),
            graphql::node_membership_envelope(membership)?,
        );
    }
    for membership in &model.groups.process_memberships {
        plan.push(
            Stage::ProcessMemberships,
            format!("{} in {}", membership.process_name, membership.group_name),
            graphql::process_membership_envelope(membership)?,
        );
    }
    for topology in &model.topologies {
        plan.push(
            Stage::Topologies,
            format!("{} <-> {}", topology.process_name, topology_node(topology)),
            graphql::topology_envelope(topology)?,
        );
    }
    for market in &model.markets {
        plan.push(
            Stage::Markets,
            format!("market {}", market.name),
            graphql::market_envelope(market)?,
        );
    }
    for risk in &model.risks {
        plan.push(
            Stage::Risks,
            format!("risk {}", risk.parameter),
            graphql::risk_envelope(risk)?,
        );
    }

    Ok(plan)
}

fn topology_node(topology: &TopologyRow) -> &str {
    topology
        .source_node_name
        .as_deref()
        .or(topology.sink_node_name.as_deref())
        .unwrap_or("")
}

/// Persist every envelope: one file per item plus a combined file per
/// entity type.
fn persist_plan(model: &ParsedModel, writer: &mut BatchWriter) -> Result<()> {
    writer.write_single("inputdatasetup", &graphql::setup_envelope(&model.setup)?)?;

    persist_collection(writer, "scenario", "scenarios", &model.scenarios, |s| {
        (s.name.clone(), graphql::scenario_envelope(s))
    })?;
    persist_collection(writer, "node", "nodes", &model.nodes, |n| {
        (n.name.clone(), graphql::node_envelope(n))
    })?;
    persist_collection(writer, "nodestate", "node_states", &model.node_states, |s| {
        (s.node_name.clone(), graphql::node_state_envelope(s))
    })?;
    persist_collection(writer, "process", "processes", &model.processes, |p| {
        (p.name.clone(), graphql::process_envelope(p))
    })?;
    persist_collection(writer, "nodegroup", "node_groups", &model.groups.node_groups, |g| {
        (g.clone(), graphql::node_group_envelope(g))
    })?;
    persist_collection(
        writer,
        "processgroup",
        "process_groups",
        &model.groups.process_groups,
        |g| (g.clone(), graphql::process_group_envelope(g)),
    )?;
    persist_collection(
        writer,
        "node_membership",
        "node_memberships",
        &model.groups.node_memberships,
        |m| {
            (
                format!("{} {}", m.node_name, m.group_name),
                graphql::node_membership_envelope(m),
            )
        },
    )?;
    persist_collection(
        writer,
        "process_membership",
        "process_memberships",
        &model.groups.process_memberships,
        |m| {
            (
                format!("{} {}", m.process_name, m.group_name),
                graphql::process_membership_envelope(m),
            )
        },
    )?;
    persist_collection(writer, "topology", "topologies", &model.topologies, |t| {
        (
            format!("{} {}", t.process_name, topology_node(t)),
            graphql::topology_envelope(t),
        )
    })?;
    persist_collection(writer, "market", "markets", &model.markets, |m| {
        (m.name.clone(), graphql::market_envelope(m))
    })?;
    persist_collection(writer, "risk", "risks", &model.risks, |r| {
        (r.parameter.clone(), graphql::risk_envelope(r))
    })?;

    Ok(())
}

fn persist_collection<T>(
    writer: &mut BatchWriter,
    prefix: &str,
    type_plural: &str,
    items: &[T],
    build: impl Fn(&T) -> (String, Result<Envelope>),
) -> Result<()> {
    let mut all = Vec::with_capacity(items.len());
    for item in items {
        let (name, envelope) = build(item);
        let envelope =
            envelope.with_context(|| format!("failed to assemble {} {}", prefix, name))?;
        writer.write_item(prefix, &name, &envelope)?;
        all.push(envelope);
    }
    if !all.is_empty() {
        writer.write_collection(type_plural, &all)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Write the minimal mandatory sheets plus whatever extras a test needs.
    fn write_sheets(csv_dir: &std::path::Path, extra: &[(&str, &str)]) {
        fs::write(
            csv_dir.join("setup.csv"),
            "parameter,value\nuse_reserves,1\n",
        )
        .unwrap();
        fs::write(
            csv_dir.join("nodes.csv"),
            "node,is_commodity,is_res,is_market,is_state\ntank1,0,0,0,0\n",
        )
        .unwrap();
        fs::write(
            csv_dir.join("processes.csv"),
            "process,is_cf_fix,is_online,is_res,conversion,eff,load_min,load_max,start_cost,\
min_online,min_offline,max_online,max_offline,initial_state,scenario_independent_online\n\
p1,0,0,0,1,1,0,1,0,0,0,0,0,0,0\n",
        )
        .unwrap();
        for (name, content) in extra {
            fs::write(csv_dir.join(format!("{}.csv", name)), content).unwrap();
        }
    }

    fn dirs_for(tmp: &tempfile::TempDir) -> workbook::OutputDirs {
        workbook::create_folder_structure(tmp.path()).unwrap()
    }

    #[test]
    fn test_end_to_end_node_inflow_constant() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(
            &dirs.csv,
            &[("inflow", "t,\"tank1,ALL\"\n1,1.0\n2,1.0\n3,1.0\n")],
        );

        let model = parse_model(&dirs).unwrap();

        let node = &model.nodes[0];
        let json = serde_json::to_value(node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "tank1",
                "isCommodity": false,
                "isMarket": false,
                "isRes": false,
                "cost": [],
                "inflow": [{"scenario": null, "constant": 1.0}],
            })
        );
    }

    #[test]
    fn test_end_to_end_sink_topology() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(
            &dirs.csv,
            &[(
                "process_topology",
                "process,source_sink,node,capacity,vom_cost,ramp_up,ramp_down,initial_load,initial_flow\n\
p1,sink,n1,10,,,,,\n",
            )],
        );

        let model = parse_model(&dirs).unwrap();

        assert_eq!(model.topologies.len(), 1);
        let json = serde_json::to_value(&model.topologies[0]).unwrap();
        assert_eq!(json["processName"], "p1");
        assert_eq!(json["sourceNodeName"], serde_json::Value::Null);
        assert_eq!(json["sinkNodeName"], "n1");
        assert_eq!(json["topology"]["capacity"], 10.0);
    }

    #[test]
    fn test_end_to_end_market_fallbacks() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(
            &dirs.csv,
            &[(
                "markets",
                "market,market_type,node,processgroup,direction,realisation,reserve_type,\
is_bid,is_limited,min_bid,max_bid,fee\n\
fcr,reserve,n1,pg,bogus,,,1,0,0,1,0\n",
            )],
        );

        let model = parse_model(&dirs).unwrap();

        let json = serde_json::to_value(&model.markets[0]).unwrap();
        assert_eq!(json["mType"], "RESERVE");
        assert_eq!(json["direction"], serde_json::Value::Null);
    }

    #[test]
    fn test_rerun_produces_byte_identical_envelopes() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(
            &dirs.csv,
            &[
                ("inflow", "t,\"tank1,ALL\"\n1,1.0\n2,2.0\n"),
                ("groups", "group_type,entity,group\nnode,tank1,storage\n"),
            ],
        );

        let model = parse_model(&dirs).unwrap();
        let mut writer = BatchWriter::new(&dirs.graphql);
        persist_plan(&model, &mut writer).unwrap();
        let first = fs::read_to_string(dirs.graphql.join("nodes_all.json")).unwrap();

        let model = parse_model(&dirs).unwrap();
        let mut writer = BatchWriter::new(&dirs.graphql);
        persist_plan(&model, &mut writer).unwrap();
        let second = fs::read_to_string(dirs.graphql.join("nodes_all.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_dispatches_groups_before_memberships_and_entities_before_topologies() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(
            &dirs.csv,
            &[
                (
                    "groups",
                    "group_type,entity,group\nnode,tank1,storage\nprocess,p1,plants\n",
                ),
                (
                    "process_topology",
                    "process,source_sink,node,capacity,vom_cost,ramp_up,ramp_down,initial_load,initial_flow\n\
p1,source,tank1,5,,,,,\n",
                ),
            ],
        );

        let model = parse_model(&dirs).unwrap();
        let plan = assemble_plan(&model).unwrap();

        let stages: Vec<Stage> = plan.items().map(|(s, _)| s).collect();
        let position = |stage: Stage| stages.iter().position(|s| *s == stage).unwrap();

        assert!(position(Stage::NodeGroups) < position(Stage::NodeMemberships));
        assert!(position(Stage::ProcessGroups) < position(Stage::ProcessMemberships));
        assert!(position(Stage::Nodes) < position(Stage::Topologies));
        assert!(position(Stage::Processes) < position(Stage::Topologies));
    }

    #[test]
    fn test_missing_mandatory_sheet_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        // nodes.csv intentionally absent
        fs::write(
            dirs.csv.join("setup.csv"),
            "parameter,value\nuse_reserves,1\n",
        )
        .unwrap();

        assert!(parse_model(&dirs).is_err());
    }

    #[test]
    fn test_persisted_file_set() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_for(&tmp);
        write_sheets(&dirs.csv, &[("risk", "parameter,value\nalfa,0.1\n")]);

        let model = parse_model(&dirs).unwrap();
        let mut writer = BatchWriter::new(&dirs.graphql);
        persist_plan(&model, &mut writer).unwrap();

        for file in [
            "inputdatasetup.json",
            "node_tank1.json",
            "nodes_all.json",
            "process_p1.json",
            "processes_all.json",
            "risk_alfa.json",
            "risks_all.json",
        ] {
            assert!(dirs.graphql.join(file).is_file(), "missing {}", file);
        }
        // empty collections write no combined file
        assert!(!dirs.graphql.join("markets_all.json").exists());
    }
}
