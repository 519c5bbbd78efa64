//! Dependency-ordered submission of assembled envelopes
//!
//! Later stages reference earlier stages by name: a membership needs its
//! group, a topology needs its node and process. The plan therefore runs
//! entity-type batches in a fixed order, item by item, and never reorders
//! within a batch. Per-item failures are reported and skipped; there is no
//! retry and no rollback, so a partially submitted model is an accepted
//! terminal outcome.

use crate::graphql::{Envelope, GraphQlClient};

/// One entity-type batch in the submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Setup,
    Scenarios,
    Nodes,
    NodeStates,
    Processes,
    NodeGroups,
    ProcessGroups,
    NodeMemberships,
    ProcessMemberships,
    Topologies,
    Markets,
    Risks,
}

impl Stage {
    /// Every stage, in required submission order.
    pub const ORDER: [Stage; 12] = [
        Stage::Setup,
        Stage::Scenarios,
        Stage::Nodes,
        Stage::NodeStates,
        Stage::Processes,
        Stage::NodeGroups,
        Stage::ProcessGroups,
        Stage::NodeMemberships,
        Stage::ProcessMemberships,
        Stage::Topologies,
        Stage::Markets,
        Stage::Risks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::Scenarios => "scenarios",
            Stage::Nodes => "nodes",
            Stage::NodeStates => "node states",
            Stage::Processes => "processes",
            Stage::NodeGroups => "node groups",
            Stage::ProcessGroups => "process groups",
            Stage::NodeMemberships => "node memberships",
            Stage::ProcessMemberships => "process memberships",
            Stage::Topologies => "topologies",
            Stage::Markets => "markets",
            Stage::Risks => "risks",
        }
    }
}

/// A labelled envelope queued for submission.
#[derive(Debug, Clone)]
pub struct DispatchItem {
    pub label: String,
    pub envelope: Envelope,
}

/// All batches, grouped per stage, iterated in [`Stage::ORDER`].
#[derive(Debug)]
pub struct DispatchPlan {
    batches: Vec<(Stage, Vec<DispatchItem>)>,
}

impl Default for DispatchPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchPlan {
    pub fn new() -> Self {
        Self {
            batches: Stage::ORDER.iter().map(|s| (*s, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, stage: Stage, label: impl Into<String>, envelope: Envelope) {
        let batch = self
            .batches
            .iter_mut()
            .find(|(s, _)| *s == stage)
            .expect("every stage is present in a new plan");
        batch.1.push(DispatchItem {
            label: label.into(),
            envelope,
        });
    }

    pub fn stages(&self) -> impl Iterator<Item = (Stage, &[DispatchItem])> {
        self.batches.iter().map(|(s, items)| (*s, items.as_slice()))
    }

    /// All items in submission order, ignoring stage boundaries.
    pub fn items(&self) -> impl Iterator<Item = (Stage, &DispatchItem)> {
        self.batches
            .iter()
            .flat_map(|(s, items)| items.iter().map(move |i| (*s, i)))
    }

    pub fn total_items(&self) -> usize {
        self.batches.iter().map(|(_, items)| items.len()).sum()
    }
}

/// Tally of a finished dispatch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub submitted: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.submitted - self.failed
    }
}

/// Submit every planned item in order, continuing past failures.
pub async fn dispatch_all(client: &GraphQlClient, plan: &DispatchPlan) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (stage, items) in plan.stages() {
        if items.is_empty() {
            continue;
        }
        log::info!(
            "submitting {} {} to {}",
            items.len(),
            stage.label(),
            client.endpoint()
        );

        for item in items {
            report.submitted += 1;
            match client.submit(&item.envelope).await {
                Ok(outcome) if outcome.is_success() => {
                    log::debug!("{} ({}) ok", item.label, stage.label());
                }
                Ok(outcome) => {
                    report.failed += 1;
                    if outcome.errors.is_empty() {
                        log::error!(
                            "{} ({}) failed with HTTP {}: {}",
                            item.label,
                            stage.label(),
                            outcome.status,
                            outcome.body
                        );
                    } else {
                        log::error!(
                            "{} ({}) rejected (HTTP {}): {}",
                            item.label,
                            stage.label(),
                            outcome.status,
                            outcome.errors.join("; ")
                        );
                    }
                }
                Err(err) => {
                    report.failed += 1;
                    log::error!("{} ({}) failed: {:#}", item.label, stage.label(), err);
                }
            }
        }
    }

    report
}
