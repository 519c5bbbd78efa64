//! GraphQL mutation envelopes for the model service
//!
//! An [`Envelope`] is the `{"query": ..., "variables": {...}}` wrapper that
//! gets persisted to disk and POSTed to the endpoint. One mutation text per
//! operation; every mutation selects `errors { field message }` so the
//! dispatcher can surface item-level failures.

pub mod assemble;
pub mod client;
pub mod writer;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

pub use assemble::*;
pub use client::{DispatchOutcome, GraphQlClient};
pub use writer::BatchWriter;

/// Fallback token for envelope file names when sanitizing leaves nothing.
const UNNAMED: &str = "unnamed";

/// An operation plus its variable set, ready to persist or submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub query: String,
    pub variables: Map<String, Value>,
}

impl Envelope {
    /// Wrap a record as the single variable of an operation:
    /// `variables: {<arg>: record}`.
    pub fn single(query: &str, arg: &str, record: &impl Serialize) -> Result<Self> {
        let mut variables = Map::new();
        variables.insert(
            arg.to_string(),
            serde_json::to_value(record).context("failed to serialize record")?,
        );
        Ok(Self {
            query: query.to_string(),
            variables,
        })
    }

    /// Use a record's own fields as the operation's variable set. The
    /// record must serialize to an object.
    pub fn from_record(query: &str, record: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(record).context("failed to serialize record")?;
        let variables = match value {
            Value::Object(map) => map,
            other => anyhow::bail!("expected an object for variables, got {}", other),
        };
        Ok(Self {
            query: query.to_string(),
            variables,
        })
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize envelope")
    }
}

/// Derive a file-safe token from an entity name: strip everything but
/// alphanumerics, spaces, underscores and hyphens, trim, then turn spaces
/// into underscores.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_single_shape() {
        #[derive(Serialize)]
        struct Rec {
            name: &'static str,
        }

        let envelope = Envelope::single("mutation { x }", "node", &Rec { name: "n1" }).unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["query"], "mutation { x }");
        assert_eq!(json["variables"]["node"]["name"], "n1");
    }

    #[test]
    fn test_envelope_from_record_spreads_fields() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Rel {
            node_name: &'static str,
            group_name: &'static str,
        }

        let envelope = Envelope::from_record(
            "mutation { y }",
            &Rel {
                node_name: "n1",
                group_name: "g1",
            },
        )
        .unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["variables"]["nodeName"], "n1");
        assert_eq!(json["variables"]["groupName"], "g1");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("dh_htf"), "dh_htf");
        assert_eq!(sanitize_name("solar collector #2"), "solar_collector_2");
        assert_eq!(sanitize_name("  spaced  "), "spaced");
        assert_eq!(sanitize_name("!!!"), "unnamed");
        assert_eq!(sanitize_name(""), "unnamed");
        assert_eq!(sanitize_name("a-b_c"), "a-b_c");
    }
}
