//! Run configuration for the importer
//!
//! One explicit value passed into the pipeline entry point; nothing is
//! read from ambient state once the run starts.

use std::path::PathBuf;
use std::time::Duration;

/// Default endpoint when neither the flag nor the environment supplies one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/graphql";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// The model workbook to import.
    pub workbook: PathBuf,
    /// Base directory the `output/` tree is created under.
    pub base_dir: PathBuf,
    /// GraphQL endpoint for the dispatch phase.
    pub endpoint: String,
    /// Optional bearer credential sent as an Authorization header.
    pub bearer_token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// When false, envelopes are only persisted, never submitted.
    pub submit: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
