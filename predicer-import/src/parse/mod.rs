//! Sheet parsers: tabular rows into typed input records
//!
//! One submodule per workbook sheet plus the shared cell coercions, the
//! wide time-series decoder and the enrichment join. Shared row contract:
//! a row with a blank primary name is silently skipped; a missing required
//! column is fatal for mandatory sheets and a warned empty result for
//! optional ones.

pub mod enrich;
pub mod groups;
pub mod markets;
pub mod nodes;
pub mod processes;
pub mod risk;
pub mod scenarios;
pub mod series;
pub mod setup;
pub mod topologies;
pub mod values;
