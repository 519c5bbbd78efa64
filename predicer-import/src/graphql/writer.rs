//! Persist assembled envelopes to the output directory
//!
//! Every collection is written twice: one file per item
//! (`<prefix>_<sanitizedName>.json`) and one combined
//! `<typePlural>_all.json` holding the envelopes as a JSON array.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{Envelope, sanitize_name};

/// Writes envelopes under `output/graphql/`.
#[derive(Debug)]
pub struct BatchWriter {
    dir: PathBuf,
    files_written: usize,
}

impl BatchWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            files_written: 0,
        }
    }

    /// Number of files written so far.
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Write a standalone envelope, e.g. `inputdatasetup.json`.
    pub fn write_single(&mut self, file_stem: &str, envelope: &Envelope) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.json", file_stem));
        self.write_json(&path, &envelope.to_pretty_json()?)?;
        Ok(path)
    }

    /// Write one item of a collection as `<prefix>_<sanitizedName>.json`.
    pub fn write_item(&mut self, prefix: &str, name: &str, envelope: &Envelope) -> Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{}_{}.json", prefix, sanitize_name(name)));
        self.write_json(&path, &envelope.to_pretty_json()?)?;
        Ok(path)
    }

    /// Write a whole collection as `<typePlural>_all.json`.
    pub fn write_collection(
        &mut self,
        type_plural: &str,
        envelopes: &[Envelope],
    ) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}_all.json", type_plural));
        let body =
            serde_json::to_string_pretty(envelopes).context("failed to serialize collection")?;
        self.write_json(&path, &body)?;
        Ok(path)
    }

    fn write_json(&mut self, path: &Path, body: &str) -> Result<()> {
        fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
        self.files_written += 1;
        log::debug!("saved payload {}", path.display());
        Ok(())
    }
}
