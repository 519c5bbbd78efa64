//! Flat tabular sources produced from the workbook
//!
//! A [`Sheet`] is an ordered sequence of row records with named columns,
//! loaded from one of the per-sheet CSV files the workbook conversion
//! writes. Parsers look cells up by column name; row order is the time /
//! submission order everywhere downstream.

use std::path::Path;

use anyhow::{Context, Result};

/// One loaded tabular source.
#[derive(Debug, Clone)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet from in-memory data. Mostly useful in tests.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Load a sheet from a CSV file. The first record is the header row.
    ///
    /// An existing but completely empty file yields a sheet with no headers
    /// and no rows; a missing file is an error, so callers keep their own
    /// missing-file policy.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("failed to read header row of {}", path.display()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("failed to read row in {}", path.display()))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// True when the sheet has no data rows (a header alone still counts as
    /// empty).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { sheet: self, cells })
    }

    /// Cell at (row, column index), empty string when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.as_str())
            .unwrap_or("")
    }
}

/// A single row with access to cells by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    sheet: &'a Sheet,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell under the named column. `None` when the sheet has no such
    /// column; an empty string when the column exists but the row is short.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.sheet.column_index(column)?;
        Some(self.cells.get(idx).map(|c| c.as_str()).unwrap_or(""))
    }
}
