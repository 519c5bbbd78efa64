//! Workbook to CSV conversion and output layout
//!
//! The importer never parses the workbook directly: each sheet is first
//! flattened into `output/csv/<sheet>.csv` and everything downstream reads
//! those. Keeping the intermediate files around makes a failed run easy to
//! inspect.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};

/// The output directories of one run.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub output: PathBuf,
    pub csv: PathBuf,
    pub graphql: PathBuf,
}

impl OutputDirs {
    /// Path of a converted sheet file.
    pub fn sheet(&self, name: &str) -> PathBuf {
        self.csv.join(format!("{}.csv", name))
    }
}

/// Create `output/csv` and `output/graphql` under the base directory.
pub fn create_folder_structure(base_dir: &Path) -> Result<OutputDirs> {
    let output = base_dir.join("output");
    let csv = output.join("csv");
    let graphql = output.join("graphql");

    fs::create_dir_all(&csv)
        .with_context(|| format!("failed to create {}", csv.display()))?;
    fs::create_dir_all(&graphql)
        .with_context(|| format!("failed to create {}", graphql.display()))?;

    Ok(OutputDirs {
        output,
        csv,
        graphql,
    })
}

/// Convert every sheet of the workbook into a CSV file under `csv_dir`.
pub fn excel_to_csv(workbook_path: &Path, csv_dir: &Path) -> Result<()> {
    log::info!("reading workbook {}", workbook_path.display());
    let mut workbook = open_workbook_auto(workbook_path)
        .with_context(|| format!("failed to open workbook {}", workbook_path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet '{}'", sheet_name))?;

        let csv_path = csv_dir.join(format!("{}.csv", sanitize_sheet_name(&sheet_name)));
        let mut writer = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("failed to create {}", csv_path.display()))?;

        for row in range.rows() {
            let record: Vec<String> = row.iter().map(cell_to_string).collect();
            writer
                .write_record(&record)
                .with_context(|| format!("failed to write row to {}", csv_path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", csv_path.display()))?;

        log::info!("converted sheet '{}' to {}", sheet_name, csv_path.display());
    }

    Ok(())
}

/// File-safe sheet name: strip everything but alphanumerics, spaces,
/// underscores and hyphens, trim the tail, fall back to `sheet`.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let trimmed = cleaned.trim_end();
    if trimmed.is_empty() {
        "sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render a workbook cell the way the sheet displays it. Whole-number
/// floats lose their trailing `.0` so downstream integer-style cells stay
/// integer-style.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
