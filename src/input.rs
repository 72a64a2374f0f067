//! CSV input: panels of integer labels, one row per subject.

use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

use plutus_chain::StateGrid;

/// Reads an N x T grid of integer labels from a headerless CSV file.
///
/// Row-length validation happens in [`StateGrid::from_rows`], so a ragged
/// file surfaces as a `ChainError::RaggedRows`.
pub fn read_grid(path: &Path) -> Result<StateGrid<i64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV: {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("failed to read CSV record at line {}", line + 1))?;
        let mut row = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let label: i64 = field.parse().with_context(|| {
                format!(
                    "invalid label '{field}' at line {}, column {}: expected an integer",
                    line + 1,
                    col + 1
                )
            })?;
            row.push(label);
        }
        rows.push(row);
    }

    StateGrid::from_rows(rows)
        .with_context(|| format!("inconsistent grid in {}", path.display()))
}
