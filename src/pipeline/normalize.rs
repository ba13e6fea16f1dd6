//! Cell cleaning and the positional row filter.
//!
//! Every cell goes through the same permissive rule: footnote markers,
//! currency symbols, separators and other punctuation are removed, then
//! every literal `B` (the "billions" suffix) is deleted, wherever it occurs.
//! The result is trimmed and an empty string becomes the missing marker.
//! Values stay text; nothing here parses numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::constants::{LABEL_COLUMN, METRIC_COLUMN};
use crate::error::{Result, ScraperError};
use crate::types::{CellValue, CleanedRow, CleanedTable, RawTable};

/// Bracketed annotations such as `[12]`, `[a]` or `[note 1]`.
static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]]*\]").expect("footnote pattern should compile"));

/// Anything that is not a digit, a period, a word character or whitespace.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d\.\w\s]").expect("character filter should compile"));

const UNIT_SUFFIX: char = 'B';

/// Clean a single raw value. Total: every input yields text or `Missing`.
pub fn clean_value<V: Display>(value: Option<V>) -> CellValue {
    match value {
        None => CellValue::Missing,
        Some(v) => clean_cell(&v.to_string()),
    }
}

pub fn clean_cell(raw: &str) -> CellValue {
    let without_notes = FOOTNOTE.replace_all(raw, "");
    let filtered = DISALLOWED.replace_all(&without_notes, "");
    let stripped = filtered.replace(UNIT_SUFFIX, "");
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

/// Keep only rows with a value at `column`.
fn retain_present(rows: Vec<CleanedRow>, column: usize) -> Vec<CleanedRow> {
    rows.into_iter()
        .filter(|row| !row.cell(column).is_missing())
        .collect()
}

/// Clean every cell of `raw` and drop rows lacking a label or metric.
///
/// Rows shorter than the header are padded with `Missing`. Rows longer than
/// the header have no column to put the extra cells in and are skipped.
pub fn normalize_table(raw: &RawTable) -> Result<CleanedTable> {
    let width = raw.columns.len();
    let required = LABEL_COLUMN.max(METRIC_COLUMN);
    if width <= required {
        return Err(ScraperError::MissingColumn {
            index: required,
            columns: width,
        });
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (index, cells) in raw.rows.iter().enumerate() {
        if cells.len() > width {
            warn!(
                row = index,
                cells = cells.len(),
                columns = width,
                "Skipping row with more cells than header columns"
            );
            continue;
        }

        let mut cleaned: Vec<CellValue> = cells.iter().map(|c| clean_cell(c)).collect();
        cleaned.resize(width, CellValue::Missing);
        rows.push(CleanedRow {
            index,
            cells: cleaned,
        });
    }

    let before = rows.len();
    let rows = retain_present(rows, LABEL_COLUMN);
    let rows = retain_present(rows, METRIC_COLUMN);
    // Re-check on the metric column; a no-op once the first pass ran.
    let rows = retain_present(rows, METRIC_COLUMN);

    debug!(kept = rows.len(), dropped = before - rows.len(), "Normalized table");

    Ok(CleanedTable {
        columns: raw.columns.clone(),
        rows,
    })
}
