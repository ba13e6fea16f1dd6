pub mod chart;
pub mod extract;
pub mod locate;
pub mod normalize;

pub use chart::ranked_chart;
pub use extract::extract_rows;
pub use locate::locate_table;
pub use normalize::{clean_cell, clean_value, normalize_table};

use scraper::Html;

use crate::constants::ROW_WINDOW;
use crate::error::Result;
use crate::types::CleanedTable;

/// Parse `markup`, locate the marked table and clean its first data rows.
pub fn process_markup(markup: &str) -> Result<CleanedTable> {
    let document = Html::parse_document(markup);
    let table = locate_table(&document)?;
    let raw = extract_rows(table, ROW_WINDOW);
    normalize_table(&raw)
}
