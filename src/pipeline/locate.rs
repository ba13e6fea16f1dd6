use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::constants::{TABLE_MARKER_CLASS, TABLE_TAG};
use crate::error::{Result, ScraperError};

static MARKED_TABLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("{}.{}", TABLE_TAG, TABLE_MARKER_CLASS))
        .expect("marked table selector should parse")
});

/// Find the first `<table class="wikitable">` in document order.
///
/// Later matches are ignored.
pub fn locate_table(document: &Html) -> Result<ElementRef<'_>> {
    match document.select(&MARKED_TABLE).next() {
        Some(table) => {
            debug!("Found marked table");
            Ok(table)
        }
        None => Err(ScraperError::TableNotFound {
            tag: TABLE_TAG.to_string(),
            class: TABLE_MARKER_CLASS.to_string(),
        }),
    }
}
