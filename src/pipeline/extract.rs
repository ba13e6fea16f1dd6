use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::types::{ColumnNames, RawTable};

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector should parse"));
static HEADER_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("header cell selector should parse"));
static ANY_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("cell selector should parse"));

/// All descendant text of an element, trimmed.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Read the header row and up to `window` data rows from a located table.
///
/// The first `<tr>` supplies the column names from its `<th>` cells. The
/// following rows contribute every `<td>`/`<th>` cell in document order.
/// Cell counts are not checked here.
pub fn extract_rows(table: ElementRef<'_>, window: usize) -> RawTable {
    let mut rows = table.select(&ROW);

    let columns = rows
        .next()
        .map(|header| header.select(&HEADER_CELL).map(text_of).collect())
        .unwrap_or_default();

    let data: Vec<Vec<String>> = rows
        .take(window)
        .map(|row| row.select(&ANY_CELL).map(text_of).collect())
        .collect();

    debug!(rows = data.len(), "Extracted raw rows");

    RawTable {
        columns: ColumnNames::new(columns),
        rows: data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::locate::locate_table;
    use scraper::Html;

    fn table_html(data_rows: usize) -> String {
        let mut html = String::from(
            r#"<table class="wikitable"><tr><th> Rank </th><th>Song</th><th>Artist</th><th>Streams</th></tr>"#,
        );
        for i in 1..=data_rows {
            html.push_str(&format!(
                "<tr><th>{i}</th><td>Song {i}</td><td>Artist {i}</td><td>{i}.0</td></tr>"
            ));
        }
        html.push_str("</table>");
        html
    }

    #[test]
    fn test_header_cells_are_trimmed() {
        let doc = Html::parse_document(&table_html(1));
        let raw = extract_rows(locate_table(&doc).unwrap(), 25);

        let columns: Vec<&str> = raw.columns.iter().collect();
        assert_eq!(columns, vec!["Rank", "Song", "Artist", "Streams"]);
    }

    #[test]
    fn test_row_cells_include_th_in_document_order() {
        let doc = Html::parse_document(&table_html(2));
        let raw = extract_rows(locate_table(&doc).unwrap(), 25);

        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1], vec!["2", "Song 2", "Artist 2", "2.0"]);
    }

    #[test]
    fn test_window_bounds_data_rows() {
        let doc = Html::parse_document(&table_html(40));
        let raw = extract_rows(locate_table(&doc).unwrap(), 25);

        assert_eq!(raw.rows.len(), 25);
        assert_eq!(raw.rows[0][0], "1");
        assert_eq!(raw.rows[24][0], "25");
    }

    #[test]
    fn test_nested_markup_text_is_concatenated() {
        let doc = Html::parse_document(
            r#"<table class="wikitable">
                <tr><th>Rank</th><th>Song</th></tr>
                <tr><td>1</td><td>"<a href="/wiki/x">Blinding Lights</a>"<sup>[12]</sup>
                </td></tr>
            </table>"#,
        );
        let raw = extract_rows(locate_table(&doc).unwrap(), 25);

        assert_eq!(raw.rows[0][1], "\"Blinding Lights\"[12]");
    }

    #[test]
    fn test_table_without_rows_is_empty() {
        let doc = Html::parse_document(r#"<table class="wikitable"></table>"#);
        let raw = extract_rows(locate_table(&doc).unwrap(), 25);

        assert!(raw.columns.is_empty());
        assert!(raw.rows.is_empty());
    }
}
