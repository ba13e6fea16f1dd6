use std::fmt;

/// Header labels of a scraped table, in page order.
///
/// Position is what matters downstream: the label and metric columns are
/// picked by index, so the names are only carried through to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames(Vec<String>);

impl ColumnNames {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Text as extracted from the located table, before any cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub columns: ColumnNames,
    /// Data rows only; the header row lives in `columns`.
    pub rows: Vec<Vec<String>>,
}

/// A cleaned cell: a non-empty string, or the missing marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => CellValue::Text(s),
            None => CellValue::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => f.write_str(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRow {
    /// Position of the row within the extracted data window.
    pub index: usize,
    pub cells: Vec<CellValue>,
}

impl CleanedRow {
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Missing)
    }
}

/// Terminal artifact of the pipeline: persisted and charted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedTable {
    pub columns: ColumnNames,
    pub rows: Vec<CleanedRow>,
}

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows in table order.
    pub fn head(&self, n: usize) -> &[CleanedRow] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// One bar of the ranked chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    /// Metric exactly as stored.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Top to bottom.
    pub bars: Vec<ChartBar>,
}
