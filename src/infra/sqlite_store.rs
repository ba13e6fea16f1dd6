use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::path::Path;
use tracing::{debug, info};

use crate::app::ports::{TableSink, TableSource};
use crate::error::{Result, ScraperError};
use crate::types::{CellValue, CleanedRow, CleanedTable, ColumnNames};

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Text(s) => ToSqlOutput::from(s.as_str()),
            CellValue::Missing => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// Double-quote an identifier for SQLite, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite file holding the scraped table. The connection is closed when the
/// store is dropped; `close` does the same but reports failures.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ScraperError::PersistencePath {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self { conn })
    }

    /// Open an existing database for reading. Never creates the file.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "Opened SQLite store read-only");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }
}

impl TableSource for SqliteStore {
    /// Read a stored table back in insertion order. NULL becomes `Missing`.
    fn load_table(&self, name: &str) -> Result<CleanedTable> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_identifier(name)))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let cells = stmt.query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Option<String>>(i).map(CellValue::from))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;

        let mut rows = Vec::new();
        for (index, cells) in cells.enumerate() {
            rows.push(CleanedRow {
                index,
                cells: cells?,
            });
        }

        Ok(CleanedTable {
            columns: ColumnNames::new(columns),
            rows,
        })
    }
}

impl TableSink for SqliteStore {
    fn replace_table(&mut self, name: &str, table: &CleanedTable) -> Result<usize> {
        let table_ident = quote_identifier(name);
        let column_defs = table
            .columns
            .iter()
            .map(|c| format!("{} TEXT", quote_identifier(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=table.columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", table_ident), [])?;
        tx.execute(&format!("CREATE TABLE {} ({})", table_ident, column_defs), [])?;
        {
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({})",
                table_ident, placeholders
            ))?;
            for row in &table.rows {
                insert.execute(params_from_iter(row.cells.iter()))?;
            }
        }
        tx.commit()?;

        info!(table = name, rows = table.rows.len(), "Replaced table contents");
        Ok(table.rows.len())
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}
