use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("No <{tag} class=\"{class}\"> element found on the page")]
    TableNotFound { tag: String, class: String },

    #[error("Table has {columns} columns but column index {index} is required")]
    MissingColumn { index: usize, columns: usize },

    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Database error: cannot prepare {}: {source}", path.display())]
    PersistencePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chart rendering failed: {0}")]
    Render(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// The one condition the run recovers from instead of failing.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, ScraperError::TableNotFound { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ScraperError::Persistence(_) | ScraperError::PersistencePath { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_plain_io_errors_are_not_render_errors() {
        let err: ScraperError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, ScraperError::Io(_)));
    }

    #[test]
    fn test_store_path_errors_count_as_persistence() {
        let err = ScraperError::PersistencePath {
            path: PathBuf::from("/nowhere/songs.db"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_persistence());
        assert!(err.to_string().starts_with("Database error"));
    }
}
