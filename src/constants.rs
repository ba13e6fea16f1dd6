//! Fixed run parameters. Everything the pipeline needs to reproduce a run
//! lives here; `Config` defaults are built from these values.

// Source page
pub const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/List_of_Spotify_streaming_records";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

// Table discovery
pub const TABLE_TAG: &str = "table";
pub const TABLE_MARKER_CLASS: &str = "wikitable";

/// Data rows read after the header row (rows 1..=25).
pub const ROW_WINDOW: usize = 25;

// Positional column roles. These are fixed positions, never header names.
pub const LABEL_COLUMN: usize = 1;
pub const METRIC_COLUMN: usize = 3;

// Persistence
pub const DATABASE_PATH: &str = "spotify_data.db";
pub const TABLE_NAME: &str = "popular_songs";

// Chart
pub const CHART_TOP_N: usize = 10;
pub const CHART_TITLE: &str = "Top 10 Most Streamed Songs (in Billions)";
pub const CHART_X_LABEL: &str = "Total Streams";
pub const CHART_Y_LABEL: &str = "Song Name";

// Console messages
pub const TABLE_NOT_FOUND_MESSAGE: &str = "Could not find the table on the page.";

pub fn stored_message(database_path: &str) -> String {
    format!("Data cleaned and stored in {}", database_path)
}
