use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BarChartSpec, CleanedTable};

// Fetch-side port
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// One GET; a non-2xx response is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// Sink-side ports
pub trait TableSink {
    /// Drop whatever `name` held and store `table` in its place.
    /// Returns the number of rows written.
    fn replace_table(&mut self, name: &str, table: &CleanedTable) -> Result<usize>;

    /// Release the underlying handle, surfacing any close error.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

pub trait TableSource {
    fn load_table(&self, name: &str) -> Result<CleanedTable>;
}

pub trait ChartSurface {
    fn draw_bar_chart(&mut self, chart: &BarChartSpec) -> Result<()>;
}
