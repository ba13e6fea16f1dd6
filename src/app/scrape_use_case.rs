use std::io::Write;
use tracing::{info, instrument, warn};

use crate::app::ports::{ChartSurface, PageFetcher, TableSink, TableSource};
use crate::constants::{stored_message, TABLE_NOT_FOUND_MESSAGE};
use crate::error::Result;
use crate::pipeline::{process_markup, ranked_chart};
use crate::types::CleanedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Stored { rows: usize },
    TableNotFound,
}

/// One full scrape: fetch, locate, clean, persist, chart.
pub struct ScrapeUseCase {
    fetcher: Box<dyn PageFetcher>,
    url: String,
    table_name: String,
    /// How the store is named in the success message.
    store_label: String,
}

impl ScrapeUseCase {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        url: impl Into<String>,
        table_name: impl Into<String>,
        store_label: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            url: url.into(),
            table_name: table_name.into(),
            store_label: store_label.into(),
        }
    }

    /// Fetch the page and produce the cleaned table.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn scrape(&self) -> Result<CleanedTable> {
        let markup = self.fetcher.fetch(&self.url).await?;
        let table = process_markup(&markup)?;
        info!(rows = table.len(), columns = table.columns.len(), "Cleaned table");
        Ok(table)
    }

    /// Run the pipeline once.
    ///
    /// The store is only opened once a table has been found, and it is
    /// closed before the chart is drawn. A missing table is reported on
    /// `console` and ends the run without error; every other failure is
    /// returned.
    pub async fn run<S, F>(
        &self,
        open_store: F,
        surface: &mut dyn ChartSurface,
        console: &mut dyn Write,
    ) -> Result<RunOutcome>
    where
        S: TableSink,
        F: FnOnce() -> Result<S>,
    {
        let table = match self.scrape().await {
            Ok(table) => table,
            Err(e) if e.is_table_not_found() => {
                warn!("{}", e);
                writeln!(console, "{}", TABLE_NOT_FOUND_MESSAGE)?;
                return Ok(RunOutcome::TableNotFound);
            }
            Err(e) => return Err(e),
        };

        let mut store = open_store()?;
        let rows = store.replace_table(&self.table_name, &table)?;
        store.close()?;
        writeln!(console, "{}", stored_message(&self.store_label))?;

        surface.draw_bar_chart(&ranked_chart(&table))?;
        Ok(RunOutcome::Stored { rows })
    }
}

/// Draw the chart from a previously stored table, without fetching.
pub fn chart_from_store(
    source: &dyn TableSource,
    table_name: &str,
    surface: &mut dyn ChartSurface,
) -> Result<usize> {
    let table = source.load_table(table_name)?;
    let chart = ranked_chart(&table);
    surface.draw_bar_chart(&chart)?;
    Ok(chart.bars.len())
}
