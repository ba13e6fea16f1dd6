pub mod http_client;
pub mod sqlite_store;
pub mod text_chart;

pub use http_client::ReqwestFetcher;
pub use sqlite_store::SqliteStore;
pub use text_chart::TextBarChart;
