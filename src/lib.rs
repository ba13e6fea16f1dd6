pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Application layer (use cases and the ports they depend on)
pub mod app;
// Adapters for the ports: HTTP, SQLite, text chart
pub mod infra;
