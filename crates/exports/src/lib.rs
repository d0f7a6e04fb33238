//! `ordermill-exports` — export records and CSV materialization.

pub mod csv;
pub mod export;

pub use export::{Export, ExportFile, ExportStatus};
