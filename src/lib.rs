//! Scrape one StatsWales dataset into a packaged tabular output: a
//! deduplicated observation CSV, per-dimension code lists, CSVW schema
//! sidecars, and a TriG dataset-metadata document.

pub mod fetch;
pub mod metadata;
pub mod reshape;
pub mod schema;
pub mod table;

pub use table::Table;
