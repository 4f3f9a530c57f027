//! Output module for exporting the harvested tables
//!
//! The exporters consume the finished tables read-only; the crawl itself
//! never depends on them.

mod csv_export;

pub use csv_export::{write_tables, CODES_FILE, DOSES_FILE};
