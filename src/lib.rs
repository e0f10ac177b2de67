// Price List Analyzer - Core Library
// Ingestion, search and export, shared by the console and TUI front ends

pub mod error;
pub mod headers;
pub mod normalizer;
pub mod catalog;
pub mod ingest;
pub mod export;
pub mod shell;
pub mod config;

// Re-export commonly used types
pub use error::PriceError;
pub use headers::{resolve, Field, HeaderMap, SynonymTable};
pub use normalizer::{normalize_row, unit_price, Record, RecordNormalizer};
pub use catalog::{Catalog, SourceSummary};
pub use ingest::{
    ingest, FileBatch, FileOutcome, IngestConfig, IngestReport, Ingestor, RowIssue,
};
pub use export::{export_html, render_html, DEFAULT_OUTPUT};
pub use shell::{parse_query, Query, Shell};
pub use config::{Mode, Settings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
