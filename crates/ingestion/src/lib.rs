//! ZHVI ingestion library.
//!
//! Downloads the ZIP-level home value index CSV, decodes it row by row and
//! publishes a region → time series map for the lookup API.
//!
//! # Architecture
//!
//! - [`Fetcher`]: streaming HTTP GET of the source export
//! - [`RecordParser`]: header classification and per-column coercion
//! - [`CacheBuilder`]: row filtering and map construction
//! - [`LookupStore`]: the published map, swapped atomically on each pass
//! - [`Ingester`]: wires the above together and reports an
//!   [`IngestionOutcome`]

pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingester;
pub mod parser;
pub mod store;

// Re-exports
pub use builder::{BuildStats, CacheBuilder, RowDisposition, Snapshot};
pub use config::{IngestConfig, DEFAULT_SOURCE_URL};
pub use error::{IngestionError, Result};
pub use fetch::{ByteStream, Fetcher};
pub use ingester::{build_from_reader, Ingester, IngestionOutcome};
pub use parser::{coerce_date_cell, is_date_column, ColumnKind, HeaderLayout, RecordParser, RegionRow};
pub use store::LookupStore;
