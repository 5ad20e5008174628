//! Common types shared by the ZHVI ingestion pipeline and the lookup API.

pub mod error;
pub mod region;
pub mod series;

pub use error::{ZhviError, ZhviResult};
pub use region::{RegionKey, REGION_KEY_LEN};
pub use series::{CellValue, RegionEntry, RegionMetadata, SeriesSummary, TimeSeriesRecord};
