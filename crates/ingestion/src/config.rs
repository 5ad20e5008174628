//! Ingestion configuration.

use std::time::Duration;

/// ZHVI middle tier, single-family and condo, smoothed and seasonally
/// adjusted, monthly, by ZIP code.
pub const DEFAULT_SOURCE_URL: &str = "https://files.zillowstatic.com/research/public_csvs/zhvi/Zip_zhvi_uc_sfrcondo_tier_0.33_0.67_sm_sa_month.csv";

/// Settings for one ingestion source.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// CSV export to download
    pub source_url: String,
    /// TCP connect timeout. The transfer itself is not bounded.
    pub connect_timeout: Duration,
    /// User-Agent sent with the download request
    pub user_agent: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            user_agent: concat!("zhvi-lookup/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl IngestConfig {
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }
}
