//! Runs one download, parse and publish pass.

use std::io::Read;
use std::time::Instant;

use metrics::{counter, gauge};
use serde::Serialize;
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::{debug, error, info, instrument, warn};

use crate::builder::{BuildStats, CacheBuilder};
use crate::config::IngestConfig;
use crate::error::{IngestionError, Result};
use crate::fetch::Fetcher;
use crate::parser::RecordParser;
use crate::store::LookupStore;

/// Parse errors past this count are logged at debug level only.
const MAX_LOGGED_PARSE_ERRORS: u64 = 20;

/// How an ingestion pass ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IngestionOutcome {
    /// The store now holds the new map.
    Loaded {
        regions: usize,
        stats: BuildStats,
        elapsed_ms: u64,
    },
    /// Nothing was published; the store still holds whatever it had before.
    Failed {
        reason: String,
        status: Option<u16>,
        stats: BuildStats,
        elapsed_ms: u64,
    },
}

impl IngestionOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, IngestionOutcome::Loaded { .. })
    }

    pub fn stats(&self) -> &BuildStats {
        match self {
            IngestionOutcome::Loaded { stats, .. } | IngestionOutcome::Failed { stats, .. } => {
                stats
            }
        }
    }

    fn failed(err: &IngestionError, stats: BuildStats, started: Instant) -> Self {
        IngestionOutcome::Failed {
            reason: err.to_string(),
            status: err.status(),
            stats,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Drive `parser` to the end, folding rows into a fresh builder.
///
/// Returns the builder together with the error that stopped the pass early,
/// if any. Row-level parse errors are counted and logged, not returned.
pub fn build_from_parser<R: Read>(
    parser: RecordParser<R>,
) -> (CacheBuilder, Option<IngestionError>) {
    let mut builder = CacheBuilder::new();

    for row in parser {
        match row {
            Ok(row) => {
                builder.push(row);
            }
            Err(err) if err.is_fatal() => return (builder, Some(err)),
            Err(err) => {
                builder.record_parse_error();
                if builder.stats().parse_errors <= MAX_LOGGED_PARSE_ERRORS {
                    warn!(error = %err, "Skipping malformed CSV row");
                } else {
                    debug!(error = %err, "Skipping malformed CSV row");
                }
            }
        }
    }

    (builder, None)
}

/// Parse everything `reader` yields into a builder.
pub fn build_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> (CacheBuilder, Option<IngestionError>) {
    match RecordParser::new(reader, source) {
        Ok(parser) => {
            debug!(date_columns = parser.layout().date_columns(), "Parsed CSV header");
            build_from_parser(parser)
        }
        Err(err) => (CacheBuilder::new(), Some(err)),
    }
}

/// Fetches the source CSV and publishes the parsed map to a [`LookupStore`].
pub struct Ingester {
    fetcher: Fetcher,
    store: LookupStore,
}

impl Ingester {
    pub fn new(config: &IngestConfig, store: LookupStore) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            store,
        })
    }

    pub fn store(&self) -> &LookupStore {
        &self.store
    }

    pub fn source_url(&self) -> &str {
        self.fetcher.url()
    }

    /// Download, parse and publish.
    ///
    /// The body is parsed on the blocking pool while it streams in. Any
    /// transfer failure leaves the store as it was.
    #[instrument(skip(self), fields(url = %self.fetcher.url()))]
    pub async fn run(&self) -> IngestionOutcome {
        let started = Instant::now();
        info!("Starting ingestion");

        let stream = match self.fetcher.fetch().await {
            Ok(stream) => stream,
            Err(err) => {
                error!(error = %err, "Download failed");
                return self.record(IngestionOutcome::failed(&err, BuildStats::default(), started));
            }
        };

        let reader = SyncIoBridge::new(StreamReader::new(stream));
        self.ingest_blocking(reader, started).await
    }

    /// Ingest from an already open reader, e.g. a local copy of the export.
    pub async fn ingest_reader<R>(&self, reader: R) -> IngestionOutcome
    where
        R: Read + Send + 'static,
    {
        self.ingest_blocking(reader, Instant::now()).await
    }

    async fn ingest_blocking<R>(&self, reader: R, started: Instant) -> IngestionOutcome
    where
        R: Read + Send + 'static,
    {
        let source = self.fetcher.url().to_string();
        let joined =
            tokio::task::spawn_blocking(move || build_from_reader(reader, &source)).await;

        let outcome = match joined {
            Ok((builder, None)) => {
                let (snapshot, stats) = builder.finish();
                let regions = snapshot.len();
                let previous = self.store.replace(snapshot).await;
                info!(
                    rows = stats.rows_seen,
                    regions,
                    previous_regions = previous,
                    replaced = stats.replaced,
                    skipped = stats.skipped(),
                    parse_errors = stats.parse_errors,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Ingestion complete"
                );
                IngestionOutcome::Loaded {
                    regions,
                    stats,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                }
            }
            Ok((builder, Some(err))) => {
                let stats = builder.stats().clone();
                error!(
                    error = %err,
                    rows = stats.rows_seen,
                    "Ingestion aborted, keeping previous data"
                );
                IngestionOutcome::failed(&err, stats, started)
            }
            Err(join_err) => {
                let err = IngestionError::Task(join_err.to_string());
                error!(error = %err, "Ingestion task panicked");
                IngestionOutcome::failed(&err, BuildStats::default(), started)
            }
        };

        self.record(outcome)
    }

    fn record(&self, outcome: IngestionOutcome) -> IngestionOutcome {
        let stats = outcome.stats();
        counter!("zhvi_ingest_rows_total").increment(stats.rows_seen);
        counter!("zhvi_ingest_parse_errors_total").increment(stats.parse_errors);
        match &outcome {
            IngestionOutcome::Loaded { regions, .. } => {
                counter!("zhvi_ingest_runs_total", "outcome" => "loaded").increment(1);
                gauge!("zhvi_regions_loaded").set(*regions as f64);
            }
            IngestionOutcome::Failed { .. } => {
                counter!("zhvi_ingest_runs_total", "outcome" => "failed").increment(1);
            }
        }
        outcome
    }
}
