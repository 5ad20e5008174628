//! Application state and shared resources.

use chrono::{DateTime, Utc};
use ingestion::{IngestionOutcome, LookupStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tokio::sync::RwLock;

/// Result of the most recent ingestion pass, stamped with when it ended.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub finished_at: DateTime<Utc>,
    pub outcome: IngestionOutcome,
}

/// Lifecycle of the lookup data as reported by `/api/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataState {
    Loading,
    Ready,
    Failed,
}

/// Shared application state.
pub struct AppState {
    pub store: LookupStore,
    pub source_url: String,
    pub prometheus: Option<PrometheusHandle>,
    pub started_at: DateTime<Utc>,
    last_run: RwLock<Option<IngestionReport>>,
}

impl AppState {
    pub fn new(store: LookupStore, source_url: impl Into<String>) -> Self {
        Self {
            store,
            source_url: source_url.into(),
            prometheus: None,
            started_at: Utc::now(),
            last_run: RwLock::new(None),
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub async fn record_outcome(&self, outcome: IngestionOutcome) {
        *self.last_run.write().await = Some(IngestionReport {
            finished_at: Utc::now(),
            outcome,
        });
    }

    pub async fn last_run(&self) -> Option<IngestionReport> {
        self.last_run.read().await.clone()
    }

    pub async fn data_state(&self) -> DataState {
        match self.last_run.read().await.as_ref() {
            None => DataState::Loading,
            Some(report) if report.outcome.is_loaded() => DataState::Ready,
            Some(_) => DataState::Failed,
        }
    }
}
