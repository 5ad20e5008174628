//! REST API handlers for region lookups.
//!
//! Provides endpoints for:
//! - The time series of one ZIP code
//! - A range summary for one ZIP code
//! - The state of the last ingestion pass

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, instrument};
use zhvi_common::{RegionEntry, RegionKey, RegionMetadata, SeriesSummary, TimeSeriesRecord, ZhviError};

use super::common::ApiError;
use crate::state::{AppState, DataState, IngestionReport};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDataResponse {
    pub zip_code: RegionKey,
    pub data: TimeSeriesRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummaryResponse {
    pub zip_code: RegionKey,
    pub location: Option<String>,
    pub metadata: RegionMetadata,
    #[serde(flatten)]
    pub summary: SeriesSummary,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub state: DataState,
    pub regions: usize,
    pub source_url: String,
    pub started_at: DateTime<Utc>,
    pub last_run: Option<IngestionReport>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/data/:zipcode - Time series for one ZIP code
#[instrument(skip(state))]
pub async fn data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(zipcode): Path<String>,
) -> Result<Json<RegionDataResponse>, ApiError> {
    let (key, entry) = lookup(&state, &zipcode).await?;
    Ok(Json(RegionDataResponse {
        zip_code: key,
        data: entry.series,
    }))
}

/// GET /api/data/:zipcode/summary - First, last, min and max observation
#[instrument(skip(state))]
pub async fn summary_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(zipcode): Path<String>,
) -> Result<Json<RegionSummaryResponse>, ApiError> {
    let (key, entry) = lookup(&state, &zipcode).await?;
    Ok(Json(RegionSummaryResponse {
        zip_code: key,
        location: entry.metadata.label(),
        summary: entry.series.summary(),
        metadata: entry.metadata,
    }))
}

/// GET /api/status - Whether lookup data is loaded, and how the last run went
pub async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "zhvi-api".to_string(),
        state: state.data_state().await,
        regions: state.store.len().await,
        source_url: state.source_url.clone(),
        started_at: state.started_at,
        last_run: state.last_run().await,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Normalize the path parameter and look it up.
async fn lookup(state: &AppState, zipcode: &str) -> Result<(RegionKey, RegionEntry), ApiError> {
    let key = match RegionKey::parse(zipcode) {
        Ok(key) => key,
        Err(err) => {
            counter!("zhvi_lookups_total", "outcome" => "invalid").increment(1);
            debug!(zipcode, "Rejected malformed ZIP code");
            return Err(ApiError::new(err, zipcode));
        }
    };

    if let Some(entry) = state.store.get(&key).await {
        counter!("zhvi_lookups_total", "outcome" => "hit").increment(1);
        return Ok((key, entry));
    }

    counter!("zhvi_lookups_total", "outcome" => "miss").increment(1);
    let err = match state.data_state().await {
        DataState::Ready => ZhviError::RegionNotFound(key.to_string()),
        DataState::Loading | DataState::Failed => ZhviError::NotLoaded,
    };
    Err(ApiError::new(err, key.as_str()))
}
