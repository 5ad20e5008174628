//! HTTP request handlers.
//!
//! - `api`: region lookups and ingestion status
//! - `health`: liveness and Prometheus metrics
//! - `common`: error responses shared by the handlers

pub mod api;
pub mod common;
pub mod health;

pub use api::{
    data_handler, status_handler, summary_handler, RegionDataResponse, RegionSummaryResponse,
    StatusResponse,
};
pub use common::{ApiError, ErrorBody};
pub use health::{health_handler, metrics_handler};
