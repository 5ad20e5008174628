//! ZHVI lookup API service library.
//!
//! This module exposes the router, handlers and state so the service can be
//! exercised in tests without binding a socket.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::{AppState, IngestionReport};
