//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Query-parameter routes over the ledger engine
//! - Request extractors
//! - Error responses

pub mod extractors;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use backer_core::ledger::LedgerEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger engine; one per process.
    pub engine: Arc<LedgerEngine>,
}

impl AppState {
    /// Creates the state around an engine.
    #[must_use]
    pub const fn new(engine: Arc<LedgerEngine>) -> Self {
        Self { engine }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
