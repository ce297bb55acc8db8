//! Microgrid estimator API Library
//!
//! This library exposes the droop-based grid state estimator over HTTP so an
//! external UI can push inverter configurations and render the resulting grid state.

pub mod config;
mod estimate;
mod grid;

pub use grid::{ErrorResponse, GridConfigResponse, InvertersRequest};

use axum::{
    Router,
    routing::{get, post, put},
};
use microgrid_core::MicrogridState;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app(app_state: MicrogridState) -> Router {
    let shared_state = Arc::new(Mutex::new(app_state));
    Router::new()
        .route("/health", get(health_check))
        .route("/grid/config", get(grid::get_grid_config))
        .route("/grid/state", get(grid::get_grid_state))
        .route("/grid/inverters", put(grid::replace_inverters))
        .route("/grid/inverters/{index}", put(grid::update_inverter))
        .route("/estimate", post(estimate::estimate_inverters))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}
