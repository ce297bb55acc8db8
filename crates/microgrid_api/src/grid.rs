use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use microgrid_core::{ConfigError, GridSettings, GridState, InverterConfig, MicrogridState};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfigResponse {
    pub settings: GridSettings,
    pub inverters: Vec<InverterConfig>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvertersRequest {
    pub inverters: Vec<InverterConfig>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn config_error_to_response(error: ConfigError) -> impl IntoResponse {
    let status = match error {
        ConfigError::InverterNotFound { .. } => StatusCode::NOT_FOUND,
        ConfigError::OutOfRange { .. }
        | ConfigError::NonFinite { .. }
        | ConfigError::DroopOnGridFollowing { .. }
        | ConfigError::InverterCount { .. }
        | ConfigError::InvalidSettings { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    tracing::warn!("Rejected grid configuration: {}", error);

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Get the nominal settings and the current inverter list
pub async fn get_grid_config(
    State(app_state): State<Arc<Mutex<MicrogridState>>>,
) -> Json<GridConfigResponse> {
    tracing::info!("Getting grid configuration");
    let state = app_state.lock().unwrap();
    Json(GridConfigResponse {
        settings: *state.get_settings(),
        inverters: state.get_inverters().to_vec(),
    })
}

/// Estimate the grid state of the current inverter list
pub async fn get_grid_state(
    State(app_state): State<Arc<Mutex<MicrogridState>>>,
) -> Json<GridState> {
    tracing::info!("Getting grid state");
    let state = app_state.lock().unwrap();
    Json(state.grid_state())
}

/// Replace the whole inverter list
pub async fn replace_inverters(
    State(app_state): State<Arc<Mutex<MicrogridState>>>,
    Json(payload): Json<InvertersRequest>,
) -> impl IntoResponse {
    let mut state = app_state.lock().unwrap();
    match state.replace_inverters(payload.inverters) {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(error) => config_error_to_response(error).into_response(),
    }
}

/// Replace the configuration of one inverter
pub async fn update_inverter(
    State(app_state): State<Arc<Mutex<MicrogridState>>>,
    Path(index): Path<usize>,
    Json(payload): Json<InverterConfig>,
) -> impl IntoResponse {
    let mut state = app_state.lock().unwrap();
    match state.update_inverter(index, payload) {
        Ok(grid) => (StatusCode::OK, Json(grid)).into_response(),
        Err(error) => config_error_to_response(error).into_response(),
    }
}
