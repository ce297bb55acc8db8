use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use microgrid_core::{MicrogridState, estimate_with};
use std::sync::{Arc, Mutex};

use crate::grid::{InvertersRequest, config_error_to_response};

/// Estimate an ad-hoc inverter list without touching the stored configuration.
///
/// Each inverter is range-checked, but the list may have any length.
pub async fn estimate_inverters(
    State(app_state): State<Arc<Mutex<MicrogridState>>>,
    Json(payload): Json<InvertersRequest>,
) -> impl IntoResponse {
    let settings = *app_state.lock().unwrap().get_settings();

    if let Err(error) = payload
        .inverters
        .iter()
        .enumerate()
        .try_for_each(|(index, inverter)| inverter.validate(index))
    {
        return config_error_to_response(error).into_response();
    }

    let grid = estimate_with(&payload.inverters, &settings);
    (StatusCode::OK, Json(grid)).into_response()
}
