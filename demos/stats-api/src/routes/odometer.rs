use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OdometerBody {
    #[serde(alias = "odometerKm")]
    pub quilometragem: u64,
}

/// PATCH /quilometragem/:uid
pub async fn update_odometer(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(body): Json<OdometerBody>,
) -> Result<StatusCode, AppError> {
    state
        .tracker
        .run(move |t| t.registration().update_odometer(&uid, body.quilometragem))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
