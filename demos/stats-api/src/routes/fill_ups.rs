use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use drivewise::{FillUpReceipt, FillUpRecord};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FillUpBody {
    pub uid: String,
    #[serde(flatten)]
    pub record: FillUpRecord,
}

/// POST /abastecimentos
///
/// Save a fill-up and return the interval it closes, if any.
pub async fn record_fill_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FillUpBody>,
) -> Result<(StatusCode, Json<FillUpReceipt>), AppError> {
    let receipt = state.tracker.record_fill_up(&body.uid, body.record).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /abastecimentos/:uid
pub async fn list_fill_ups(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<FillUpRecord>>, AppError> {
    let records = state.tracker.run(move |t| t.fill_ups().list(&uid)).await?;
    Ok(Json(records))
}
