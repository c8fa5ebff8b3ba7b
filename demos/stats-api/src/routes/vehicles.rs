use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use drivewise::{CommunityEntry, Registration};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterVehicleBody {
    pub uid: String,
    #[serde(flatten)]
    pub registration: Registration,
}

/// GET /veiculos
///
/// Every registered vehicle with its driver profile and fill-ups.
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CommunityEntry>>, AppError> {
    let store = state.store.clone();
    let entries = tokio::task::spawn_blocking(move || store.entries())
        .await
        .map_err(|e| AppError::internal(format!("Task join error: {e}")))??;
    Ok(Json(entries))
}

/// POST /veiculos
///
/// Register (or replace) a user's vehicle and driver profile.
pub async fn register_vehicle(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterVehicleBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let uid = body.uid.clone();
    state
        .tracker
        .run(move |t| t.registration().save(&body.uid, &body.registration))
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "uid": uid }))))
}

/// GET /veiculos/:uid
///
/// A one-element list with the user's registration, or an empty list.
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<CommunityEntry>>, AppError> {
    let entries = state
        .tracker
        .run(move |t| {
            let registration = t.registration().get(&uid)?;
            Ok(registration
                .map(|reg| CommunityEntry::new(Some(uid), reg, Vec::new()))
                .into_iter()
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(entries))
}
