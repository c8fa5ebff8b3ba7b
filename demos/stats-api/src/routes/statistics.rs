use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use drivewise::CommunityComparison;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StatisticsParams {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    #[serde(default)]
    pub cidade: String,
}

/// GET /estatisticas?marca=Fiat&modelo=Uno&cidade=Recife
///
/// Community averages for a brand/model, for the city and overall.
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<CommunityComparison>, AppError> {
    let (Some(brand), Some(model)) = (params.marca, params.modelo) else {
        return Err(AppError::bad_request("marca and modelo are required"));
    };
    let comparison = state
        .tracker
        .community_aggregate(&brand, &model, &params.cidade)
        .await?;
    Ok(Json(comparison))
}
