mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use drivewise::{AsyncFuelTracker, FuelTracker, LocalStore, Settings};
use tower_http::cors::CorsLayer;
use tracing::info;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,drivewise=debug".into()),
        )
        .init();

    let settings = Settings::from_env();
    let store = LocalStore::new(Some(settings.data_dir.clone())).expect("Failed to open data directory");
    info!(data_dir = %store.data_dir.display(), "opening local store");

    // The server is the backend, so it always reads the local store even if
    // DRIVEWISE_API_URL is set in the environment.
    let tracker = FuelTracker::builder()
        .data_dir(&store.data_dir)
        .timeout(settings.timeout)
        .reference_prices(settings.reference_prices)
        .fill_up_repository(store.clone())
        .vehicle_repository(store.clone())
        .expense_repository(store.clone())
        .community_source(store.clone());
    let tracker = tokio::task::spawn_blocking(move || tracker.build())
        .await
        .expect("Tracker setup task failed")
        .expect("Failed to build fuel tracker");

    let state = Arc::new(AppState {
        tracker: AsyncFuelTracker::from_tracker(tracker),
        store,
    });

    let app = Router::new()
        .route(
            "/veiculos",
            get(routes::vehicles::list_vehicles).post(routes::vehicles::register_vehicle),
        )
        .route("/veiculos/{uid}", get(routes::vehicles::get_vehicle))
        .route("/abastecimentos", post(routes::fill_ups::record_fill_up))
        .route("/abastecimentos/{uid}", get(routes::fill_ups::list_fill_ups))
        .route("/quilometragem/{uid}", patch(routes::odometer::update_odometer))
        .route("/estatisticas", get(routes::statistics::get_statistics))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3000";
    info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
