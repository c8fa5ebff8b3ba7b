/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Tracker over the local store. Dispatches blocking work to a thread pool.
    pub tracker: drivewise::AsyncFuelTracker,

    /// The same store the tracker writes to, for listing every registered
    /// vehicle.
    pub store: drivewise::LocalStore,
}
