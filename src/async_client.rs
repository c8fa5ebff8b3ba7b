//! Async wrapper around [`FuelTracker`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all tracker operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! files are read, DuckDB is queried or the blocking HTTP client waits.
//!
//! # Example
//!
//! ```no_run
//! use drivewise::AsyncFuelTracker;
//!
//! #[tokio::main]
//! async fn main() {
//!     let tracker = AsyncFuelTracker::builder()
//!         .data_dir("/tmp/drivewise")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let summary = tracker.run(|t| t.personal().summary("user-1")).await.unwrap();
//!     println!("{} fill-ups", summary.fill_up_count);
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Settings;
use crate::error::{DrivewiseError, Result};
use crate::models::{CommunityComparison, FillUpReceipt, FillUpRecord, ReferencePrices};
use crate::store::{CommunitySource, ExpenseRepository, FillUpRepository, VehicleRepository};
use crate::{FuelTracker, FuelTrackerBuilder};

// ---------------------------------------------------------------------------
// AsyncFuelTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncFuelTracker`]. Mirrors [`FuelTrackerBuilder`].
#[derive(Default)]
pub struct AsyncFuelTrackerBuilder {
    inner: FuelTrackerBuilder,
}

impl AsyncFuelTrackerBuilder {
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            inner: FuelTrackerBuilder::from_settings(settings),
        }
    }

    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.data_dir(path);
        self
    }

    pub fn api_base_url(mut self, url: &str) -> Self {
        self.inner = self.inner.api_base_url(url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn community_dataset<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.community_dataset(path);
        self
    }

    pub fn reference_prices(mut self, prices: ReferencePrices) -> Self {
        self.inner = self.inner.reference_prices(prices);
        self
    }

    pub fn fill_up_repository<R: FillUpRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.inner = self.inner.fill_up_repository(repo);
        self
    }

    pub fn vehicle_repository<R: VehicleRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.inner = self.inner.vehicle_repository(repo);
        self
    }

    pub fn expense_repository<R: ExpenseRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.inner = self.inner.expense_repository(repo);
        self
    }

    pub fn community_source<S: CommunitySource + Send + 'static>(mut self, source: S) -> Self {
        self.inner = self.inner.community_source(source);
        self
    }

    /// Build the tracker on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncFuelTracker> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let tracker = inner.build()?;
            Ok(AsyncFuelTracker {
                inner: Arc::new(Mutex::new(tracker)),
            })
        })
        .await
        .map_err(|e| DrivewiseError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncFuelTracker
// ---------------------------------------------------------------------------

/// Async wrapper around [`FuelTracker`].
///
/// The tracker sits behind a [`Mutex`], so operations run one at a time.
/// Cloning is cheap and shares the same tracker.
#[derive(Clone)]
pub struct AsyncFuelTracker {
    inner: Arc<Mutex<FuelTracker>>,
}

impl AsyncFuelTracker {
    pub fn builder() -> AsyncFuelTrackerBuilder {
        AsyncFuelTrackerBuilder::default()
    }

    /// Wrap an already built tracker.
    pub fn from_tracker(tracker: FuelTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Run a sync tracker operation on the blocking thread pool.
    ///
    /// The closure receives a `&FuelTracker` and returns a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&FuelTracker) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = tracker
                .lock()
                .map_err(|_| DrivewiseError::InvalidArgument("Tracker lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DrivewiseError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Record a fill-up asynchronously.
    pub async fn record_fill_up(&self, user_id: &str, record: FillUpRecord) -> Result<FillUpReceipt> {
        let user_id = user_id.to_string();
        self.run(move |t| t.fill_ups().record(&user_id, record)).await
    }

    /// Community averages for a brand/model, split by city.
    pub async fn community_aggregate(
        &self,
        brand: &str,
        model: &str,
        city: &str,
    ) -> Result<CommunityComparison> {
        let (brand, model, city) = (brand.to_string(), model.to_string(), city.to_string());
        self.run(move |t| t.community().aggregate(&brand, &model, &city))
            .await
    }
}
