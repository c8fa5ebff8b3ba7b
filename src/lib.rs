//! DriveWise fuel tracker core.
//!
//! Keeps a vehicle's fill-up history and turns it into fuel-efficiency
//! statistics: km per liter between consecutive same-fuel fill-ups, the
//! change from one interval to the next, and comparisons against other
//! drivers of the same brand and model.
//!
//! The statistics live in [`engine`] as pure functions over record
//! snapshots. [`FuelTracker`] wires them to storage: a local JSON store, the
//! REST backend, or a DuckDB-indexed community dataset.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::Utc;
//! use drivewise::{FillUpRecord, FuelTracker, FuelType};
//!
//! let tracker = FuelTracker::builder().data_dir("/tmp/drivewise").build().unwrap();
//!
//! let record = FillUpRecord::new(FuelType::Gasoline, 6.0, 300.0, 50.0, 85_000, Utc::now());
//! let receipt = tracker.fill_ups().record("user-1", record).unwrap();
//! if let Some(interval) = receipt.interval {
//!     println!("{:.2} km/L", interval.km_per_liter);
//! }
//!
//! let view = tracker.community().for_user("user-1").unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod input;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncFuelTracker;
pub use config::Settings;
pub use connection::Connection;
pub use engine::{compute_variation, compute_yield, YieldPoint, YieldSeries};
pub use error::{DrivewiseError, Result};
pub use models::*;
pub use sql_builder::SqlBuilder;
pub use store::{
    ApiClient, CommunityIndex, CommunitySource, ExpenseRepository, FillUpRepository, LocalStore,
    ModelCount, VehicleRepository,
};

use std::fmt;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// FuelTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`FuelTracker`].
///
/// Repositories that are not injected explicitly are chosen from the
/// settings: the REST backend when an API URL is set, the local JSON store
/// otherwise. Expenses always stay local. A community dataset file, when
/// given, takes over community lookups.
#[derive(Default)]
pub struct FuelTrackerBuilder {
    settings: Settings,
    fill_ups: Option<Box<dyn FillUpRepository + Send>>,
    vehicles: Option<Box<dyn VehicleRepository + Send>>,
    expenses: Option<Box<dyn ExpenseRepository + Send>>,
    community: Option<Box<dyn CommunitySource + Send>>,
}

impl FuelTrackerBuilder {
    /// Start from explicit settings, e.g. [`Settings::from_env`].
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Root directory of the local JSON store.
    ///
    /// Defaults to the platform data directory (e.g. `~/.local/share/drivewise`
    /// on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.settings.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Route fill-ups, registrations and community data through the REST backend.
    pub fn api_base_url(mut self, url: &str) -> Self {
        self.settings.api_base_url = Some(url.to_string());
        self
    }

    /// HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Serve community lookups from a JSON (or `.json.gz`) dataset indexed in DuckDB.
    pub fn community_dataset<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.settings.community_dataset = Some(path.as_ref().to_path_buf());
        self
    }

    /// Fuel prices used to estimate cost per km in vehicle comparisons.
    pub fn reference_prices(mut self, prices: ReferencePrices) -> Self {
        self.settings.reference_prices = prices;
        self
    }

    pub fn fill_up_repository<R: FillUpRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.fill_ups = Some(Box::new(repo));
        self
    }

    pub fn vehicle_repository<R: VehicleRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.vehicles = Some(Box::new(repo));
        self
    }

    pub fn expense_repository<R: ExpenseRepository + Send + 'static>(mut self, repo: R) -> Self {
        self.expenses = Some(Box::new(repo));
        self
    }

    pub fn community_source<S: CommunitySource + Send + 'static>(mut self, source: S) -> Self {
        self.community = Some(Box::new(source));
        self
    }

    /// Build the tracker, opening whatever stores the settings call for.
    ///
    /// A community dataset is read and indexed here, eagerly.
    pub fn build(self) -> Result<FuelTracker> {
        let settings = self.settings;

        let needs_local = self.expenses.is_none()
            || (settings.api_base_url.is_none()
                && (self.fill_ups.is_none()
                    || self.vehicles.is_none()
                    || (self.community.is_none() && settings.community_dataset.is_none())));
        let local = if needs_local {
            Some(LocalStore::new(Some(settings.data_dir.clone()))?)
        } else {
            None
        };
        let remote = match &settings.api_base_url {
            Some(url) => Some(ApiClient::new(url, settings.timeout)?),
            None => None,
        };

        let fill_ups: Box<dyn FillUpRepository + Send> = match (self.fill_ups, &remote, &local) {
            (Some(repo), _, _) => repo,
            (None, Some(remote), _) => Box::new(remote.clone()),
            (None, None, Some(local)) => Box::new(local.clone()),
            (None, None, None) => return Err(missing("fill-up repository")),
        };
        let vehicles: Box<dyn VehicleRepository + Send> = match (self.vehicles, &remote, &local) {
            (Some(repo), _, _) => repo,
            (None, Some(remote), _) => Box::new(remote.clone()),
            (None, None, Some(local)) => Box::new(local.clone()),
            (None, None, None) => return Err(missing("vehicle repository")),
        };
        let expenses: Box<dyn ExpenseRepository + Send> = match (self.expenses, &local) {
            (Some(repo), _) => repo,
            (None, Some(local)) => Box::new(local.clone()),
            (None, None) => return Err(missing("expense repository")),
        };
        let community: Box<dyn CommunitySource + Send> =
            match (self.community, &settings.community_dataset, &remote, &local) {
                (Some(source), _, _, _) => source,
                (None, Some(path), _, _) => Box::new(CommunityIndex::load_dataset(path)?),
                (None, None, Some(remote), _) => Box::new(remote.clone()),
                (None, None, None, Some(local)) => Box::new(local.clone()),
                (None, None, None, None) => return Err(missing("community source")),
            };

        tracing::debug!(
            data_dir = %settings.data_dir.display(),
            api = settings.api_base_url.as_deref().unwrap_or("-"),
            "fuel tracker ready"
        );

        Ok(FuelTracker {
            fill_ups,
            vehicles,
            expenses,
            community,
            settings,
        })
    }
}

fn missing(what: &str) -> DrivewiseError {
    DrivewiseError::InvalidArgument(format!("No {} configured", what))
}

// ---------------------------------------------------------------------------
// FuelTracker
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the repositories and exposes each area of the app as a lightweight
/// borrowing wrapper. Created via [`FuelTracker::builder()`].
pub struct FuelTracker {
    pub(crate) fill_ups: Box<dyn FillUpRepository + Send>,
    pub(crate) vehicles: Box<dyn VehicleRepository + Send>,
    pub(crate) expenses: Box<dyn ExpenseRepository + Send>,
    pub(crate) community: Box<dyn CommunitySource + Send>,
    pub(crate) settings: Settings,
}

impl FuelTracker {
    pub fn builder() -> FuelTrackerBuilder {
        FuelTrackerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Record and list fill-ups.
    pub fn fill_ups(&self) -> queries::fill_ups::FillUpQuery<'_> {
        queries::fill_ups::FillUpQuery::new(self)
    }

    /// The user's own efficiency figures.
    pub fn personal(&self) -> queries::personal::PersonalQuery<'_> {
        queries::personal::PersonalQuery::new(self)
    }

    /// Community averages by brand, model and city.
    pub fn community(&self) -> queries::community::CommunityQuery<'_> {
        queries::community::CommunityQuery::new(self)
    }

    /// Side-by-side comparison of vehicle groups.
    pub fn comparison(&self) -> queries::comparison::ComparisonQuery<'_> {
        queries::comparison::ComparisonQuery::new(self)
    }

    /// Expense ledger.
    pub fn expenses(&self) -> queries::expenses::ExpenseQuery<'_> {
        queries::expenses::ExpenseQuery::new(self)
    }

    /// Vehicle and driver registration.
    pub fn registration(&self) -> queries::registration::RegistrationQuery<'_> {
        queries::registration::RegistrationQuery::new(self)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn data_dir(&self) -> &Path {
        &self.settings.data_dir
    }
}

impl fmt::Display for FuelTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FuelTracker(data_dir={}, api={}, community_dataset={})",
            self.settings.data_dir.display(),
            self.settings.api_base_url.as_deref().unwrap_or("none"),
            self.settings
                .community_dataset
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        )
    }
}
