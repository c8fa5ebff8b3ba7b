//! Constants and environment-backed settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

use crate::models::{OdometerRange, ReferencePrices};

pub const FILL_UPS_FILE: &str = "fill_ups.json";
pub const REGISTRATION_FILE: &str = "registration.json";
pub const EXPENSES_FILE: &str = "expenses.json";

/// Backend route prefixes, matching the REST API served by `demos/stats-api`.
pub const VEHICLES_PATH: &str = "veiculos";
pub const FILL_UPS_PATH: &str = "abastecimentos";
pub const ODOMETER_PATH: &str = "quilometragem";
pub const STATISTICS_PATH: &str = "estatisticas";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reference fuel prices (currency/liter) used to estimate cost per km in
/// vehicle comparisons when no real price data is attached.
pub const DEFAULT_GASOLINE_PRICE: f64 = 5.0;
pub const DEFAULT_ETHANOL_PRICE: f64 = 4.0;
pub const DEFAULT_DIESEL_PRICE: f64 = 4.5;

/// Odometer buckets offered by the comparison view.
pub fn standard_odometer_ranges() -> Vec<OdometerRange> {
    vec![
        OdometerRange::new(0, 15_000),
        OdometerRange::new(15_001, 30_000),
        OdometerRange::new(30_001, 50_000),
    ]
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_local_dir() {
        data.join("drivewise")
    } else {
        PathBuf::from(".drivewise-data")
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Runtime settings, usually read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub api_base_url: Option<String>,
    pub timeout: Duration,
    pub community_dataset: Option<PathBuf>,
    pub reference_prices: ReferencePrices,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            community_dataset: None,
            reference_prices: ReferencePrices::default(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment (and `.env`, if present).
    ///
    /// Recognized variables:
    ///
    /// * `DRIVEWISE_DATA_DIR` - root of the local JSON store.
    /// * `DRIVEWISE_API_URL` - backend base URL; when set, fill-ups, vehicles
    ///   and community data go through the REST API.
    /// * `DRIVEWISE_HTTP_TIMEOUT_SECS` - request timeout, default 30.
    /// * `DRIVEWISE_COMMUNITY_DATASET` - JSON (or `.json.gz`) community dataset.
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("DRIVEWISE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let api_base_url = env::var("DRIVEWISE_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let timeout_secs = env::var("DRIVEWISE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let community_dataset = env::var("DRIVEWISE_COMMUNITY_DATASET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            data_dir,
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
            community_dataset,
            reference_prices: ReferencePrices::default(),
        }
    }
}
