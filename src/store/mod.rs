//! Storage and transport collaborators.
//!
//! The statistics engine never touches storage. Callers load records through
//! these traits and pass the resulting snapshots in. Implementations:
//!
//! - [`LocalStore`]: JSON files on disk, one directory per user.
//! - [`ApiClient`]: the DriveWise REST backend.
//! - [`CommunityIndex`]: a community dataset loaded into DuckDB.
//! - `Vec<CommunityEntry>`: an in-memory community dataset.

pub mod community_index;
pub mod local;
pub mod remote;

pub use community_index::{CommunityIndex, ModelCount};
pub use local::LocalStore;
pub use remote::ApiClient;

use crate::error::Result;
use crate::models::{CommunityEntry, Expense, FillUpRecord, Registration};

/// Per-user fill-up history.
pub trait FillUpRepository {
    /// All fill-ups of the user, in the order they were saved.
    fn list_fill_ups(&self, user_id: &str) -> Result<Vec<FillUpRecord>>;

    fn append_fill_up(&self, user_id: &str, record: &FillUpRecord) -> Result<()>;
}

/// The user's registered vehicle and driver profile.
pub trait VehicleRepository {
    fn registration(&self, user_id: &str) -> Result<Option<Registration>>;

    fn save_registration(&self, user_id: &str, registration: &Registration) -> Result<()>;

    /// Set the vehicle's current odometer reading.
    fn update_odometer(&self, user_id: &str, odometer_km: u64) -> Result<()>;
}

/// Manual expenses. Fuel expenses are derived from fill-ups and not stored here.
pub trait ExpenseRepository {
    fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>>;

    fn save_expense(&self, user_id: &str, expense: &Expense) -> Result<()>;
}

/// All users' vehicles and fill-ups, for community statistics.
pub trait CommunitySource {
    /// Entries for `brand`/`model`.
    ///
    /// Implementations may return more than the case-insensitive matches;
    /// callers filter again.
    fn community_entries(&self, brand: &str, model: &str) -> Result<Vec<CommunityEntry>>;
}

impl CommunitySource for Vec<CommunityEntry> {
    fn community_entries(&self, brand: &str, model: &str) -> Result<Vec<CommunityEntry>> {
        Ok(self
            .iter()
            .filter(|e| e.vehicle.is_same_model(brand, model))
            .cloned()
            .collect())
    }
}
