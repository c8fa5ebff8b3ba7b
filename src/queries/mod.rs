//! Query modules for the fuel tracker.
//!
//! Each module provides a query struct that borrows from a
//! [`FuelTracker`](crate::FuelTracker), loads what it needs through the
//! tracker's repositories, and hands the snapshots to [`engine`](crate::engine).

pub mod community;
pub mod comparison;
pub mod expenses;
pub mod fill_ups;
pub mod personal;
pub mod registration;

pub use community::CommunityQuery;
pub use comparison::ComparisonQuery;
pub use expenses::ExpenseQuery;
pub use fill_ups::FillUpQuery;
pub use personal::PersonalQuery;
pub use registration::RegistrationQuery;
