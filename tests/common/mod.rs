//! Shared test fixtures for the DriveWise integration tests.
//!
//! Builders for fill-ups, registrations and community entries with round
//! numbers, plus `temp_tracker()` which opens a tracker over a scratch
//! data directory.

#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use drivewise::{
    CommunityEntry, DriverProfile, FillUpRecord, FuelTracker, FuelType, Registration,
    VehicleProfile,
};

/// Noon UTC on the given day of January 2024.
pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
}

/// A fill-up at 5.00 per liter.
pub fn fill_up(fuel: FuelType, odometer_km: u64, liters: f64, d: u32) -> FillUpRecord {
    FillUpRecord::new(fuel, 5.0, liters * 5.0, liters, odometer_km, day(d))
}

/// Gasoline fill-ups at the given odometer readings and liters, one day apart.
pub fn gasoline_history(readings: &[(u64, f64)]) -> Vec<FillUpRecord> {
    readings
        .iter()
        .enumerate()
        .map(|(i, &(km, liters))| fill_up(FuelType::Gasoline, km, liters, i as u32 + 1))
        .collect()
}

pub fn registration(brand: &str, model: &str, year: i32, city: &str, odometer_km: u64) -> Registration {
    Registration {
        vehicle: VehicleProfile {
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            current_odometer_km: odometer_km,
            accepted_fuel_types: BTreeSet::from([FuelType::Gasoline, FuelType::Ethanol]),
            modifications: None,
        },
        driver: DriverProfile {
            style: "moderado".to_string(),
            roads: "urbanas".to_string(),
            frequency: "diaria".to_string(),
            state: "PE".to_string(),
            city: city.to_string(),
        },
    }
}

pub fn entry(uid: &str, brand: &str, model: &str, city: &str, fill_ups: Vec<FillUpRecord>) -> CommunityEntry {
    CommunityEntry::new(
        Some(uid.to_string()),
        registration(brand, model, 2019, city, 10_000),
        fill_ups,
    )
}

/// A vehicle whose gasoline intervals all run at `km_per_liter` (two intervals).
pub fn steady_entry(uid: &str, brand: &str, model: &str, city: &str, km_per_liter: f64) -> CommunityEntry {
    let distance = (km_per_liter * 10.0) as u64;
    entry(
        uid,
        brand,
        model,
        city,
        gasoline_history(&[(1_000, 10.0), (1_000 + distance, 10.0), (1_000 + 2 * distance, 10.0)]),
    )
}

/// Tracker over a fresh temporary data directory.
///
/// Returns `(FuelTracker, tempfile::TempDir)`. Keep the `TempDir` alive for
/// the duration of the test.
pub fn temp_tracker() -> (FuelTracker, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let tracker = FuelTracker::builder()
        .data_dir(tmp_dir.path())
        .build()
        .unwrap();
    (tracker, tmp_dir)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
