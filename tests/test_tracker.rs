//! End-to-end tests of the FuelTracker facade over a temporary local store.

mod common;

use chrono::{TimeZone, Utc};
use common::{assert_close, day, fill_up, registration, steady_entry, temp_tracker};
use drivewise::{
    ComparisonFilter, DrivewiseError, ExpenseKind, FillUpDraft, FillUpRepository, FuelTracker,
    FuelType, LocalStore, OdometerRange, Registration, VehicleRepository,
};

/// Register `user` (Fiat Uno) in `city` and record gasoline fill-ups at the
/// given odometer readings, 10 L each, one day apart.
fn seed(tracker: &FuelTracker, user: &str, city: &str, readings: &[u64]) {
    tracker
        .registration()
        .save(user, &registration("Fiat", "Uno", 2019, city, 900))
        .unwrap();
    for (i, &km) in readings.iter().enumerate() {
        tracker
            .fill_ups()
            .record(user, fill_up(FuelType::Gasoline, km, 10.0, i as u32 + 1))
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Recording fill-ups
// ---------------------------------------------------------------------------

#[test]
fn recording_returns_interval_and_variation() {
    let (tracker, _tmp) = temp_tracker();
    tracker
        .registration()
        .save("me", &registration("Fiat", "Uno", 2019, "Recife", 900))
        .unwrap();

    let first = tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 1_000, 10.0, 1))
        .unwrap();
    assert!(first.interval.is_none());

    let second = tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 1_100, 10.0, 2))
        .unwrap();
    assert_close(second.interval.unwrap().km_per_liter, 10.0);
    assert!(second.variation.is_none());

    let third = tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 1_220, 10.0, 3))
        .unwrap();
    assert_close(third.interval.unwrap().km_per_liter, 12.0);
    let variation = third.variation.unwrap();
    assert_close(variation.percent, 20.0);
    assert!(variation.improved);

    assert_eq!(tracker.fill_ups().list("me").unwrap().len(), 3);
    let reg = tracker.registration().get("me").unwrap().unwrap();
    assert_eq!(reg.vehicle.current_odometer_km, 1_220);
}

#[test]
fn fuel_not_accepted_by_vehicle_is_rejected() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[]);

    let err = tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Diesel, 1_000, 10.0, 1))
        .unwrap_err();
    assert!(matches!(err, DrivewiseError::Validation(_)));
    assert!(tracker.fill_ups().list("me").unwrap().is_empty());
}

#[test]
fn invalid_amounts_are_not_saved() {
    let (tracker, _tmp) = temp_tracker();
    let mut record = fill_up(FuelType::Gasoline, 1_000, 10.0, 1);
    record.total_cost = 0.0;
    assert!(matches!(
        tracker.fill_ups().record("me", record),
        Err(DrivewiseError::Validation(_))
    ));
    assert!(tracker.fill_ups().list("me").unwrap().is_empty());
}

#[test]
fn unregistered_user_can_still_record() {
    let (tracker, _tmp) = temp_tracker();
    tracker
        .fill_ups()
        .record("guest", fill_up(FuelType::Diesel, 500, 10.0, 1))
        .unwrap();
    assert_eq!(tracker.fill_ups().list("guest").unwrap().len(), 1);
    assert!(tracker.registration().get("guest").unwrap().is_none());
}

#[test]
fn odometer_regression_is_saved() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000]);
    tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 950, 10.0, 2))
        .unwrap();
    assert_eq!(tracker.fill_ups().list("me").unwrap().len(), 2);
}

#[test]
fn record_draft_completes_amounts() {
    let (tracker, _tmp) = temp_tracker();
    let receipt = tracker
        .fill_ups()
        .record_draft(
            "me",
            FuelType::Gasoline,
            FillUpDraft::new(Some(6.0), Some(300.0), None),
            85_000,
            day(1),
        )
        .unwrap();
    assert_eq!(receipt.record.liters, 50.0);
}

#[test]
fn list_by_fuel_sorts_chronologically() {
    let (tracker, _tmp) = temp_tracker();
    for record in [
        fill_up(FuelType::Gasoline, 1_200, 10.0, 3),
        fill_up(FuelType::Ethanol, 1_100, 10.0, 2),
        fill_up(FuelType::Gasoline, 1_000, 10.0, 1),
    ] {
        tracker.fill_ups().record("me", record).unwrap();
    }
    let gas = tracker
        .fill_ups()
        .list_by_fuel("me", FuelType::Gasoline)
        .unwrap();
    let km: Vec<u64> = gas.iter().map(|r| r.odometer_km).collect();
    assert_eq!(km, vec![1_000, 1_200]);
}

// ---------------------------------------------------------------------------
// Personal statistics
// ---------------------------------------------------------------------------

#[test]
fn personal_views() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000, 1_100, 1_220]);

    let series = tracker
        .personal()
        .yield_series("me", FuelType::Gasoline)
        .unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].distance_km, 100);

    let latest = tracker
        .personal()
        .latest("me", FuelType::Gasoline)
        .unwrap()
        .unwrap();
    assert_close(latest.interval.km_per_liter, 12.0);
    assert!(tracker
        .personal()
        .latest("me", FuelType::Ethanol)
        .unwrap()
        .is_none());
    assert_eq!(tracker.personal().latest_all("me").unwrap().len(), 1);

    let summary = tracker.personal().summary("me").unwrap();
    assert_eq!(summary.fill_up_count, 3);
    assert_eq!(summary.odometer_span_km, 220);
}

// ---------------------------------------------------------------------------
// Community
// ---------------------------------------------------------------------------

#[test]
fn community_view_prefers_city_average() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000, 1_120]);
    seed(&tracker, "other", "Recife", &[1_000, 1_140, 1_280]);

    let view = tracker.community().for_user("me").unwrap();
    assert_eq!(view.community.local.sample_count, 2);
    assert_close(view.community.local.avg_efficiency.gasoline, 13.0);

    // Gasoline and ethanol are accepted; diesel has no data and is skipped.
    assert_eq!(view.standings.len(), 2);
    let gas = &view.standings[0];
    assert_eq!(gas.fuel_type, FuelType::Gasoline);
    assert_close(gas.user_km_per_liter.unwrap(), 12.0);
    assert_close(gas.community_km_per_liter.unwrap(), 13.0);
    assert_close(gas.percent_diff.unwrap(), (12.0 - 13.0) / 13.0 * 100.0);

    let ethanol = &view.standings[1];
    assert!(ethanol.user_km_per_liter.is_none());
    assert!(ethanol.community_km_per_liter.is_none());
    assert!(ethanol.percent_diff.is_none());
}

#[test]
fn community_view_falls_back_to_global() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000, 1_120]);
    tracker
        .registration()
        .save("far", &registration("Fiat", "Uno", 2019, "Olinda", 900))
        .unwrap();
    for (i, km) in [1_000u64, 1_080, 1_160].into_iter().enumerate() {
        tracker
            .fill_ups()
            .record("far", fill_up(FuelType::Ethanol, km, 10.0, i as u32 + 1))
            .unwrap();
    }

    let view = tracker.community().for_user("me").unwrap();
    let ethanol = view
        .standings
        .iter()
        .find(|s| s.fuel_type == FuelType::Ethanol)
        .unwrap();
    assert!(ethanol.user_km_per_liter.is_none());
    assert_close(ethanol.community_km_per_liter.unwrap(), 8.0);
}

#[test]
fn community_view_needs_registration() {
    let (tracker, _tmp) = temp_tracker();
    assert!(matches!(
        tracker.community().for_user("nobody"),
        Err(DrivewiseError::NotFound(_))
    ));
}

#[test]
fn aggregate_for_unknown_model_is_zero() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000, 1_120]);
    let result = tracker
        .community()
        .aggregate("Toyota", "Corolla", "Recife")
        .unwrap();
    assert_eq!(result.global.sample_count, 0);
    assert_eq!(result.global.avg_efficiency.gasoline, 0.0);
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[test]
fn comparison_over_injected_community() {
    let tmp = tempfile::tempdir().unwrap();
    let tracker = FuelTracker::builder()
        .data_dir(tmp.path())
        .community_source(vec![
            steady_entry("u1", "Fiat", "Uno", "Recife", 10.0),
            steady_entry("u2", "Ford", "Ka", "Recife", 16.0),
        ])
        .build()
        .unwrap();

    let filters = [
        ComparisonFilter::new("Fiat", "Uno", 2019, OdometerRange::new(0, 15_000)),
        ComparisonFilter::new("Ford", "Ka", 2019, OdometerRange::new(0, 15_000)),
    ];
    let results = tracker.comparison().compare(&filters).unwrap();
    assert_eq!(results.len(), 2);
    assert_close(results[0].avg_efficiency.gasoline, 10.0);

    let ranking = tracker.comparison().rank(&results);
    assert_eq!(ranking.gasoline.best.as_deref(), Some("Ford_Ka_2019_0-15000"));
}

#[test]
fn community_dataset_is_indexed_at_build() {
    let tmp = tempfile::tempdir().unwrap();
    let dataset = tmp.path().join("community.json");
    let entries = vec![
        steady_entry("u1", "Fiat", "Uno", "Recife", 10.0),
        steady_entry("u2", "Fiat", "Uno", "Olinda", 14.0),
    ];
    std::fs::write(&dataset, serde_json::to_string(&entries).unwrap()).unwrap();

    let tracker = FuelTracker::builder()
        .data_dir(tmp.path().join("data"))
        .community_dataset(&dataset)
        .build()
        .unwrap();
    let result = tracker
        .community()
        .aggregate("fiat", "uno", "recife")
        .unwrap();
    assert_eq!(result.local.sample_count, 1);
    assert_eq!(result.global.sample_count, 2);
    assert_close(result.global.avg_efficiency.gasoline, 12.0);
    assert!(tracker.to_string().contains("community.json"));
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[test]
fn expense_history_merges_fill_ups_and_manual_entries() {
    let (tracker, _tmp) = temp_tracker();
    seed(&tracker, "me", "Recife", &[1_000, 1_120]);
    tracker
        .expenses()
        .add_manual("me", "Oil change", 30.0, day(10))
        .unwrap();

    let history = tracker.expenses().history("me").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].kind, ExpenseKind::Manual);
    assert_eq!(history[1].kind, ExpenseKind::Fuel);
    assert_eq!(history[1].km_driven, Some(120));
    assert_close(history[1].efficiency.unwrap(), 12.0);
    assert!(history[2].km_driven.is_none());

    let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let totals = tracker.expenses().totals("me", now).unwrap();
    assert_close(totals.total, 130.0);
    assert_close(totals.last_week, 30.0);
    assert_close(totals.year_to_date, 130.0);
}

#[test]
fn manual_expense_validation_propagates() {
    let (tracker, _tmp) = temp_tracker();
    assert!(matches!(
        tracker.expenses().add_manual("me", "", 10.0, day(1)),
        Err(DrivewiseError::Validation(_))
    ));
}

// ---------------------------------------------------------------------------
// Registration and builder
// ---------------------------------------------------------------------------

#[test]
fn invalid_registration_is_not_saved() {
    let (tracker, _tmp) = temp_tracker();
    let mut reg = registration("Fiat", "Uno", 2019, "Recife", 900);
    reg.vehicle.brand.clear();
    assert!(tracker.registration().save("me", &reg).is_err());
    assert!(tracker.registration().get("me").unwrap().is_none());
}

#[test]
fn injected_repositories_are_used() {
    let tmp = tempfile::tempdir().unwrap();
    let shared = LocalStore::new(Some(tmp.path().join("shared"))).unwrap();
    let tracker = FuelTracker::builder()
        .data_dir(tmp.path().join("own"))
        .fill_up_repository(shared.clone())
        .vehicle_repository(shared.clone())
        .build()
        .unwrap();

    tracker
        .registration()
        .save("me", &registration("Fiat", "Uno", 2019, "Recife", 900))
        .unwrap();
    tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 1_000, 10.0, 1))
        .unwrap();

    assert_eq!(shared.list_fill_ups("me").unwrap().len(), 1);
    assert_eq!(
        shared.registration("me").unwrap().unwrap().vehicle.current_odometer_km,
        1_000
    );
    assert_eq!(tracker.data_dir(), tmp.path().join("own"));
}

/// Registrations come from a local store, but odometer updates always fail.
struct ReadOnlyVehicles(LocalStore);

impl VehicleRepository for ReadOnlyVehicles {
    fn registration(&self, user_id: &str) -> drivewise::Result<Option<Registration>> {
        self.0.registration(user_id)
    }

    fn save_registration(
        &self,
        user_id: &str,
        registration: &Registration,
    ) -> drivewise::Result<()> {
        self.0.save_registration(user_id, registration)
    }

    fn update_odometer(&self, _user_id: &str, _odometer_km: u64) -> drivewise::Result<()> {
        Err(DrivewiseError::NotFound("vehicle record is read-only".to_string()))
    }
}

#[test]
fn saved_fill_up_survives_odometer_update_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::new(Some(tmp.path().join("shared"))).unwrap();
    store
        .save_registration("me", &registration("Fiat", "Uno", 2019, "Recife", 900))
        .unwrap();
    let tracker = FuelTracker::builder()
        .data_dir(tmp.path().join("own"))
        .fill_up_repository(store.clone())
        .vehicle_repository(ReadOnlyVehicles(store.clone()))
        .build()
        .unwrap();

    let receipt = tracker
        .fill_ups()
        .record("me", fill_up(FuelType::Gasoline, 1_000, 10.0, 1))
        .unwrap();
    assert!(receipt.interval.is_none());

    assert_eq!(store.list_fill_ups("me").unwrap().len(), 1);
    assert_eq!(tracker.fill_ups().list("me").unwrap().len(), 1);
    assert_eq!(
        store.registration("me").unwrap().unwrap().vehicle.current_odometer_km,
        900
    );
}
