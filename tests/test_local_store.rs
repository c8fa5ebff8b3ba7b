//! LocalStore: JSON documents per user, atomic writes, corrupt-file quarantine.

mod common;

use std::fs;

use chrono::Utc;
use common::{fill_up, gasoline_history, registration};
use drivewise::{
    CommunitySource, DrivewiseError, Expense, ExpenseRepository, FillUpRepository, FuelType,
    LocalStore, VehicleRepository,
};

fn store() -> (LocalStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = LocalStore::new(Some(tmp.path().to_path_buf())).unwrap();
    (store, tmp)
}

// ---------------------------------------------------------------------------
// Fill-ups
// ---------------------------------------------------------------------------

#[test]
fn fill_ups_round_trip_unchanged() {
    let (store, _tmp) = store();
    let mut records = gasoline_history(&[(100, 5.0), (150, 7.25)]);
    records.push(fill_up(FuelType::Ethanol, 220, 33.333, 9));

    for r in &records {
        store.append_fill_up("user-1", r).unwrap();
    }
    assert_eq!(store.list_fill_ups("user-1").unwrap(), records);
}

#[test]
fn missing_user_reads_as_empty() {
    let (store, _tmp) = store();
    assert!(store.list_fill_ups("nobody").unwrap().is_empty());
    assert!(store.registration("nobody").unwrap().is_none());
    assert!(store.list_expenses("nobody").unwrap().is_empty());
}

#[test]
fn users_are_isolated() {
    let (store, _tmp) = store();
    store
        .append_fill_up("a", &fill_up(FuelType::Gasoline, 100, 5.0, 1))
        .unwrap();
    assert_eq!(store.list_fill_ups("a").unwrap().len(), 1);
    assert!(store.list_fill_ups("b").unwrap().is_empty());
}

#[test]
fn no_temp_files_left_behind() {
    let (store, tmp) = store();
    store
        .append_fill_up("user-1", &fill_up(FuelType::Gasoline, 100, 5.0, 1))
        .unwrap();
    let names: Vec<String> = fs::read_dir(tmp.path().join("user-1"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["fill_ups.json".to_string()]);
}

// ---------------------------------------------------------------------------
// Corrupt files and bad ids
// ---------------------------------------------------------------------------

#[test]
fn corrupt_file_is_quarantined() {
    let (store, tmp) = store();
    let dir = tmp.path().join("user-1");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("fill_ups.json"), "[{\"fuelType\": ").unwrap();

    let err = store.list_fill_ups("user-1").unwrap_err();
    assert!(matches!(err, DrivewiseError::Corrupt(_)));
    assert!(!dir.join("fill_ups.json").exists());
    assert!(dir.join("fill_ups.json.corrupt").exists());

    // The next write starts a fresh document.
    store
        .append_fill_up("user-1", &fill_up(FuelType::Gasoline, 100, 5.0, 1))
        .unwrap();
    assert_eq!(store.list_fill_ups("user-1").unwrap().len(), 1);
}

#[test]
fn invalid_user_ids_are_rejected() {
    let (store, _tmp) = store();
    for bad in ["", "../etc", "a/b", "user 1", "ü"] {
        assert!(
            matches!(
                store.list_fill_ups(bad),
                Err(DrivewiseError::InvalidArgument(_))
            ),
            "accepted {bad:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Registration and odometer
// ---------------------------------------------------------------------------

#[test]
fn registration_round_trip_and_odometer_update() {
    let (store, _tmp) = store();
    let reg = registration("Fiat", "Uno", 2019, "Recife", 85_000);
    store.save_registration("user-1", &reg).unwrap();
    assert_eq!(store.registration("user-1").unwrap(), Some(reg));

    store.update_odometer("user-1", 86_000).unwrap();
    let updated = store.registration("user-1").unwrap().unwrap();
    assert_eq!(updated.vehicle.current_odometer_km, 86_000);
}

#[test]
fn odometer_update_without_registration_is_not_found() {
    let (store, _tmp) = store();
    assert!(matches!(
        store.update_odometer("user-1", 1_000),
        Err(DrivewiseError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[test]
fn saving_an_expense_twice_replaces_it() {
    let (store, _tmp) = store();
    let mut expense = Expense::manual("Parking", 10.0, Utc::now()).unwrap();
    store.save_expense("user-1", &expense).unwrap();
    expense.value = 12.0;
    store.save_expense("user-1", &expense).unwrap();

    let saved = store.list_expenses("user-1").unwrap();
    assert_eq!(saved, vec![expense]);
}

// ---------------------------------------------------------------------------
// Community scan
// ---------------------------------------------------------------------------

#[test]
fn community_scan_matches_brand_and_model() {
    let (store, _tmp) = store();
    store
        .save_registration("u1", &registration("Fiat", "Uno", 2019, "Recife", 1_000))
        .unwrap();
    store
        .save_registration("u2", &registration("fiat", "UNO", 2015, "Olinda", 1_000))
        .unwrap();
    store
        .save_registration("u3", &registration("Ford", "Ka", 2020, "Recife", 1_000))
        .unwrap();
    // A user with fill-ups but no registration is not part of the community.
    store
        .append_fill_up("u4", &fill_up(FuelType::Gasoline, 100, 5.0, 1))
        .unwrap();
    store
        .append_fill_up("u1", &fill_up(FuelType::Gasoline, 1_100, 5.0, 1))
        .unwrap();

    assert_eq!(store.users().unwrap(), vec!["u1", "u2", "u3", "u4"]);
    assert_eq!(store.entries().unwrap().len(), 3);

    let unos = store.community_entries("Fiat", "Uno").unwrap();
    assert_eq!(unos.len(), 2);
    assert_eq!(unos[0].user_id.as_deref(), Some("u1"));
    assert_eq!(unos[0].fill_ups.len(), 1);
}

#[test]
fn clear_user_removes_documents() {
    let (store, _tmp) = store();
    store
        .append_fill_up("user-1", &fill_up(FuelType::Gasoline, 100, 5.0, 1))
        .unwrap();
    store.clear_user("user-1").unwrap();
    assert!(store.list_fill_ups("user-1").unwrap().is_empty());
    assert!(store.users().unwrap().is_empty());
}
