//! Expense ledger totals and expense construction.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{fill_up, assert_close};
use drivewise::engine::expense_totals;
use drivewise::engine::ledger::sort_newest_first;
use drivewise::{DrivewiseError, Expense, ExpenseKind, FuelType};

#[test]
fn totals_follow_the_ledger_windows() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let expenses = vec![
        Expense::manual("Oil change", 100.0, now - Duration::days(2)).unwrap(),
        Expense::manual("Tires", 400.0, now - Duration::days(20)).unwrap(),
        Expense::manual("Insurance", 1_000.0, now - Duration::days(60)).unwrap(),
        Expense::manual("Inspection", 50.0, Utc.with_ymd_and_hms(2023, 12, 20, 0, 0, 0).unwrap())
            .unwrap(),
    ];

    let totals = expense_totals(&expenses, now);
    assert_close(totals.total, 1_550.0);
    assert_close(totals.last_week, 100.0);
    assert_close(totals.last_month, 500.0);
    assert_close(totals.year_to_date, 1_500.0);
}

#[test]
fn window_start_is_inclusive() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let expenses = vec![Expense::manual("Wash", 30.0, now - Duration::days(7)).unwrap()];
    assert_close(expense_totals(&expenses, now).last_week, 30.0);
}

#[test]
fn empty_ledger_totals_are_zero() {
    let totals = expense_totals(&[], Utc::now());
    assert_eq!(totals.total, 0.0);
    assert_eq!(totals.year_to_date, 0.0);
}

#[test]
fn manual_expense_validation() {
    let now = Utc::now();
    assert!(matches!(
        Expense::manual("  ", 10.0, now),
        Err(DrivewiseError::Validation(_))
    ));
    assert!(matches!(
        Expense::manual("Parking", 0.0, now),
        Err(DrivewiseError::Validation(_))
    ));

    let a = Expense::manual(" Parking ", 12.5, now).unwrap();
    let b = Expense::manual("Parking", 12.5, now).unwrap();
    assert_eq!(a.title, "Parking");
    assert_eq!(a.kind, ExpenseKind::Manual);
    assert_ne!(a.id, b.id);
}

#[test]
fn fuel_expense_from_fill_up() {
    let record = fill_up(FuelType::Ethanol, 85_000, 40.0, 5);
    let expense = Expense::from_fill_up(&record);

    assert_eq!(expense.kind, ExpenseKind::Fuel);
    assert_eq!(expense.value, 200.0);
    assert_eq!(expense.liters, Some(40.0));
    assert_eq!(expense.date, record.timestamp);
    assert_eq!(expense.id, Expense::from_fill_up(&record).id);
}

#[test]
fn newest_first() {
    let now = Utc::now();
    let mut expenses = vec![
        Expense::manual("old", 1.0, now - Duration::days(3)).unwrap(),
        Expense::manual("new", 1.0, now).unwrap(),
        Expense::manual("mid", 1.0, now - Duration::days(1)).unwrap(),
    ];
    sort_newest_first(&mut expenses);
    let titles: Vec<&str> = expenses.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["new", "mid", "old"]);
}

#[test]
fn expense_json_uses_type_field() {
    let expense = Expense::manual("Parking", 12.5, Utc::now()).unwrap();
    let json = serde_json::to_value(&expense).unwrap();
    assert_eq!(json["type"], "manual");
    assert!(json.get("kmDriven").is_none());
}
