use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fill_up::FillUpRecord;
use crate::error::{DrivewiseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Fuel,
    Manual,
}

// ---------------------------------------------------------------------------
// Expense: Ledger line, either a fill-up or a manual entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: DateTime<Utc>,
    pub title: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km_driven: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

impl Expense {
    /// Build a manual expense with a fresh id.
    pub fn manual(title: &str, value: f64, date: DateTime<Utc>) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DrivewiseError::Validation(
                "Expense title must not be empty".to_string(),
            ));
        }
        if !value.is_finite() || value <= 0.0 {
            return Err(DrivewiseError::Validation(format!(
                "Expense value must be positive, got {}",
                value
            )));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            date,
            title: title.to_string(),
            value,
            kind: ExpenseKind::Manual,
            liters: None,
            km_driven: None,
            efficiency: None,
        })
    }

    /// Ledger view of a fill-up.
    ///
    /// The id is derived from the record's timestamp and odometer so the same
    /// fill-up always maps to the same ledger line.
    pub fn from_fill_up(record: &FillUpRecord) -> Self {
        Self {
            id: format!(
                "fuel-{}-{}",
                record.timestamp.timestamp_millis(),
                record.odometer_km
            ),
            date: record.timestamp,
            title: "Fill-up".to_string(),
            value: record.total_cost,
            kind: ExpenseKind::Fuel,
            liters: Some(record.liters),
            km_driven: None,
            efficiency: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ExpenseTotals: Spending over the standard ledger windows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotals {
    pub total: f64,
    pub last_week: f64,
    pub last_month: f64,
    pub year_to_date: f64,
}
