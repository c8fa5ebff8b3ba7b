use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fuel::FuelType;
use crate::error::{DrivewiseError, Result};

// ---------------------------------------------------------------------------
// FillUpRecord: One fueling event
// ---------------------------------------------------------------------------

/// A single fill-up. Created once by "save fill-up" and never mutated.
///
/// `total_cost` is expected to be close to `price_per_liter * liters`, but
/// this is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillUpRecord {
    #[serde(alias = "tipo")]
    pub fuel_type: FuelType,
    #[serde(alias = "preco")]
    pub price_per_liter: f64,
    #[serde(alias = "total")]
    pub total_cost: f64,
    #[serde(alias = "litros")]
    pub liters: f64,
    #[serde(alias = "km")]
    pub odometer_km: u64,
    #[serde(alias = "data")]
    pub timestamp: DateTime<Utc>,
}

impl FillUpRecord {
    pub fn new(
        fuel_type: FuelType,
        price_per_liter: f64,
        total_cost: f64,
        liters: f64,
        odometer_km: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            fuel_type,
            price_per_liter,
            total_cost,
            liters,
            odometer_km,
            timestamp,
        }
    }

    /// True when liters, total cost and price are all finite and positive.
    pub fn is_valid(&self) -> bool {
        positive(self.liters) && positive(self.total_cost) && positive(self.price_per_liter)
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

// ---------------------------------------------------------------------------
// FillUpDraft: Form input where any two amounts determine the third
// ---------------------------------------------------------------------------

/// Partially filled fill-up amounts as typed into the fill-up form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FillUpDraft {
    pub price_per_liter: Option<f64>,
    pub total_cost: Option<f64>,
    pub liters: Option<f64>,
}

/// The three amounts of a fill-up after [`FillUpDraft::complete`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillUpAmounts {
    pub price_per_liter: f64,
    pub total_cost: f64,
    pub liters: f64,
}

impl FillUpDraft {
    pub fn new(price_per_liter: Option<f64>, total_cost: Option<f64>, liters: Option<f64>) -> Self {
        Self {
            price_per_liter,
            total_cost,
            liters,
        }
    }

    /// Derive the missing amount from the other two.
    ///
    /// The derived value is rounded to two decimals. When all three are
    /// present they are returned unchanged.
    pub fn complete(&self) -> Result<FillUpAmounts> {
        let price = self.price_per_liter.filter(|v| v.is_finite());
        let total = self.total_cost.filter(|v| v.is_finite());
        let liters = self.liters.filter(|v| v.is_finite());

        let (price_per_liter, total_cost, liters) = match (price, total, liters) {
            (Some(p), Some(t), Some(l)) => (p, t, l),
            (Some(p), Some(t), None) => (p, t, round2(divide(t, p, "price per liter")?)),
            (Some(p), None, Some(l)) => (p, round2(p * l), l),
            (None, Some(t), Some(l)) => (round2(divide(t, l, "liters")?), t, l),
            _ => {
                return Err(DrivewiseError::Validation(
                    "At least two of price per liter, total cost and liters are required"
                        .to_string(),
                ))
            }
        };

        if !(positive(price_per_liter) && positive(total_cost) && positive(liters)) {
            return Err(DrivewiseError::Validation(
                "Fill-up amounts must be positive".to_string(),
            ));
        }

        Ok(FillUpAmounts {
            price_per_liter,
            total_cost,
            liters,
        })
    }

    /// Complete the amounts and build a record.
    pub fn into_record(
        self,
        fuel_type: FuelType,
        odometer_km: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<FillUpRecord> {
        let amounts = self.complete()?;
        Ok(FillUpRecord::new(
            fuel_type,
            amounts.price_per_liter,
            amounts.total_cost,
            amounts.liters,
            odometer_km,
            timestamp,
        ))
    }
}

fn divide(numerator: f64, denominator: f64, what: &str) -> Result<f64> {
    if denominator <= 0.0 {
        return Err(DrivewiseError::Validation(format!(
            "Cannot derive amount: {} must be positive",
            what
        )));
    }
    Ok(numerator / denominator)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
