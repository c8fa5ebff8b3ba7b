use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::fuel::FuelType;
use super::stats::FuelEfficiency;
use crate::config;

// ---------------------------------------------------------------------------
// OdometerRange
// ---------------------------------------------------------------------------

/// Inclusive odometer bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdometerRange {
    pub min_km: u64,
    pub max_km: u64,
}

impl OdometerRange {
    pub fn new(min_km: u64, max_km: u64) -> Self {
        Self { min_km, max_km }
    }

    pub fn contains(&self, km: u64) -> bool {
        km >= self.min_km && km <= self.max_km
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.min_km, self.max_km)
    }
}

// ---------------------------------------------------------------------------
// ReferencePrices
// ---------------------------------------------------------------------------

/// Price per liter assumed for each fuel when estimating cost per km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePrices {
    pub gasoline: f64,
    pub ethanol: f64,
    pub diesel: f64,
}

impl Default for ReferencePrices {
    fn default() -> Self {
        Self {
            gasoline: config::DEFAULT_GASOLINE_PRICE,
            ethanol: config::DEFAULT_ETHANOL_PRICE,
            diesel: config::DEFAULT_DIESEL_PRICE,
        }
    }
}

impl ReferencePrices {
    pub fn get(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Gasoline => self.gasoline,
            FuelType::Ethanol => self.ethanol,
            FuelType::Diesel => self.diesel,
        }
    }
}

// ---------------------------------------------------------------------------
// ComparisonFilter / ComparisonResult
// ---------------------------------------------------------------------------

/// One column of the vehicle comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonFilter {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub odometer_range: OdometerRange,
    #[serde(default)]
    pub fuel_types: BTreeSet<FuelType>,
}

impl ComparisonFilter {
    pub fn new(brand: &str, model: &str, year: i32, odometer_range: OdometerRange) -> Self {
        Self {
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            odometer_range,
            fuel_types: BTreeSet::new(),
        }
    }

    /// Stable identifier, e.g. `Fiat_Uno_2019_0-15000`.
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.brand,
            self.model,
            self.year,
            self.odometer_range.label()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub filter_id: String,
    pub total_make_model: usize,
    pub total_year: usize,
    pub total_km_range: usize,
    pub avg_efficiency: FuelEfficiency,
    pub cost_per_km: Option<f64>,
}

/// Best and worst filter ids for one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremes {
    pub best: Option<String>,
    pub worst: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRanking {
    pub gasoline: Extremes,
    pub ethanol: Extremes,
    pub diesel: Extremes,
    pub cost_per_km: Extremes,
}

impl ComparisonRanking {
    pub fn for_fuel(&self, fuel: FuelType) -> &Extremes {
        match fuel {
            FuelType::Gasoline => &self.gasoline,
            FuelType::Ethanol => &self.ethanol,
            FuelType::Diesel => &self.diesel,
        }
    }

    pub(crate) fn for_fuel_mut(&mut self, fuel: FuelType) -> &mut Extremes {
        match fuel {
            FuelType::Gasoline => &mut self.gasoline,
            FuelType::Ethanol => &mut self.ethanol,
            FuelType::Diesel => &mut self.diesel,
        }
    }
}
