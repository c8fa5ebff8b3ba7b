use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fill_up::FillUpRecord;
use super::fuel::FuelType;

// ---------------------------------------------------------------------------
// FuelEfficiency: km/L per fuel type
// ---------------------------------------------------------------------------

/// One value per fuel type. Zero means "no valid samples".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEfficiency {
    #[serde(alias = "gasolina")]
    pub gasoline: f64,
    #[serde(alias = "alcool", alias = "alcohol")]
    pub ethanol: f64,
    pub diesel: f64,
}

impl FuelEfficiency {
    pub fn get(&self, fuel: FuelType) -> f64 {
        match fuel {
            FuelType::Gasoline => self.gasoline,
            FuelType::Ethanol => self.ethanol,
            FuelType::Diesel => self.diesel,
        }
    }

    pub fn set(&mut self, fuel: FuelType, value: f64) {
        match fuel {
            FuelType::Gasoline => self.gasoline = value,
            FuelType::Ethanol => self.ethanol = value,
            FuelType::Diesel => self.diesel = value,
        }
    }

    /// The value for `fuel`, or `None` when it is zero.
    pub fn available(&self, fuel: FuelType) -> Option<f64> {
        let v = self.get(fuel);
        (v > 0.0).then_some(v)
    }
}

// ---------------------------------------------------------------------------
// Variation
// ---------------------------------------------------------------------------

/// Period-over-period change in yield.
///
/// `improved` is true only for a strictly positive change, so a tie reads as
/// "not improved".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub percent: f64,
    pub improved: bool,
}

// ---------------------------------------------------------------------------
// IntervalSummary: Owned copy of one yield data point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalSummary {
    pub distance_km: u64,
    pub km_per_liter: f64,
    pub cost_per_km: f64,
    /// The earlier fill-up, whose liters were burned over this interval.
    pub source: FillUpRecord,
    pub closed_at: DateTime<Utc>,
}

/// Most recent interval of one fuel type plus its change over the one before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestEfficiency {
    pub fuel_type: FuelType,
    pub interval: IntervalSummary,
    pub variation: Option<Variation>,
}

/// Result of saving a fill-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillUpReceipt {
    pub record: FillUpRecord,
    /// Interval closed by this fill-up, if the previous same-fuel record
    /// forms a valid pair with it.
    pub interval: Option<IntervalSummary>,
    pub variation: Option<Variation>,
}

// ---------------------------------------------------------------------------
// Community aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAggregate {
    pub sample_count: usize,
    pub avg_efficiency: FuelEfficiency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityComparison {
    pub local: CommunityAggregate,
    pub global: CommunityAggregate,
}

/// One user's standing against the community for one fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStanding {
    pub fuel_type: FuelType,
    pub user_km_per_liter: Option<f64>,
    pub community_km_per_liter: Option<f64>,
    /// Percent above (positive) or below the community average.
    pub percent_diff: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityView {
    pub brand: String,
    pub model: String,
    pub city: String,
    pub community: CommunityComparison,
    pub standings: Vec<FuelStanding>,
}

// ---------------------------------------------------------------------------
// HistorySummary: Personal overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelBreakdown {
    pub fuel_type: FuelType,
    pub fill_ups: usize,
    pub spent: f64,
    pub share_percent: f64,
    pub km_per_liter: Option<f64>,
    pub cost_per_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub fill_up_count: usize,
    pub total_spent: f64,
    pub first_at: Option<DateTime<Utc>>,
    pub last_at: Option<DateTime<Utc>>,
    pub odometer_span_km: u64,
    pub overall_km_per_liter: Option<f64>,
    pub overall_cost_per_km: Option<f64>,
    pub by_fuel: Vec<FuelBreakdown>,
    pub cheapest_fuel: Option<FuelType>,
    pub multiple_fuels: bool,
}
