//! Community aggregates grouped by brand, model and city.
//!
//! The community average for a fuel type is the mean of per-vehicle averages:
//! each vehicle's own yield series is averaged first, then those values are
//! averaged across vehicles. Raw liters and distances are never pooled across
//! vehicles, so a driver with many fill-ups weighs the same as one with few.

use crate::models::{CommunityAggregate, CommunityComparison, CommunityEntry, FillUpRecord, FuelType};

use super::{compute_yield, mean};

/// Mean km/L of one vehicle's `fuel_type` intervals, or `None` if it has none.
pub fn vehicle_average(history: &[FillUpRecord], fuel_type: FuelType) -> Option<f64> {
    let yields: Vec<f64> = compute_yield(history, fuel_type)
        .map(|p| p.km_per_liter)
        .collect();
    mean(&yields)
}

/// Aggregate the entries matching `brand`/`model` into a city-local and a
/// global partition.
///
/// Brand, model and city are compared case-insensitively. No matching entry
/// produces zero counts and zero efficiencies.
pub fn aggregate_community(
    entries: &[CommunityEntry],
    brand: &str,
    model: &str,
    city: &str,
) -> CommunityComparison {
    let matching: Vec<&CommunityEntry> = entries
        .iter()
        .filter(|e| e.vehicle.is_same_model(brand, model))
        .collect();
    let local: Vec<&CommunityEntry> = matching
        .iter()
        .copied()
        .filter(|e| e.driver.lives_in(city))
        .collect();

    CommunityComparison {
        local: aggregate(&local),
        global: aggregate(&matching),
    }
}

/// Average-of-averages aggregate over an already filtered partition.
pub(crate) fn aggregate(entries: &[&CommunityEntry]) -> CommunityAggregate {
    let mut result = CommunityAggregate {
        sample_count: entries.len(),
        ..CommunityAggregate::default()
    };

    for fuel in FuelType::ALL {
        let per_vehicle: Vec<f64> = entries
            .iter()
            .filter_map(|e| vehicle_average(&e.fill_ups, fuel))
            .collect();
        result.avg_efficiency.set(fuel, mean(&per_vehicle).unwrap_or(0.0));
    }

    result
}

/// Percent difference of the user's yield against the community average.
///
/// `None` when the community average is zero or negative or either value is
/// not finite.
pub fn diff_from_community(user_yield: f64, community_avg: f64) -> Option<f64> {
    if !user_yield.is_finite() || !community_avg.is_finite() || community_avg <= 0.0 {
        return None;
    }
    Some((user_yield - community_avg) / community_avg * 100.0)
}
