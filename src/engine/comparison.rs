//! Side-by-side comparison of vehicle groups.
//!
//! Each filter narrows the community in three steps: brand/model, then year,
//! then odometer range. The statistics come from the narrowest step that
//! still has vehicles.

use crate::models::{
    CommunityEntry, ComparisonFilter, ComparisonRanking, ComparisonResult, Extremes, FuelType,
    ReferencePrices,
};

use super::community::aggregate;
use super::mean;

/// Statistics for one comparison filter.
///
/// `cost_per_km` averages price over efficiency across the fuels with data,
/// restricted to `filter.fuel_types` when that set is not empty.
pub fn compare(
    entries: &[CommunityEntry],
    filter: &ComparisonFilter,
    prices: &ReferencePrices,
) -> ComparisonResult {
    let make_model: Vec<&CommunityEntry> = entries
        .iter()
        .filter(|e| e.vehicle.is_same_model(&filter.brand, &filter.model))
        .collect();
    let same_year: Vec<&CommunityEntry> = make_model
        .iter()
        .copied()
        .filter(|e| e.vehicle.year == filter.year)
        .collect();
    let in_range: Vec<&CommunityEntry> = same_year
        .iter()
        .copied()
        .filter(|e| filter.odometer_range.contains(e.vehicle.current_odometer_km))
        .collect();

    let base: &[&CommunityEntry] = if !in_range.is_empty() {
        &in_range
    } else if !same_year.is_empty() {
        &same_year
    } else {
        &make_model
    };

    let avg_efficiency = aggregate(base).avg_efficiency;
    let costs: Vec<f64> = FuelType::ALL
        .iter()
        .filter(|fuel| filter.fuel_types.is_empty() || filter.fuel_types.contains(fuel))
        .filter_map(|&fuel| {
            avg_efficiency
                .available(fuel)
                .map(|eff| prices.get(fuel) / eff)
        })
        .collect();

    ComparisonResult {
        filter_id: filter.id(),
        total_make_model: make_model.len(),
        total_year: same_year.len(),
        total_km_range: in_range.len(),
        avg_efficiency,
        cost_per_km: mean(&costs),
    }
}

/// Best and worst filter per fuel efficiency (higher is better) and per cost
/// per km (lower is better). Zero efficiencies and missing costs are ignored.
pub fn rank(results: &[ComparisonResult]) -> ComparisonRanking {
    let mut ranking = ComparisonRanking::default();

    for fuel in FuelType::ALL {
        let values: Vec<(&str, f64)> = results
            .iter()
            .filter_map(|r| {
                r.avg_efficiency
                    .available(fuel)
                    .map(|v| (r.filter_id.as_str(), v))
            })
            .collect();
        *ranking.for_fuel_mut(fuel) = extremes(&values, true);
    }

    let costs: Vec<(&str, f64)> = results
        .iter()
        .filter_map(|r| r.cost_per_km.map(|c| (r.filter_id.as_str(), c)))
        .collect();
    ranking.cost_per_km = extremes(&costs, false);

    ranking
}

fn extremes(values: &[(&str, f64)], higher_is_better: bool) -> Extremes {
    let max = values
        .iter()
        .fold(None::<(&str, f64)>, |acc, &(id, v)| match acc {
            Some((_, best)) if best >= v => acc,
            _ => Some((id, v)),
        });
    let min = values
        .iter()
        .fold(None::<(&str, f64)>, |acc, &(id, v)| match acc {
            Some((_, best)) if best <= v => acc,
            _ => Some((id, v)),
        });

    let (best, worst) = if higher_is_better { (max, min) } else { (min, max) };
    Extremes {
        best: best.map(|(id, _)| id.to_string()),
        worst: worst.map(|(id, _)| id.to_string()),
    }
}
