//! Fuel-efficiency and cost statistics.
//!
//! Every function here is pure: it takes in-memory snapshots of fill-up
//! records and returns new values. Bad data never raises an error. Invalid
//! pairs are skipped, and a statistic that cannot be computed comes back as
//! an empty series or `None`.
//!
//! # Ordering
//!
//! Histories are read in chronological order (ascending `timestamp`, ties in
//! input order). Odometer readings are never used to reorder records, so an
//! odometer typed out of order produces a non-positive distance and that
//! pair is dropped.

pub mod community;
pub mod comparison;
pub mod ledger;
pub mod summary;

pub use community::{aggregate_community, diff_from_community, vehicle_average};
pub use comparison::{compare, rank};
pub use ledger::expense_totals;
pub use summary::{fill_up_receipt, summarize};

use serde::Serialize;

use crate::models::{FillUpRecord, FuelType, IntervalSummary, LatestEfficiency, Variation};

// ---------------------------------------------------------------------------
// YieldPoint
// ---------------------------------------------------------------------------

/// Efficiency over the distance driven between two consecutive fill-ups of
/// the same fuel type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPoint<'a> {
    pub distance_km: u64,
    pub km_per_liter: f64,
    pub cost_per_km: f64,
    /// The earlier fill-up. Its liters and cost are what the distance consumed.
    pub source: &'a FillUpRecord,
    /// The later fill-up, whose odometer reading closes the interval.
    pub next: &'a FillUpRecord,
}

impl<'a> YieldPoint<'a> {
    /// Build the point for `(previous, current)`, or `None` if the pair is
    /// unusable (non-positive distance, liters or cost).
    pub fn between(previous: &'a FillUpRecord, current: &'a FillUpRecord) -> Option<Self> {
        let distance = current.odometer_km as i128 - previous.odometer_km as i128;
        if distance <= 0 {
            return None;
        }
        if !is_positive(previous.liters) || !is_positive(previous.total_cost) {
            return None;
        }

        let distance_km = distance as u64;
        let km_per_liter = distance_km as f64 / previous.liters;
        let cost_per_km = previous.total_cost / distance_km as f64;
        if !km_per_liter.is_finite() || !cost_per_km.is_finite() {
            return None;
        }

        Some(Self {
            distance_km,
            km_per_liter,
            cost_per_km,
            source: previous,
            next: current,
        })
    }

    pub fn to_summary(&self) -> IntervalSummary {
        IntervalSummary {
            distance_km: self.distance_km,
            km_per_liter: self.km_per_liter,
            cost_per_km: self.cost_per_km,
            source: self.source.clone(),
            closed_at: self.next.timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// YieldSeries
// ---------------------------------------------------------------------------

/// Lazy sequence of [`YieldPoint`]s for one fuel type, oldest interval first.
pub struct YieldSeries<'a> {
    records: Vec<&'a FillUpRecord>,
    index: usize,
}

impl<'a> Iterator for YieldSeries<'a> {
    type Item = YieldPoint<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index + 1 < self.records.len() {
            let previous = self.records[self.index];
            let current = self.records[self.index + 1];
            self.index += 1;
            if let Some(point) = YieldPoint::between(previous, current) {
                return Some(point);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pairs = self.records.len().saturating_sub(self.index + 1);
        (0, Some(pairs))
    }
}

/// Compute the yield series of `fuel_type` over a vehicle's history.
///
/// The history may contain every fuel type and be in any order. Records are
/// filtered to `fuel_type` and sorted chronologically before pairing. Fewer
/// than two matching records yield an empty series.
pub fn compute_yield(history: &[FillUpRecord], fuel_type: FuelType) -> YieldSeries<'_> {
    let mut records: Vec<&FillUpRecord> = history
        .iter()
        .filter(|r| r.fuel_type == fuel_type)
        .collect();
    records.sort_by_key(|r| r.timestamp);
    YieldSeries { records, index: 0 }
}

// ---------------------------------------------------------------------------
// Variation
// ---------------------------------------------------------------------------

/// Percentage change from `previous_yield` to `latest_yield`.
///
/// Returns `None` when the previous yield is zero or negative, or when either
/// input is not finite.
pub fn compute_variation(latest_yield: f64, previous_yield: f64) -> Option<Variation> {
    if !latest_yield.is_finite() || !previous_yield.is_finite() || previous_yield <= 0.0 {
        return None;
    }
    let percent = (latest_yield - previous_yield) / previous_yield * 100.0;
    Some(Variation {
        percent,
        improved: percent > 0.0,
    })
}

/// Variation between the two most recent intervals of `fuel_type`.
///
/// Needs at least two valid intervals (three records).
pub fn latest_variation(history: &[FillUpRecord], fuel_type: FuelType) -> Option<Variation> {
    let points: Vec<YieldPoint<'_>> = compute_yield(history, fuel_type).collect();
    variation_of_last_two(&points)
}

/// Most recent interval of `fuel_type` and its variation, if any interval exists.
pub fn latest_efficiency(history: &[FillUpRecord], fuel_type: FuelType) -> Option<LatestEfficiency> {
    let points: Vec<YieldPoint<'_>> = compute_yield(history, fuel_type).collect();
    let last = points.last()?;
    Some(LatestEfficiency {
        fuel_type,
        interval: last.to_summary(),
        variation: variation_of_last_two(&points),
    })
}

fn variation_of_last_two(points: &[YieldPoint<'_>]) -> Option<Variation> {
    match points {
        [.., previous, latest] => compute_variation(latest.km_per_liter, previous.km_per_liter),
        _ => None,
    }
}

pub(crate) fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
