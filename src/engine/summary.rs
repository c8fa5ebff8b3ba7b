//! Personal history overview and the receipt shown after saving a fill-up.

use crate::models::{FillUpReceipt, FillUpRecord, FuelBreakdown, FuelType, HistorySummary};

use super::{compute_variation, compute_yield, YieldPoint};

/// Summarize a vehicle's whole history across fuel types.
///
/// Efficiency figures are pooled per fuel over that fuel's own intervals
/// (total distance over total liters), and the overall figures pool every
/// fuel's intervals together.
pub fn summarize(history: &[FillUpRecord]) -> HistorySummary {
    let fill_up_count = history.len();
    let total_spent: f64 = history.iter().map(|r| r.total_cost).sum();
    let first_at = history.iter().map(|r| r.timestamp).min();
    let last_at = history.iter().map(|r| r.timestamp).max();

    let odometer_span_km = if fill_up_count < 2 {
        0
    } else {
        let min = history.iter().map(|r| r.odometer_km).min().unwrap_or(0);
        let max = history.iter().map(|r| r.odometer_km).max().unwrap_or(0);
        max - min
    };

    let mut by_fuel = Vec::new();
    let mut overall = Pool::default();

    for fuel in FuelType::ALL {
        let records: Vec<&FillUpRecord> =
            history.iter().filter(|r| r.fuel_type == fuel).collect();
        if records.is_empty() {
            continue;
        }

        let mut pool = Pool::default();
        for point in compute_yield(history, fuel) {
            pool.add(&point);
            overall.add(&point);
        }

        by_fuel.push(FuelBreakdown {
            fuel_type: fuel,
            fill_ups: records.len(),
            spent: records.iter().map(|r| r.total_cost).sum(),
            share_percent: records.len() as f64 / fill_up_count as f64 * 100.0,
            km_per_liter: pool.km_per_liter(),
            cost_per_km: pool.cost_per_km(),
        });
    }

    // Strict `<` keeps the earliest fuel in `FuelType::ALL` order on ties.
    let mut cheapest: Option<(FuelType, f64)> = None;
    for b in &by_fuel {
        if let Some(cost) = b.cost_per_km {
            if cheapest.map_or(true, |(_, best)| cost < best) {
                cheapest = Some((b.fuel_type, cost));
            }
        }
    }

    HistorySummary {
        fill_up_count,
        total_spent,
        first_at,
        last_at,
        odometer_span_km,
        overall_km_per_liter: overall.km_per_liter(),
        overall_cost_per_km: overall.cost_per_km(),
        multiple_fuels: by_fuel.len() > 1,
        cheapest_fuel: cheapest.map(|(fuel, _)| fuel),
        by_fuel,
    }
}

#[derive(Default)]
struct Pool {
    distance_km: u64,
    liters: f64,
    cost: f64,
}

impl Pool {
    fn add(&mut self, point: &YieldPoint<'_>) {
        self.distance_km = self.distance_km.saturating_add(point.distance_km);
        self.liters += point.source.liters;
        self.cost += point.source.total_cost;
    }

    fn km_per_liter(&self) -> Option<f64> {
        (self.distance_km > 0 && self.liters > 0.0).then(|| self.distance_km as f64 / self.liters)
    }

    fn cost_per_km(&self) -> Option<f64> {
        (self.distance_km > 0).then(|| self.cost / self.distance_km as f64)
    }
}

/// Build the receipt for `record`, which has just been added to `history`.
///
/// `history` holds the records saved before `record`. The receipt carries the
/// interval that `record` closes (previous same-fuel fill-up to this one) and
/// that interval's variation against the one before it.
pub fn fill_up_receipt(history: &[FillUpRecord], record: &FillUpRecord) -> FillUpReceipt {
    let mut combined: Vec<FillUpRecord> = history.to_vec();
    combined.push(record.clone());
    let new_record = &combined[combined.len() - 1];

    let points: Vec<YieldPoint<'_>> = compute_yield(&combined, record.fuel_type).collect();
    let closing = points
        .iter()
        .position(|p| std::ptr::eq(p.next, new_record));

    let (interval, variation) = match closing {
        Some(i) => {
            let point = &points[i];
            let variation = i
                .checked_sub(1)
                .and_then(|prev| compute_variation(point.km_per_liter, points[prev].km_per_liter));
            (Some(point.to_summary()), variation)
        }
        None => (None, None),
    };

    FillUpReceipt {
        record: record.clone(),
        interval,
        variation,
    }
}
