//! Recording and listing fill-ups.

use chrono::{DateTime, Utc};

use crate::engine;
use crate::error::{DrivewiseError, Result};
use crate::models::{FillUpDraft, FillUpReceipt, FillUpRecord, FuelType};
use crate::FuelTracker;

/// Query interface for a user's fill-up history.
pub struct FillUpQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> FillUpQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    /// All fill-ups of the user, in the order they were saved.
    pub fn list(&self, user_id: &str) -> Result<Vec<FillUpRecord>> {
        self.tracker.fill_ups.list_fill_ups(user_id)
    }

    /// Fill-ups of one fuel type, oldest first.
    pub fn list_by_fuel(&self, user_id: &str, fuel_type: FuelType) -> Result<Vec<FillUpRecord>> {
        let mut records: Vec<FillUpRecord> = self
            .list(user_id)?
            .into_iter()
            .filter(|r| r.fuel_type == fuel_type)
            .collect();
        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }

    /// Save a fill-up and return what it tells about efficiency.
    ///
    /// The amounts must be positive. When the user has a registered vehicle,
    /// the fuel type must be one it accepts and the vehicle's odometer is
    /// moved to the new reading. A reading below the current odometer is
    /// saved anyway, with a warning.
    pub fn record(&self, user_id: &str, record: FillUpRecord) -> Result<FillUpReceipt> {
        if !record.is_valid() {
            return Err(DrivewiseError::Validation(format!(
                "Fill-up amounts must be positive (price {}, total {}, liters {})",
                record.price_per_liter, record.total_cost, record.liters
            )));
        }

        let registration = self.tracker.vehicles.registration(user_id)?;
        if let Some(reg) = &registration {
            if !reg.vehicle.accepts(record.fuel_type) {
                return Err(DrivewiseError::Validation(format!(
                    "{} {} does not take {}",
                    reg.vehicle.brand, reg.vehicle.model, record.fuel_type
                )));
            }
            if record.odometer_km < reg.vehicle.current_odometer_km {
                tracing::warn!(
                    user_id,
                    odometer_km = record.odometer_km,
                    current_km = reg.vehicle.current_odometer_km,
                    "fill-up odometer is below the vehicle's current reading"
                );
            }
        }

        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        self.tracker.fill_ups.append_fill_up(user_id, &record)?;
        // The fill-up is saved at this point, so an odometer failure is only logged.
        if registration.is_some() {
            if let Err(e) = self
                .tracker
                .vehicles
                .update_odometer(user_id, record.odometer_km)
            {
                tracing::warn!(
                    user_id,
                    odometer_km = record.odometer_km,
                    error = %e,
                    "could not update the vehicle odometer"
                );
            }
        }

        let receipt = engine::fill_up_receipt(&history, &record);
        tracing::info!(
            user_id,
            fuel = %record.fuel_type,
            odometer_km = record.odometer_km,
            km_per_liter = receipt.interval.as_ref().map(|i| i.km_per_liter),
            "fill-up recorded"
        );
        Ok(receipt)
    }

    /// Complete a form draft (any two of price, total, liters) and record it.
    pub fn record_draft(
        &self,
        user_id: &str,
        fuel_type: FuelType,
        draft: FillUpDraft,
        odometer_km: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<FillUpReceipt> {
        let record = draft.into_record(fuel_type, odometer_km, timestamp)?;
        self.record(user_id, record)
    }
}
