//! Vehicle and driver registration.

use crate::error::Result;
use crate::models::Registration;
use crate::FuelTracker;

pub struct RegistrationQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> RegistrationQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    pub fn get(&self, user_id: &str) -> Result<Option<Registration>> {
        self.tracker.vehicles.registration(user_id)
    }

    /// Validate and save the registration, replacing any earlier one.
    pub fn save(&self, user_id: &str, registration: &Registration) -> Result<()> {
        registration.validate()?;
        self.tracker
            .vehicles
            .save_registration(user_id, registration)?;
        tracing::info!(
            user_id,
            brand = %registration.vehicle.brand,
            model = %registration.vehicle.model,
            "vehicle registered"
        );
        Ok(())
    }

    /// Set the vehicle's odometer reading without recording a fill-up.
    pub fn update_odometer(&self, user_id: &str, odometer_km: u64) -> Result<()> {
        self.tracker.vehicles.update_odometer(user_id, odometer_km)
    }
}
