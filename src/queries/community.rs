//! Community averages for a brand and model, split into the user's city
//! and everyone else.

use crate::engine;
use crate::error::{DrivewiseError, Result};
use crate::models::{CommunityComparison, CommunityView, FuelStanding, FuelType};
use crate::FuelTracker;

pub struct CommunityQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> CommunityQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    /// Local (same city) and global averages for `brand`/`model`.
    pub fn aggregate(&self, brand: &str, model: &str, city: &str) -> Result<CommunityComparison> {
        let entries = self.tracker.community.community_entries(brand, model)?;
        Ok(engine::aggregate_community(&entries, brand, model, city))
    }

    /// How the user's latest yields stand against drivers of the same vehicle.
    ///
    /// Each standing compares against the city average when the city has one
    /// for that fuel, and against the global average otherwise. Fuels the
    /// vehicle does not accept are listed only if the user has data for them.
    pub fn for_user(&self, user_id: &str) -> Result<CommunityView> {
        let registration = self
            .tracker
            .vehicles
            .registration(user_id)?
            .ok_or_else(|| {
                DrivewiseError::NotFound(format!("No vehicle registered for user {}", user_id))
            })?;
        let vehicle = &registration.vehicle;
        let city = &registration.driver.city;

        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        let community = self.aggregate(&vehicle.brand, &vehicle.model, city)?;

        let standings = FuelType::ALL
            .iter()
            .filter_map(|&fuel| {
                let user = engine::latest_efficiency(&history, fuel).map(|l| l.interval.km_per_liter);
                if user.is_none() && !vehicle.accepts(fuel) {
                    return None;
                }
                let reference = community
                    .local
                    .avg_efficiency
                    .available(fuel)
                    .or_else(|| community.global.avg_efficiency.available(fuel));
                let percent_diff = match (user, reference) {
                    (Some(u), Some(c)) => engine::diff_from_community(u, c),
                    _ => None,
                };
                Some(FuelStanding {
                    fuel_type: fuel,
                    user_km_per_liter: user,
                    community_km_per_liter: reference,
                    percent_diff,
                })
            })
            .collect();

        Ok(CommunityView {
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            city: city.clone(),
            community,
            standings,
        })
    }
}
