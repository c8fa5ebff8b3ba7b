//! The user's own efficiency figures.

use crate::engine;
use crate::error::Result;
use crate::models::{FuelType, HistorySummary, IntervalSummary, LatestEfficiency};
use crate::FuelTracker;

pub struct PersonalQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> PersonalQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    /// Every valid interval of `fuel_type`, oldest first.
    pub fn yield_series(&self, user_id: &str, fuel_type: FuelType) -> Result<Vec<IntervalSummary>> {
        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        Ok(engine::compute_yield(&history, fuel_type)
            .map(|p| p.to_summary())
            .collect())
    }

    /// Most recent interval of `fuel_type` and its change over the previous one.
    pub fn latest(&self, user_id: &str, fuel_type: FuelType) -> Result<Option<LatestEfficiency>> {
        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        Ok(engine::latest_efficiency(&history, fuel_type))
    }

    /// [`latest`](Self::latest) for every fuel type that has an interval.
    pub fn latest_all(&self, user_id: &str) -> Result<Vec<LatestEfficiency>> {
        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        Ok(FuelType::ALL
            .iter()
            .filter_map(|&fuel| engine::latest_efficiency(&history, fuel))
            .collect())
    }

    pub fn summary(&self, user_id: &str) -> Result<HistorySummary> {
        let history = self.tracker.fill_ups.list_fill_ups(user_id)?;
        Ok(engine::summarize(&history))
    }
}
