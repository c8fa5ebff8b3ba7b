//! Vehicle comparison screen: several brand/model/year/odometer groups side by side.

use std::collections::HashMap;

use crate::engine;
use crate::error::Result;
use crate::models::{CommunityEntry, ComparisonFilter, ComparisonRanking, ComparisonResult};
use crate::FuelTracker;

pub struct ComparisonQuery<'a> {
    tracker: &'a FuelTracker,
}

impl<'a> ComparisonQuery<'a> {
    pub fn new(tracker: &'a FuelTracker) -> Self {
        Self { tracker }
    }

    /// One result per filter, in filter order.
    ///
    /// Community entries are fetched once per distinct brand/model.
    pub fn compare(&self, filters: &[ComparisonFilter]) -> Result<Vec<ComparisonResult>> {
        let prices = &self.tracker.settings.reference_prices;
        let mut fetched: HashMap<(String, String), Vec<CommunityEntry>> = HashMap::new();
        let mut results = Vec::with_capacity(filters.len());

        for filter in filters {
            let key = (
                filter.brand.trim().to_lowercase(),
                filter.model.trim().to_lowercase(),
            );
            if !fetched.contains_key(&key) {
                let entries = self
                    .tracker
                    .community
                    .community_entries(&filter.brand, &filter.model)?;
                fetched.insert(key.clone(), entries);
            }
            let entries = fetched.get(&key).map(Vec::as_slice).unwrap_or(&[]);
            results.push(engine::compare(entries, filter, prices));
        }

        Ok(results)
    }

    /// Best and worst groups per fuel and per cost.
    pub fn rank(&self, results: &[ComparisonResult]) -> ComparisonRanking {
        engine::rank(results)
    }
}
