use std::collections::BTreeSet;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::fill_up::FillUpRecord;
use super::fuel::FuelType;
use crate::error::{DrivewiseError, Result};

// ---------------------------------------------------------------------------
// VehicleProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    #[serde(alias = "marca")]
    pub brand: String,
    #[serde(alias = "modelo")]
    pub model: String,
    #[serde(alias = "ano")]
    pub year: i32,
    #[serde(alias = "quilometragem")]
    pub current_odometer_km: u64,
    #[serde(alias = "combustiveisAceitos")]
    pub accepted_fuel_types: BTreeSet<FuelType>,
    #[serde(alias = "modificacoes", default, skip_serializing_if = "Option::is_none")]
    pub modifications: Option<String>,
}

impl VehicleProfile {
    /// Case-insensitive brand/model identity check used for community grouping.
    pub fn is_same_model(&self, brand: &str, model: &str) -> bool {
        eq_ignore_case(&self.brand, brand) && eq_ignore_case(&self.model, model)
    }

    pub fn accepts(&self, fuel: FuelType) -> bool {
        self.accepted_fuel_types.contains(&fuel)
    }
}

// ---------------------------------------------------------------------------
// DriverProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    #[serde(alias = "estilo")]
    pub style: String,
    #[serde(alias = "ruas")]
    pub roads: String,
    #[serde(alias = "frequencia")]
    pub frequency: String,
    #[serde(alias = "estado")]
    pub state: String,
    #[serde(alias = "cidade")]
    pub city: String,
}

impl DriverProfile {
    pub fn lives_in(&self, city: &str) -> bool {
        eq_ignore_case(&self.city, city)
    }
}

// ---------------------------------------------------------------------------
// Registration: Vehicle + driver pair owned by one user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(alias = "veiculo")]
    pub vehicle: VehicleProfile,
    #[serde(alias = "condutor")]
    pub driver: DriverProfile,
}

impl Registration {
    /// Check that every required field is filled in.
    pub fn validate(&self) -> Result<()> {
        let v = &self.vehicle;
        let d = &self.driver;
        let required = [
            ("brand", v.brand.as_str()),
            ("model", v.model.as_str()),
            ("style", d.style.as_str()),
            ("roads", d.roads.as_str()),
            ("frequency", d.frequency.as_str()),
            ("state", d.state.as_str()),
            ("city", d.city.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DrivewiseError::Validation(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }

        let max_year = Utc::now().year() + 1;
        if v.year < 1900 || v.year > max_year {
            return Err(DrivewiseError::Validation(format!(
                "Vehicle year {} outside 1900..={}",
                v.year, max_year
            )));
        }

        if v.accepted_fuel_types.is_empty() {
            return Err(DrivewiseError::Validation(
                "At least one accepted fuel type is required".to_string(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CommunityEntry: One vehicle's data as seen by the community views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEntry {
    #[serde(alias = "uid", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(alias = "veiculo")]
    pub vehicle: VehicleProfile,
    #[serde(alias = "condutor")]
    pub driver: DriverProfile,
    #[serde(alias = "abastecimentos", default)]
    pub fill_ups: Vec<FillUpRecord>,
}

impl CommunityEntry {
    pub fn new(
        user_id: Option<String>,
        registration: Registration,
        fill_ups: Vec<FillUpRecord>,
    ) -> Self {
        Self {
            user_id,
            vehicle: registration.vehicle,
            driver: registration.driver,
            fill_ups,
        }
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Known brand/model pairs offered by the registration form.
pub mod catalog {
    const CATALOG: &[(&str, &[&str])] = &[
        ("Fiat", &["Uno", "Argo", "Toro", "Mobi"]),
        ("Chevrolet", &["Onix", "Tracker", "S10", "Spin"]),
        ("Volkswagen", &["Gol", "Polo", "Virtus", "T-Cross"]),
        ("Toyota", &["Corolla", "Hilux", "Yaris", "Etios"]),
        ("Ford", &["Ka", "EcoSport", "Ranger", "Fusion"]),
        ("Renault", &["Kwid", "Duster", "Logan", "Sandero"]),
    ];

    pub fn brands() -> Vec<&'static str> {
        CATALOG.iter().map(|(brand, _)| *brand).collect()
    }

    /// Models for a brand (case-insensitive), or `None` for an unknown brand.
    pub fn models_for(brand: &str) -> Option<&'static [&'static str]> {
        CATALOG
            .iter()
            .find(|(b, _)| b.eq_ignore_ascii_case(brand.trim()))
            .map(|(_, models)| *models)
    }
}
