use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DrivewiseError;

// ---------------------------------------------------------------------------
// FuelType
// ---------------------------------------------------------------------------

/// Fuel accepted by a vehicle and recorded on every fill-up.
///
/// Serialized in lowercase English; the Portuguese names used by older
/// stored data are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[serde(alias = "Gasoline", alias = "Gasolina", alias = "gasolina")]
    Gasoline,
    #[serde(
        alias = "Ethanol",
        alias = "Álcool",
        alias = "álcool",
        alias = "Alcool",
        alias = "alcool",
        alias = "Etanol",
        alias = "etanol",
        alias = "Alcohol",
        alias = "alcohol"
    )]
    Ethanol,
    #[serde(alias = "Diesel")]
    Diesel,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::Gasoline, FuelType::Ethanol, FuelType::Diesel];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Ethanol => "ethanol",
            FuelType::Diesel => "diesel",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = DrivewiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gasoline" | "gasolina" => Ok(FuelType::Gasoline),
            "ethanol" | "álcool" | "alcool" | "etanol" | "alcohol" => Ok(FuelType::Ethanol),
            "diesel" => Ok(FuelType::Diesel),
            other => Err(DrivewiseError::InvalidArgument(format!(
                "Unknown fuel type: {}",
                other
            ))),
        }
    }
}
