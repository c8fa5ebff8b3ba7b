//! Blocking client for the DriveWise REST backend.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CommunitySource, FillUpRepository, VehicleRepository};
use crate::config;
use crate::error::Result;
use crate::models::{
    CommunityComparison, CommunityEntry, DriverProfile, FillUpRecord, Registration,
    VehicleProfile,
};

#[derive(Serialize)]
struct RegistrationBody<'a> {
    uid: &'a str,
    veiculo: &'a VehicleProfile,
    condutor: &'a DriverProfile,
}

#[derive(Serialize)]
struct FillUpBody<'a> {
    uid: &'a str,
    #[serde(flatten)]
    record: &'a FillUpRecord,
}

#[derive(Serialize)]
struct OdometerBody {
    quilometragem: u64,
}

/// Talks to the backend routes under a base URL.
///
/// Fill-ups, registrations and community data go through this client when
/// the tracker is configured with an API URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        Ok(self.client.get(&url).send()?)
    }

    /// GET a JSON list and parse each element on its own, dropping the ones
    /// that do not deserialize.
    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let raw: Vec<serde_json::Value> = self.get(path)?.error_for_status()?.json()?;
        Ok(parse_each(raw, path))
    }

    /// Precomputed community statistics from `GET /estatisticas`.
    pub fn statistics(&self, brand: &str, model: &str, city: &str) -> Result<CommunityComparison> {
        let url = self.url(config::STATISTICS_PATH);
        tracing::debug!(%url, brand, model, city, "GET");
        let resp = self
            .client
            .get(&url)
            .query(&[("marca", brand), ("modelo", model), ("cidade", city)])
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    /// Every community entry the backend knows about.
    pub fn all_entries(&self) -> Result<Vec<CommunityEntry>> {
        self.get_list(config::VEHICLES_PATH)
    }
}

fn parse_each<T: DeserializeOwned>(raw: Vec<serde_json::Value>, path: &str) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(path, index = i, error = %e, "skipping invalid item");
                None
            }
        })
        .collect()
}

impl FillUpRepository for ApiClient {
    fn list_fill_ups(&self, user_id: &str) -> Result<Vec<FillUpRecord>> {
        let resp = self.get(&format!("{}/{}", config::FILL_UPS_PATH, user_id))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let raw: Vec<serde_json::Value> = resp.error_for_status()?.json()?;
        Ok(parse_each(raw, config::FILL_UPS_PATH))
    }

    fn append_fill_up(&self, user_id: &str, record: &FillUpRecord) -> Result<()> {
        let url = self.url(config::FILL_UPS_PATH);
        tracing::debug!(%url, user_id, "POST");
        self.client
            .post(&url)
            .json(&FillUpBody {
                uid: user_id,
                record,
            })
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

impl VehicleRepository for ApiClient {
    fn registration(&self, user_id: &str) -> Result<Option<Registration>> {
        let resp = self.get(&format!("{}/{}", config::VEHICLES_PATH, user_id))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entries: Vec<CommunityEntry> = resp.error_for_status()?.json()?;
        Ok(entries.into_iter().next().map(|e| Registration {
            vehicle: e.vehicle,
            driver: e.driver,
        }))
    }

    fn save_registration(&self, user_id: &str, registration: &Registration) -> Result<()> {
        let url = self.url(config::VEHICLES_PATH);
        tracing::debug!(%url, user_id, "POST");
        self.client
            .post(&url)
            .json(&RegistrationBody {
                uid: user_id,
                veiculo: &registration.vehicle,
                condutor: &registration.driver,
            })
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn update_odometer(&self, user_id: &str, odometer_km: u64) -> Result<()> {
        let url = self.url(&format!("{}/{}", config::ODOMETER_PATH, user_id));
        tracing::debug!(%url, odometer_km, "PATCH");
        self.client
            .patch(&url)
            .json(&OdometerBody {
                quilometragem: odometer_km,
            })
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

impl CommunitySource for ApiClient {
    fn community_entries(&self, brand: &str, model: &str) -> Result<Vec<CommunityEntry>> {
        Ok(self
            .all_entries()?
            .into_iter()
            .filter(|e| e.vehicle.is_same_model(brand, model))
            .collect())
    }
}

