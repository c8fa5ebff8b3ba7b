//! File-backed key-value store for one device's data.
//!
//! Each user gets a directory under the data directory holding one JSON
//! document per key (`fill_ups.json`, `registration.json`, `expenses.json`).
//! Writes go to a temp file in the same directory and are renamed over the
//! target, so an interrupted write never leaves a half-written document.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::{CommunitySource, ExpenseRepository, FillUpRepository, VehicleRepository};
use crate::config;
use crate::error::{DrivewiseError, Result};
use crate::models::{CommunityEntry, Expense, FillUpRecord, Registration};

/// JSON document store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory holding one sub-directory per user.
    pub data_dir: PathBuf,
}

impl LocalStore {
    /// Open a store, creating the data directory if needed.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate default data directory.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { data_dir: dir })
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DrivewiseError::InvalidArgument(format!(
                "Invalid user id: {:?}",
                user_id
            )));
        }
        Ok(self.data_dir.join(user_id))
    }

    fn document(&self, user_id: &str, file: &str) -> Result<PathBuf> {
        Ok(self.user_dir(user_id)?.join(file))
    }

    /// Read and parse a JSON document. A missing file reads as `None`.
    ///
    /// A document that fails to parse is renamed to `*.corrupt` and reported
    /// as [`DrivewiseError::Corrupt`], so the next write starts clean without
    /// losing the original bytes.
    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let quarantine = path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupt data file, moving aside"
                );
                let _ = fs::rename(path, &quarantine);
                Err(DrivewiseError::Corrupt(format!(
                    "'{}' could not be parsed and was moved to '{}': {}",
                    path.display(),
                    quarantine.display(),
                    e
                )))
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let dir = path.parent().ok_or_else(|| {
            DrivewiseError::InvalidArgument(format!("No parent directory for {}", path.display()))
        })?;
        fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| DrivewiseError::Io(e.error))?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Ids of every user with a directory in the store.
    pub fn users(&self) -> Result<Vec<String>> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    users.push(name.to_string());
                }
            }
        }
        users.sort();
        Ok(users)
    }

    /// Every registered user's vehicle, driver and fill-ups.
    ///
    /// Users without a registration are skipped. A user whose documents
    /// cannot be read is logged and skipped so one bad directory does not
    /// hide the rest of the community.
    pub fn entries(&self) -> Result<Vec<CommunityEntry>> {
        let mut entries = Vec::new();
        for user_id in self.users()? {
            let loaded = self.registration(&user_id).and_then(|reg| match reg {
                Some(reg) => Ok(Some((reg, self.list_fill_ups(&user_id)?))),
                None => Ok(None),
            });
            match loaded {
                Ok(Some((reg, fill_ups))) => {
                    entries.push(CommunityEntry::new(Some(user_id), reg, fill_ups))
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(user_id = %user_id, error = %e, "skipping user"),
            }
        }
        Ok(entries)
    }

    /// Remove every document of one user.
    pub fn clear_user(&self, user_id: &str) -> Result<()> {
        let dir = self.user_dir(user_id)?;
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}

impl FillUpRepository for LocalStore {
    fn list_fill_ups(&self, user_id: &str) -> Result<Vec<FillUpRecord>> {
        let path = self.document(user_id, config::FILL_UPS_FILE)?;
        Ok(self.load(&path)?.unwrap_or_default())
    }

    fn append_fill_up(&self, user_id: &str, record: &FillUpRecord) -> Result<()> {
        let path = self.document(user_id, config::FILL_UPS_FILE)?;
        let mut records: Vec<FillUpRecord> = self.load(&path)?.unwrap_or_default();
        records.push(record.clone());
        self.save(&path, &records)
    }
}

impl VehicleRepository for LocalStore {
    fn registration(&self, user_id: &str) -> Result<Option<Registration>> {
        let path = self.document(user_id, config::REGISTRATION_FILE)?;
        self.load(&path)
    }

    fn save_registration(&self, user_id: &str, registration: &Registration) -> Result<()> {
        let path = self.document(user_id, config::REGISTRATION_FILE)?;
        self.save(&path, registration)
    }

    fn update_odometer(&self, user_id: &str, odometer_km: u64) -> Result<()> {
        let path = self.document(user_id, config::REGISTRATION_FILE)?;
        let mut registration: Registration = self.load(&path)?.ok_or_else(|| {
            DrivewiseError::NotFound(format!("No vehicle registered for user {}", user_id))
        })?;
        registration.vehicle.current_odometer_km = odometer_km;
        self.save(&path, &registration)
    }
}

impl ExpenseRepository for LocalStore {
    fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        let path = self.document(user_id, config::EXPENSES_FILE)?;
        Ok(self.load(&path)?.unwrap_or_default())
    }

    fn save_expense(&self, user_id: &str, expense: &Expense) -> Result<()> {
        let path = self.document(user_id, config::EXPENSES_FILE)?;
        let mut expenses: Vec<Expense> = self.load(&path)?.unwrap_or_default();
        match expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense.clone(),
            None => expenses.push(expense.clone()),
        }
        self.save(&path, &expenses)
    }
}

impl CommunitySource for LocalStore {
    fn community_entries(&self, brand: &str, model: &str) -> Result<Vec<CommunityEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.vehicle.is_same_model(brand, model))
            .collect())
    }
}
