//! Community dataset indexed in DuckDB.
//!
//! Entries are flattened to one row per fill-up and loaded into an
//! in-memory table. Brand/model lookups run as parameterized SQL and the
//! matching rows are regrouped into [`CommunityEntry`] values.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::DateTime;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::CommunitySource;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{CommunityEntry, DriverProfile, FillUpRecord, FuelType, VehicleProfile};
use crate::sql_builder::SqlBuilder;

const TABLE: &str = "community";

const COLUMNS: &[(&str, &str)] = &[
    ("row_id", "BIGINT"),
    ("entry_id", "BIGINT"),
    ("user_id", "VARCHAR"),
    ("brand", "VARCHAR"),
    ("model", "VARCHAR"),
    ("year", "INTEGER"),
    ("current_odometer_km", "BIGINT"),
    ("accepted_fuel_types", "VARCHAR"),
    ("modifications", "VARCHAR"),
    ("style", "VARCHAR"),
    ("roads", "VARCHAR"),
    ("frequency", "VARCHAR"),
    ("state", "VARCHAR"),
    ("city", "VARCHAR"),
    ("fuel_type", "VARCHAR"),
    ("price_per_liter", "DOUBLE"),
    ("total_cost", "DOUBLE"),
    ("liters", "DOUBLE"),
    ("odometer_km", "BIGINT"),
    ("recorded_at_ms", "BIGINT"),
];

/// One table row: a vehicle's profile plus at most one of its fill-ups.
#[derive(Debug, Serialize, Deserialize)]
struct IndexRow {
    row_id: u64,
    entry_id: u64,
    user_id: Option<String>,
    brand: String,
    model: String,
    year: i32,
    current_odometer_km: u64,
    accepted_fuel_types: String,
    modifications: Option<String>,
    style: String,
    roads: String,
    frequency: String,
    state: String,
    city: String,
    fuel_type: Option<String>,
    price_per_liter: Option<f64>,
    total_cost: Option<f64>,
    liters: Option<f64>,
    odometer_km: Option<u64>,
    recorded_at_ms: Option<i64>,
}

impl IndexRow {
    fn profile(entry_id: u64, entry: &CommunityEntry) -> Self {
        let v = &entry.vehicle;
        let d = &entry.driver;
        let fuels: Vec<&str> = v.accepted_fuel_types.iter().map(|f| f.as_str()).collect();
        Self {
            row_id: 0,
            entry_id,
            user_id: entry.user_id.clone(),
            brand: v.brand.clone(),
            model: v.model.clone(),
            year: v.year,
            current_odometer_km: v.current_odometer_km,
            accepted_fuel_types: fuels.join(","),
            modifications: v.modifications.clone(),
            style: d.style.clone(),
            roads: d.roads.clone(),
            frequency: d.frequency.clone(),
            state: d.state.clone(),
            city: d.city.clone(),
            fuel_type: None,
            price_per_liter: None,
            total_cost: None,
            liters: None,
            odometer_km: None,
            recorded_at_ms: None,
        }
    }

    fn with_fill_up(mut self, record: &FillUpRecord) -> Self {
        self.fuel_type = Some(record.fuel_type.as_str().to_string());
        self.price_per_liter = Some(record.price_per_liter);
        self.total_cost = Some(record.total_cost);
        self.liters = Some(record.liters);
        self.odometer_km = Some(record.odometer_km);
        self.recorded_at_ms = Some(record.timestamp.timestamp_millis());
        self
    }

    fn to_entry(&self) -> CommunityEntry {
        let accepted_fuel_types: BTreeSet<FuelType> = self
            .accepted_fuel_types
            .split(',')
            .filter_map(|s| s.parse().ok())
            .collect();
        CommunityEntry {
            user_id: self.user_id.clone(),
            vehicle: VehicleProfile {
                brand: self.brand.clone(),
                model: self.model.clone(),
                year: self.year,
                current_odometer_km: self.current_odometer_km,
                accepted_fuel_types,
                modifications: self.modifications.clone(),
            },
            driver: DriverProfile {
                style: self.style.clone(),
                roads: self.roads.clone(),
                frequency: self.frequency.clone(),
                state: self.state.clone(),
                city: self.city.clone(),
            },
            fill_ups: Vec::new(),
        }
    }

    /// The fill-up carried by this row, if it has one and it reads back cleanly.
    fn fill_up(&self) -> Option<FillUpRecord> {
        let fuel_type: FuelType = self.fuel_type.as_deref()?.parse().ok()?;
        let timestamp = DateTime::from_timestamp_millis(self.recorded_at_ms?)?;
        Some(FillUpRecord::new(
            fuel_type,
            self.price_per_liter?,
            self.total_cost?,
            self.liters?,
            self.odometer_km?,
            timestamp,
        ))
    }
}

/// Number of vehicles registered for one brand/model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCount {
    pub brand: String,
    pub model: String,
    pub vehicles: u64,
}

/// Read-only community dataset backed by an in-memory DuckDB table.
pub struct CommunityIndex {
    conn: Connection,
}

impl CommunityIndex {
    /// Index an in-memory list of entries.
    pub fn from_entries(entries: &[CommunityEntry]) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.create_table(TABLE, COLUMNS)?;

        let mut rows = Vec::new();
        for (entry_id, entry) in entries.iter().enumerate() {
            if entry.fill_ups.is_empty() {
                rows.push(IndexRow::profile(entry_id as u64, entry));
            } else {
                for record in &entry.fill_ups {
                    rows.push(IndexRow::profile(entry_id as u64, entry).with_fill_up(record));
                }
            }
        }

        if !rows.is_empty() {
            let tmp = NamedTempFile::new()?;
            {
                let mut writer = BufWriter::new(tmp.as_file());
                for (row_id, row) in rows.iter_mut().enumerate() {
                    row.row_id = row_id as u64;
                    serde_json::to_writer(&mut writer, row)?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
            }
            conn.append_ndjson(TABLE, COLUMNS, tmp.path())?;
        }

        tracing::debug!(
            vehicles = entries.len(),
            rows = rows.len(),
            "indexed community dataset"
        );
        Ok(Self { conn })
    }

    /// Load a JSON array of community entries from disk.
    ///
    /// Files ending in `.gz` are decompressed transparently. Array elements
    /// that do not parse as entries are skipped with a warning.
    pub fn load_dataset(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut contents = String::new();
        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            BufReader::new(GzDecoder::new(BufReader::new(file))).read_to_string(&mut contents)?;
        } else {
            BufReader::new(file).read_to_string(&mut contents)?;
        }

        let raw: Vec<serde_json::Value> = serde_json::from_str(&contents)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (i, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<CommunityEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    index = i,
                    error = %e,
                    "skipping invalid community entry"
                ),
            }
        }
        Self::from_entries(&entries)
    }

    /// Number of indexed vehicles.
    pub fn vehicle_count(&self) -> Result<u64> {
        let value = self.conn.execute_scalar(
            &format!("SELECT COUNT(DISTINCT entry_id) FROM {}", TABLE),
            &[],
        )?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// Vehicles per brand/model, most common first.
    pub fn model_counts(&self) -> Result<Vec<ModelCount>> {
        let (sql, params) = SqlBuilder::new(TABLE)
            .select(&["brand", "model", "COUNT(DISTINCT entry_id) AS vehicles"])
            .group_by(&["brand", "model"])
            .order_by(&["vehicles DESC", "brand", "model"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Access the underlying connection for ad-hoc SQL.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CommunitySource for CommunityIndex {
    fn community_entries(&self, brand: &str, model: &str) -> Result<Vec<CommunityEntry>> {
        let (sql, params) = SqlBuilder::new(TABLE)
            .where_ieq("brand", brand)
            .where_ieq("model", model)
            .order_by(&["entry_id", "row_id"])
            .build();
        let rows: Vec<IndexRow> = self.conn.execute_into(&sql, &params)?;

        let mut entries: Vec<CommunityEntry> = Vec::new();
        let mut current: Option<u64> = None;
        for row in &rows {
            if current != Some(row.entry_id) {
                entries.push(row.to_entry());
                current = Some(row.entry_id);
            }
            if let (Some(entry), Some(record)) = (entries.last_mut(), row.fill_up()) {
                entry.fill_ups.push(record);
            }
        }
        Ok(entries)
    }
}
