//! CSV roster loader for docking and charging stations.
//!
//! # CSV format
//!
//! One row per station, in id order (row `n` becomes `StationId(n)` or
//! `ChargingStationId(n)` once added to a [`RegistryBuilder`](crate::RegistryBuilder)).
//!
//! ```csv
//! latitude,longitude,capacity
//! 42.3554,-71.0605,15
//! 42.3621,-71.0568,19
//! ```
//!
//! Rows with `capacity == 0` are skipped with a warning: a station that can
//! hold no bike is never selectable and would only slow the scans down.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::GeoPoint;

use crate::{RegistryError, RegistryResult};

// ── CSV record ────────────────────────────────────────────────────────────────

/// One roster row.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct DockRecord {
    pub latitude:  f64,
    pub longitude: f64,
    pub capacity:  u32,
}

impl DockRecord {
    pub fn new(latitude: f64, longitude: f64, capacity: u32) -> Self {
        Self { latitude, longitude, capacity }
    }

    #[inline]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a station roster from a CSV file.
pub fn load_docks_csv(path: &Path) -> RegistryResult<Vec<DockRecord>> {
    let file = std::fs::File::open(path).map_err(RegistryError::Io)?;
    load_docks_reader(file)
}

/// Like [`load_docks_csv`] but accepts any `Read` source.
pub fn load_docks_reader<R: Read>(reader: R) -> RegistryResult<Vec<DockRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for (row, result) in csv_reader.deserialize::<DockRecord>().enumerate() {
        let rec = result.map_err(|e| RegistryError::Parse(e.to_string()))?;
        if !rec.latitude.is_finite() || !rec.longitude.is_finite() {
            return Err(RegistryError::Parse(format!(
                "row {row}: non-finite coordinates ({}, {})",
                rec.latitude, rec.longitude
            )));
        }
        if rec.capacity == 0 {
            log::warn!("roster row {row} at [{}, {}] has zero capacity; skipped", rec.latitude, rec.longitude);
            continue;
        }
        records.push(rec);
    }

    Ok(records)
}
