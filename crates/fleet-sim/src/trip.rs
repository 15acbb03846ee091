//! Trip requests and the CSV trip roster loader.
//!
//! # CSV format
//!
//! One row per trip.  Row `n` becomes `UserId(n)`.
//!
//! ```csv
//! origin_lat,origin_lon,destination_lat,destination_lon,departure_secs
//! 42.3554,-71.0605,42.3621,-71.0568,0
//! 42.3500,-71.0700,42.3400,-71.0800,90.5
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::{GeoPoint, SimTime, UserId};

use crate::{SimError, SimResult};

/// One user's trip request.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trip {
    pub user:        UserId,
    pub origin:      GeoPoint,
    pub destination: GeoPoint,
    pub departure:   SimTime,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TripRecord {
    origin_lat:      f64,
    origin_lon:      f64,
    destination_lat: f64,
    destination_lon: f64,
    departure_secs:  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the trip roster from a CSV file.
pub fn load_trips_csv(path: &Path) -> SimResult<Vec<Trip>> {
    let file = std::fs::File::open(path).map_err(SimError::Io)?;
    load_trips_reader(file)
}

/// Like [`load_trips_csv`] but accepts any `Read` source.
pub fn load_trips_reader<R: Read>(reader: R) -> SimResult<Vec<Trip>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut trips = Vec::new();

    for (row, result) in csv_reader.deserialize::<TripRecord>().enumerate() {
        let r = result.map_err(|e| SimError::Parse(e.to_string()))?;
        if !(r.departure_secs >= 0.0 && r.departure_secs.is_finite()) {
            return Err(SimError::Parse(format!(
                "row {row}: departure_secs must be a finite, non-negative number, got {}",
                r.departure_secs
            )));
        }
        let user = UserId::try_from(row)
            .map_err(|_| SimError::Parse(format!("row {row}: too many trips")))?;
        trips.push(Trip {
            user,
            origin:      GeoPoint::new(r.origin_lat, r.origin_lon),
            destination: GeoPoint::new(r.destination_lat, r.destination_lon),
            departure:   SimTime::from_secs_f64(r.departure_secs),
        });
    }

    Ok(trips)
}
