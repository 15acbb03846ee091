//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `trips.csv`
//! - `station_snapshots.csv`
//! - `bike_snapshots.csv`
//!
//! Absent optional values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BikeSnapshotRow, OutputResult, StationSnapshotRow, TripRow};

pub const TRIP_HEADERS: [&str; 8] = [
    "user", "outcome", "departure_ms", "end_ms", "bike", "start_station", "end_station", "abort_reason",
];
pub const STATION_HEADERS: [&str; 5] = ["time_ms", "kind", "station_id", "occupants", "capacity"];
pub const BIKE_HEADERS: [&str; 9] = [
    "time_ms", "bike_id", "lat", "lon", "busy", "user", "battery", "station", "charging_station",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    trips:    Writer<File>,
    stations: Writer<File>,
    bikes:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut trips = Writer::from_path(dir.join("trips.csv"))?;
        trips.write_record(TRIP_HEADERS)?;

        let mut stations = Writer::from_path(dir.join("station_snapshots.csv"))?;
        stations.write_record(STATION_HEADERS)?;

        let mut bikes = Writer::from_path(dir.join("bike_snapshots.csv"))?;
        bikes.write_record(BIKE_HEADERS)?;

        Ok(Self {
            trips,
            stations,
            bikes,
            finished: false,
        })
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        for row in rows {
            self.trips.write_record(&[
                row.user.to_string(),
                row.outcome.as_str().to_owned(),
                row.departure_ms.to_string(),
                opt(row.end_ms),
                opt(row.bike),
                opt(row.start_station),
                opt(row.end_station),
                opt(row.abort_reason),
            ])?;
        }
        Ok(())
    }

    fn write_station_snapshots(&mut self, rows: &[StationSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.stations.write_record(&[
                row.time_ms.to_string(),
                row.kind.as_str().to_owned(),
                row.station_id.to_string(),
                row.occupants.to_string(),
                row.capacity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_bike_snapshots(&mut self, rows: &[BikeSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.bikes.write_record(&[
                row.time_ms.to_string(),
                row.bike_id.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
                (row.busy as u8).to_string(),
                opt(row.user),
                opt(row.battery),
                opt(row.station),
                opt(row.charging_station),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trips.flush()?;
        self.stations.flush()?;
        self.bikes.flush()?;
        Ok(())
    }
}
