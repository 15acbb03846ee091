//! `fleet-output`: simulation output writers for the bike-fleet simulator.
//!
//! | Backend | Files created                                                  |
//! |---------|----------------------------------------------------------------|
//! | CSV     | `trips.csv`, `station_snapshots.csv`, `bike_snapshots.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `fleet_sim::FleetObserver`.  Times are written in
//! simulated milliseconds.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleet_output::{CsvWriter, OutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = OutputObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{BikeSnapshotRow, StationKind, StationSnapshotRow, TripOutcome, TripRow};
pub use writer::OutputWriter;
