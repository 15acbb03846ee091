//! The `OutputWriter` trait implemented by output backends.

use crate::{BikeSnapshotRow, OutputResult, StationSnapshotRow, TripRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`OutputObserver::take_error`](crate::OutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of finished (or, at the end of the run, pending) trips.
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()>;

    /// Write the station and charging-station occupancy of one snapshot.
    fn write_station_snapshots(&mut self, rows: &[StationSnapshotRow]) -> OutputResult<()>;

    /// Write the bike states of one snapshot.
    fn write_bike_snapshots(&mut self, rows: &[BikeSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent, safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
