//! Plain data row types written by output backends.

use fleet_dispatch::CandidateKind;

/// How a trip ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripOutcome {
    Completed,
    Aborted,
    /// Still underway when the run stopped at its horizon.
    Pending,
}

impl TripOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TripOutcome::Completed => "completed",
            TripOutcome::Aborted   => "aborted",
            TripOutcome::Pending   => "pending",
        }
    }
}

/// One user's trip, written once it reaches a terminal state (or at the end
/// of the run for pending trips).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow {
    pub user:          u32,
    pub outcome:       TripOutcome,
    pub departure_ms:  u64,
    /// Time the trip arrived or was aborted; `None` while pending.
    pub end_ms:        Option<u64>,
    /// Last bike the user held.
    pub bike:          Option<u32>,
    /// Station the bike was unlocked from (station-based mode only).
    pub start_station: Option<u32>,
    /// Station the bike was locked into (station-based mode only).
    pub end_station:   Option<u32>,
    pub abort_reason:  Option<CandidateKind>,
}

/// Which registry table a station snapshot row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationKind {
    Docking,
    Charging,
}

impl StationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StationKind::Docking  => "docking",
            StationKind::Charging => "charging",
        }
    }
}

/// Occupancy of one station at a snapshot instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationSnapshotRow {
    pub time_ms:    u64,
    pub kind:       StationKind,
    pub station_id: u32,
    pub occupants:  u32,
    pub capacity:   u32,
}

/// State of one bike at a snapshot instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BikeSnapshotRow {
    pub time_ms:          u64,
    pub bike_id:          u32,
    pub lat:              f64,
    pub lon:              f64,
    pub busy:             bool,
    pub user:             Option<u32>,
    /// Autonomous bikes only.
    pub battery:          Option<f64>,
    pub station:          Option<u32>,
    pub charging_station: Option<u32>,
}
