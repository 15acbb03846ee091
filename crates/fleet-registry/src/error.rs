//! Registry error type.

use thiserror::Error;

use fleet_core::{BikeId, ChargingStationId, StationId, UserId};

use crate::DockRef;

/// Errors produced by `fleet-registry`.
///
/// `CapacityExceeded` and `EmptyResource` are assertion-level: single-threaded
/// scheduling makes check-then-act atomic, so a caller that checked
/// `has_capacity` / `has_occupant` first never sees them.  Every failing
/// operation leaves the registry unchanged.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0} is at capacity")]
    CapacityExceeded(DockRef),

    #[error("{0} has no bikes attached")]
    EmptyResource(DockRef),

    #[error("{bike} is not attached to {dock}")]
    NotDocked { bike: BikeId, dock: DockRef },

    #[error("station {0} not found")]
    UnknownStation(StationId),

    #[error("charging station {0} not found")]
    UnknownChargingStation(ChargingStationId),

    #[error("bike {0} not found")]
    UnknownBike(BikeId),

    #[error("{bike} is a {actual} bike, operation requires {expected}")]
    WrongBikeKind {
        bike:     BikeId,
        expected: &'static str,
        actual:   &'static str,
    },

    #[error("{bike} is busy")]
    BikeBusy { bike: BikeId },

    #[error("{bike} is already in use by {user}")]
    AlreadyInUse { bike: BikeId, user: UserId },

    #[error("{bike} has no user")]
    NotInUse { bike: BikeId },

    #[error("cannot dock {requested} bikes: only {available} free docks")]
    InsufficientDocks { requested: usize, available: usize },

    #[error("cannot place bikes: the station roster is empty")]
    NoStations,

    #[error("registry invariant violated: {0}")]
    Invariant(String),

    #[error("roster parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
