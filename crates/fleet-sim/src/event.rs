//! Every observable state transition of a run.

use std::fmt;

use fleet_core::{BikeId, ChargingStationId, GeoPoint, OperatingMode, StationId, UserId};
use fleet_dispatch::CandidateKind;

/// Which half of a station-based trip a station was chosen for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StationPhase {
    Start,
    End,
}

/// A state transition emitted by a trip or recharge process.
///
/// Events are delivered to the [`FleetObserver`](crate::FleetObserver) in the
/// exact order they happen; two runs with the same inputs emit identical
/// sequences.
#[derive(Clone, Debug, PartialEq)]
pub enum FleetEvent {
    // ── Trips ─────────────────────────────────────────────────────────────
    TripDeparted { user: UserId, mode: OperatingMode, origin: GeoPoint },
    StationSelected { user: UserId, station: StationId, phase: StationPhase, distance_m: f64 },
    /// The chosen end station is farther from the destination than the
    /// walking radius.  Advisory only; the trip proceeds.
    EndStationNotWalkable { user: UserId, station: StationId, distance_m: f64 },
    /// No end station with a free dock; the rider waits and searches again.
    EndStationRetry { user: UserId, bike: BikeId },
    BikeSelected { user: UserId, bike: BikeId, distance_m: f64 },
    BikeAssigned { user: UserId, bike: BikeId, distance_m: f64 },
    PickupArrived { user: UserId, bike: BikeId },
    UnlockSucceeded { user: UserId, bike: BikeId, station: Option<StationId> },
    UnlockFailed { user: UserId, bike: Option<BikeId>, station: Option<StationId> },
    LockSucceeded { user: UserId, bike: BikeId, station: Option<StationId> },
    LockFailed { user: UserId, bike: BikeId, station: StationId },
    TripAborted { user: UserId, reason: CandidateKind },
    TripArrived { user: UserId, bike: BikeId },

    // ── Recharge ──────────────────────────────────────────────────────────
    RechargeTriggered { bike: BikeId, battery: f64 },
    ChargingStationSelected { bike: BikeId, station: ChargingStationId, distance_m: f64 },
    ChargingStationFull { bike: BikeId, station: ChargingStationId },
    ChargingStarted { bike: BikeId, station: ChargingStationId, battery: f64 },
    ChargingFinished { bike: BikeId, station: ChargingStationId },
    ChargeSearchBackoff { bike: BikeId, attempt: u32 },
    ChargeSearchExhausted { bike: BikeId, attempts: u32 },
    BatteryDepleted { bike: BikeId, location: GeoPoint },
}

impl FleetEvent {
    /// The user the event concerns, if any.
    pub fn user(&self) -> Option<UserId> {
        use FleetEvent::*;
        match *self {
            TripDeparted { user, .. }
            | StationSelected { user, .. }
            | EndStationNotWalkable { user, .. }
            | EndStationRetry { user, .. }
            | BikeSelected { user, .. }
            | BikeAssigned { user, .. }
            | PickupArrived { user, .. }
            | UnlockSucceeded { user, .. }
            | UnlockFailed { user, .. }
            | LockSucceeded { user, .. }
            | LockFailed { user, .. }
            | TripAborted { user, .. }
            | TripArrived { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The bike the event concerns, if any.
    pub fn bike(&self) -> Option<BikeId> {
        use FleetEvent::*;
        match *self {
            EndStationRetry { bike, .. }
            | BikeSelected { bike, .. }
            | BikeAssigned { bike, .. }
            | PickupArrived { bike, .. }
            | UnlockSucceeded { bike, .. }
            | LockSucceeded { bike, .. }
            | LockFailed { bike, .. }
            | TripArrived { bike, .. }
            | RechargeTriggered { bike, .. }
            | ChargingStationSelected { bike, .. }
            | ChargingStationFull { bike, .. }
            | ChargingStarted { bike, .. }
            | ChargingFinished { bike, .. }
            | ChargeSearchBackoff { bike, .. }
            | ChargeSearchExhausted { bike, .. }
            | BatteryDepleted { bike, .. } => Some(bike),
            UnlockFailed { bike, .. } => bike,
            _ => None,
        }
    }

    /// Log level this event is reported at.
    pub fn level(&self) -> log::Level {
        use FleetEvent::*;
        match self {
            TripAborted { .. }
            | UnlockFailed { .. }
            | LockFailed { .. }
            | EndStationRetry { .. }
            | ChargingStationFull { .. }
            | ChargeSearchBackoff { .. }
            | ChargeSearchExhausted { .. }
            | BatteryDepleted { .. } => log::Level::Warn,
            StationSelected { .. }
            | BikeSelected { .. }
            | ChargingStationSelected { .. }
            | EndStationNotWalkable { .. } => log::Level::Debug,
            _ => log::Level::Info,
        }
    }
}

impl fmt::Display for FleetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FleetEvent::*;
        match self {
            TripDeparted { user, mode, origin } => {
                write!(f, "{user} departs from {origin} ({mode})")
            }
            StationSelected { user, station, phase, distance_m } => {
                let phase = match phase {
                    StationPhase::Start => "start",
                    StationPhase::End   => "end",
                };
                write!(f, "{user} selects {station} as {phase} station ({distance_m:.0} m)")
            }
            EndStationNotWalkable { user, station, distance_m } => {
                write!(f, "{user}: {station} is {distance_m:.0} m from the destination, beyond walking range")
            }
            EndStationRetry { user, bike } => {
                write!(f, "{user} finds no free dock for {bike}; waiting before searching again")
            }
            BikeSelected { user, bike, distance_m } => {
                write!(f, "{user} selects {bike} ({distance_m:.0} m)")
            }
            BikeAssigned { user, bike, distance_m } => {
                write!(f, "{bike} assigned to {user}, driving {distance_m:.0} m for pickup")
            }
            PickupArrived { user, bike } => write!(f, "{bike} reaches {user}"),
            UnlockSucceeded { user, bike, station: Some(s) } => {
                write!(f, "{user} unlocks {bike} at {s}")
            }
            UnlockSucceeded { user, bike, station: None } => write!(f, "{user} unlocks {bike}"),
            UnlockFailed { user, bike, station } => match (bike, station) {
                (Some(b), _)    => write!(f, "{user} could not unlock {b}"),
                (None, Some(s)) => write!(f, "{user} could not unlock a bike at {s}"),
                (None, None)    => write!(f, "{user} could not unlock a bike"),
            },
            LockSucceeded { user, bike, station: Some(s) } => {
                write!(f, "{user} locks {bike} at {s}")
            }
            LockSucceeded { user, bike, station: None } => write!(f, "{user} drops {bike}"),
            LockFailed { user, bike, station } => {
                write!(f, "{user} could not lock {bike} at {station}")
            }
            TripAborted { user, reason } => write!(f, "{user} aborts: no eligible {reason}"),
            TripArrived { user, bike } => write!(f, "{user} arrived (rode {bike})"),
            RechargeTriggered { bike, battery } => {
                write!(f, "{bike} at {battery:.1}% needs recharging")
            }
            ChargingStationSelected { bike, station, distance_m } => {
                write!(f, "{bike} heads to {station} ({distance_m:.0} m)")
            }
            ChargingStationFull { bike, station } => write!(f, "{bike} finds {station} full"),
            ChargingStarted { bike, station, battery } => {
                write!(f, "{bike} starts charging at {station} from {battery:.1}%")
            }
            ChargingFinished { bike, station } => write!(f, "{bike} fully charged at {station}"),
            ChargeSearchBackoff { bike, attempt } => {
                write!(f, "{bike} found no charging station (attempt {attempt}); backing off")
            }
            ChargeSearchExhausted { bike, attempts } => {
                write!(f, "{bike} gave up the charging search after {attempts} attempts")
            }
            BatteryDepleted { bike, location } => write!(f, "{bike} ran out of battery at {location}"),
        }
    }
}
