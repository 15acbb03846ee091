//! The unified bike abstraction.
//!
//! One struct carries the state every bike shares (location, user, busy);
//! [`BikeKind`] holds the per-mode extras.  Lock/unlock/charging behaviour
//! diverges by variant and lives in [`Registry`](crate::Registry), the only
//! code allowed to mutate a bike.

use fleet_core::{BikeId, ChargingStationId, GeoPoint, OperatingMode, StationId, UserId};

use crate::VisitedSet;

/// Mode-specific bike state.
#[derive(Clone, Debug)]
pub enum BikeKind {
    /// Docked XOR in use XOR neither; never docked while a user holds it.
    Station {
        station: Option<StationId>,
    },
    /// Only `busy` and the user matter.
    Dockless,
    Autonomous {
        /// State of charge in percent, within `[0, 100]`.
        battery:          f64,
        charging_station: Option<ChargingStationId>,
        /// Charging stations tried in the current recharge search.  Cleared
        /// once a station is successfully reached.
        visited:          VisitedSet<ChargingStationId>,
    },
}

impl BikeKind {
    pub fn name(&self) -> &'static str {
        match self {
            BikeKind::Station { .. }    => "station-based",
            BikeKind::Dockless          => "dockless",
            BikeKind::Autonomous { .. } => "autonomous",
        }
    }

    pub fn mode(&self) -> OperatingMode {
        match self {
            BikeKind::Station { .. }    => OperatingMode::StationBased,
            BikeKind::Dockless          => OperatingMode::Dockless,
            BikeKind::Autonomous { .. } => OperatingMode::Autonomous,
        }
    }
}

/// A bike owned by the [`Registry`](crate::Registry).
#[derive(Clone, Debug)]
pub struct Bike {
    pub(crate) id:       BikeId,
    pub(crate) location: GeoPoint,
    pub(crate) user:     Option<UserId>,
    /// Reserved, in use, or driving/charging autonomously.
    pub(crate) busy:     bool,
    pub(crate) kind:     BikeKind,
}

impl Bike {
    pub(crate) fn new(id: BikeId, location: GeoPoint, kind: BikeKind) -> Self {
        Self { id, location, user: None, busy: false, kind }
    }

    #[inline]
    pub fn id(&self) -> BikeId {
        self.id
    }

    #[inline]
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    #[inline]
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[inline]
    pub fn kind(&self) -> &BikeKind {
        &self.kind
    }

    #[inline]
    pub fn mode(&self) -> OperatingMode {
        self.kind.mode()
    }

    /// Battery level for autonomous bikes.
    pub fn battery(&self) -> Option<f64> {
        match self.kind {
            BikeKind::Autonomous { battery, .. } => Some(battery),
            _ => None,
        }
    }

    /// Docking station for station-based bikes currently docked.
    pub fn station(&self) -> Option<StationId> {
        match self.kind {
            BikeKind::Station { station } => station,
            _ => None,
        }
    }

    pub fn charging_station(&self) -> Option<ChargingStationId> {
        match self.kind {
            BikeKind::Autonomous { charging_station, .. } => charging_station,
            _ => None,
        }
    }

    /// Charging stations tried in the current recharge search.
    pub fn charge_visited(&self) -> Option<&VisitedSet<ChargingStationId>> {
        match &self.kind {
            BikeKind::Autonomous { visited, .. } => Some(visited),
            _ => None,
        }
    }

    #[inline]
    pub fn is_docked(&self) -> bool {
        self.station().is_some()
    }
}
