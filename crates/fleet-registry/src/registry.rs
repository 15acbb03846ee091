//! The `Registry`: exclusive owner of every station, charging station, and
//! bike in the run.
//!
//! Agent processes hold ids, never copies, and mutate shared state only
//! through the methods below.  Each method is one atomic field-group change:
//! all preconditions are checked before the first write, so an `Err` always
//! means "nothing happened".

use fleet_core::{
    BikeId, ChargingStationId, GeoPoint, OperatingMode, SimRng, StationId, UserId,
};

use crate::{
    Bike, BikeKind, ChargingStation, DockRef, RegistryError, RegistryResult, Station,
};

/// Result of an autonomous drive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriveReport {
    pub distance_m: f64,
    /// Battery level after the drive, clamped at 0.
    pub battery:    f64,
    /// The drive needed more charge than the bike had.
    pub depleted:   bool,
}

/// Owner of all fleet resources.  Build with
/// [`RegistryBuilder`](crate::RegistryBuilder).
#[derive(Debug)]
pub struct Registry {
    pub(crate) stations:          Vec<Station>,
    pub(crate) charging_stations: Vec<ChargingStation>,
    pub(crate) bikes:             Vec<Bike>,
    /// Draws the bike handed out at a station unlock.
    pub(crate) rng:               SimRng,
}

impl Registry {
    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn charging_stations(&self) -> &[ChargingStation] {
        &self.charging_stations
    }

    pub fn bikes(&self) -> &[Bike] {
        &self.bikes
    }

    pub fn station(&self, id: StationId) -> RegistryResult<&Station> {
        self.stations.get(id.index()).ok_or(RegistryError::UnknownStation(id))
    }

    pub fn charging_station(&self, id: ChargingStationId) -> RegistryResult<&ChargingStation> {
        self.charging_stations
            .get(id.index())
            .ok_or(RegistryError::UnknownChargingStation(id))
    }

    pub fn bike(&self, id: BikeId) -> RegistryResult<&Bike> {
        self.bikes.get(id.index()).ok_or(RegistryError::UnknownBike(id))
    }

    fn station_mut(&mut self, id: StationId) -> RegistryResult<&mut Station> {
        self.stations.get_mut(id.index()).ok_or(RegistryError::UnknownStation(id))
    }

    fn charging_station_mut(&mut self, id: ChargingStationId) -> RegistryResult<&mut ChargingStation> {
        self.charging_stations
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownChargingStation(id))
    }

    fn bike_mut(&mut self, id: BikeId) -> RegistryResult<&mut Bike> {
        self.bikes.get_mut(id.index()).ok_or(RegistryError::UnknownBike(id))
    }

    // ── Capacity queries ──────────────────────────────────────────────────
    //
    // Unknown ids answer `false`: a resource that does not exist can neither
    // hand out nor accept a bike.

    /// A station has at least one docked bike.
    pub fn station_has_bikes(&self, id: StationId) -> bool {
        self.stations.get(id.index()).is_some_and(Station::has_occupant)
    }

    /// A station has at least one free dock.
    pub fn station_has_docks(&self, id: StationId) -> bool {
        self.stations.get(id.index()).is_some_and(Station::has_capacity)
    }

    /// A charging station has at least one free slot.
    pub fn charging_station_has_space(&self, id: ChargingStationId) -> bool {
        self.charging_stations.get(id.index()).is_some_and(ChargingStation::has_capacity)
    }

    pub fn charging_station_has_occupant(&self, id: ChargingStationId) -> bool {
        self.charging_stations.get(id.index()).is_some_and(ChargingStation::has_occupant)
    }

    pub fn is_bike_busy(&self, id: BikeId) -> bool {
        self.bikes.get(id.index()).is_some_and(Bike::is_busy)
    }

    // ── Raw dock operations ───────────────────────────────────────────────

    /// Attach `bike` to a station's dock list.
    pub fn station_attach(&mut self, station: StationId, bike: BikeId) -> RegistryResult<()> {
        self.bike(bike)?;
        self.station_mut(station)?.attach(bike)
    }

    /// Detach a uniformly random docked bike from a station.
    pub fn station_detach(&mut self, station: StationId) -> RegistryResult<BikeId> {
        let slot = self.choose_slot(station)?;
        self.station_mut(station)?.detach_slot(slot)
    }

    /// Attach `bike` to a charging station.
    pub fn charging_attach(&mut self, station: ChargingStationId, bike: BikeId) -> RegistryResult<()> {
        self.bike(bike)?;
        self.charging_station_mut(station)?.attach(bike)
    }

    /// Detach a specific bike from a charging station.
    pub fn charging_detach(&mut self, station: ChargingStationId, bike: BikeId) -> RegistryResult<()> {
        self.charging_station_mut(station)?.detach(bike)
    }

    fn choose_slot(&mut self, station: StationId) -> RegistryResult<usize> {
        let len = self.station(station)?.bikes().len();
        self.rng
            .choose_index(len)
            .ok_or(RegistryError::EmptyResource(DockRef::Station(station)))
    }

    // ── Station-based bikes ───────────────────────────────────────────────

    /// Hand `user` the bike: set the user, clear the station, mark busy.
    pub fn register_unlock(&mut self, bike: BikeId, user: UserId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Station { station } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::StationBased));
        };
        if let Some(current) = b.user {
            return Err(RegistryError::AlreadyInUse { bike, user: current });
        }
        *station = None;
        b.user = Some(user);
        b.busy = true;
        Ok(())
    }

    /// Return the bike: clear the user, record the station, mark idle.
    pub fn register_lock(&mut self, bike: BikeId, at: StationId) -> RegistryResult<()> {
        self.station(at)?;
        let b = self.bike_mut(bike)?;
        let BikeKind::Station { station } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::StationBased));
        };
        *station = Some(at);
        b.user = None;
        b.busy = false;
        Ok(())
    }

    /// Detach a random docked bike from `station` and register it to `user`.
    pub fn unlock_from_station(&mut self, station: StationId, user: UserId) -> RegistryResult<BikeId> {
        let slot = self.choose_slot(station)?;
        let bike = self.station(station)?.bikes()[slot];

        let b = self.bike(bike)?;
        if !matches!(b.kind, BikeKind::Station { .. }) {
            return Err(wrong_kind(b, OperatingMode::StationBased));
        }
        if let Some(current) = b.user {
            return Err(RegistryError::AlreadyInUse { bike, user: current });
        }

        self.station_mut(station)?.detach_slot(slot)?;
        self.register_unlock(bike, user)?;
        Ok(bike)
    }

    /// Dock a ridden bike at `station` and release it from its user.
    pub fn lock_into_station(&mut self, station: StationId, bike: BikeId) -> RegistryResult<()> {
        let dock = self.station(station)?;
        if !dock.has_capacity() {
            return Err(RegistryError::CapacityExceeded(DockRef::Station(station)));
        }
        let location = dock.location();

        let b = self.bike(bike)?;
        if !matches!(b.kind, BikeKind::Station { .. }) {
            return Err(wrong_kind(b, OperatingMode::StationBased));
        }
        if b.user.is_none() {
            return Err(RegistryError::NotInUse { bike });
        }

        self.station_mut(station)?.attach(bike)?;
        self.register_lock(bike, station)?;
        self.bike_mut(bike)?.location = location;
        Ok(())
    }

    // ── Dockless and autonomous bikes ─────────────────────────────────────

    /// Hand a dockless or autonomous bike to `user`.
    ///
    /// A dockless bike must be idle.  An autonomous bike may already be
    /// reserved (busy) by the dispatch that assigned it to `user`.
    pub fn unlock(&mut self, bike: BikeId, user: UserId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        match b.kind {
            BikeKind::Dockless if b.busy => return Err(RegistryError::BikeBusy { bike }),
            BikeKind::Dockless | BikeKind::Autonomous { .. } => {}
            BikeKind::Station { .. } => return Err(wrong_kind(b, OperatingMode::Dockless)),
        }
        if let Some(current) = b.user {
            return Err(RegistryError::AlreadyInUse { bike, user: current });
        }
        b.user = Some(user);
        b.busy = true;
        Ok(())
    }

    /// Release a dockless bike where it stands.
    pub fn lock(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        if !matches!(b.kind, BikeKind::Dockless) {
            return Err(wrong_kind(b, OperatingMode::Dockless));
        }
        release(b)
    }

    /// Release an autonomous bike at the rider's destination.
    pub fn drop_bike(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        if !matches!(b.kind, BikeKind::Autonomous { .. }) {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        }
        release(b)
    }

    /// Mark an idle autonomous bike busy for a pickup it has been assigned.
    pub fn reserve(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        if !matches!(b.kind, BikeKind::Autonomous { .. }) {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        }
        if b.busy {
            return Err(RegistryError::BikeBusy { bike });
        }
        b.busy = true;
        Ok(())
    }

    /// Move a bike that a user is riding.  Rides do not consume battery.
    pub fn ride(&mut self, bike: BikeId, destination: GeoPoint) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        if b.user.is_none() {
            return Err(RegistryError::NotInUse { bike });
        }
        b.location = destination;
        Ok(())
    }

    /// Move an autonomous bike under its own power, draining
    /// `distance_m * consumption_per_m` percent.  The level is clamped at 0.
    pub fn autonomous_drive(
        &mut self,
        bike:              BikeId,
        destination:       GeoPoint,
        distance_m:        f64,
        consumption_per_m: f64,
    ) -> RegistryResult<DriveReport> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Autonomous { battery, .. } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        };
        let raw = *battery - distance_m * consumption_per_m;
        let depleted = distance_m > 0.0 && raw <= 0.0;
        *battery = raw.max(0.0);
        let report = DriveReport { distance_m, battery: *battery, depleted };
        b.location = destination;
        Ok(report)
    }

    // ── Recharge episode ──────────────────────────────────────────────────

    /// Take an idle autonomous bike out of service for recharging.
    pub fn begin_recharge(&mut self, bike: BikeId) -> RegistryResult<()> {
        self.reserve(bike)
    }

    /// Return a bike to service at the end of (or after abandoning) a
    /// recharge episode.  The episode's visited list is cleared.
    pub fn end_recharge(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Autonomous { charging_station, visited, .. } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        };
        if let Some(station) = *charging_station {
            return Err(RegistryError::Invariant(format!(
                "{bike} ends recharge while still attached to {station}"
            )));
        }
        visited.clear();
        b.busy = false;
        Ok(())
    }

    /// Remember that this recharge episode already picked `station`.
    pub fn record_charge_visit(&mut self, bike: BikeId, station: ChargingStationId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Autonomous { visited, .. } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        };
        visited.insert(station);
        Ok(())
    }

    pub fn clear_charge_visits(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Autonomous { visited, .. } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        };
        visited.clear();
        Ok(())
    }

    /// Attach an autonomous bike to a charging station.  Reaching a station
    /// ends the search, so the visited list is cleared.
    pub fn dock_for_charging(&mut self, bike: BikeId, station: ChargingStationId) -> RegistryResult<()> {
        if !self.charging_station(station)?.has_capacity() {
            return Err(RegistryError::CapacityExceeded(DockRef::Charging(station)));
        }
        let b = self.bike(bike)?;
        match &b.kind {
            BikeKind::Autonomous { charging_station: Some(current), .. } => {
                return Err(RegistryError::Invariant(format!(
                    "{bike} is already attached to {current}"
                )));
            }
            BikeKind::Autonomous { .. } => {}
            _ => return Err(wrong_kind(b, OperatingMode::Autonomous)),
        }
        if let Some(user) = b.user {
            return Err(RegistryError::AlreadyInUse { bike, user });
        }

        self.charging_station_mut(station)?.attach(bike)?;
        let b = self.bike_mut(bike)?;
        if let BikeKind::Autonomous { charging_station, visited, .. } = &mut b.kind {
            *charging_station = Some(station);
            visited.clear();
        }
        Ok(())
    }

    /// Finish charging: battery is set to exactly 100.
    pub fn complete_charge(&mut self, bike: BikeId) -> RegistryResult<()> {
        let b = self.bike_mut(bike)?;
        let BikeKind::Autonomous { battery, .. } = &mut b.kind else {
            return Err(wrong_kind(b, OperatingMode::Autonomous));
        };
        *battery = 100.0;
        Ok(())
    }

    /// Detach an autonomous bike from the charging station it occupies.
    pub fn undock_from_charging(&mut self, bike: BikeId) -> RegistryResult<ChargingStationId> {
        let b = self.bike(bike)?;
        let station = match b.kind {
            BikeKind::Autonomous { charging_station: Some(station), .. } => station,
            BikeKind::Autonomous { charging_station: None, .. } => {
                return Err(RegistryError::Invariant(format!("{bike} is not at a charging station")));
            }
            _ => return Err(wrong_kind(b, OperatingMode::Autonomous)),
        };

        self.charging_station_mut(station)?.detach(bike)?;
        let b = self.bike_mut(bike)?;
        if let BikeKind::Autonomous { charging_station, .. } = &mut b.kind {
            *charging_station = None;
        }
        Ok(station)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check every cross-entity invariant; returns the first violation.
    ///
    /// - `0 <= occupant_count <= capacity` for every dock.
    /// - A docked bike points back at its dock, and vice versa.
    /// - A bike never has both a user and a station/charging-station.
    /// - Battery stays within `[0, 100]`.
    pub fn check_invariants(&self) -> RegistryResult<()> {
        for s in &self.stations {
            if s.occupant_count() > s.capacity() {
                return Err(invariant(format!("{} holds {} > {}", s.id(), s.occupant_count(), s.capacity())));
            }
            for &bike in s.bikes() {
                if self.bike(bike)?.station() != Some(s.id()) {
                    return Err(invariant(format!("{} lists {bike} which is not docked there", s.id())));
                }
            }
        }
        for c in &self.charging_stations {
            if c.occupant_count() > c.capacity() {
                return Err(invariant(format!("{} holds {} > {}", c.id(), c.occupant_count(), c.capacity())));
            }
            for &bike in c.bikes() {
                if self.bike(bike)?.charging_station() != Some(c.id()) {
                    return Err(invariant(format!("{} lists {bike} which is not charging there", c.id())));
                }
            }
        }
        for b in &self.bikes {
            match &b.kind {
                BikeKind::Station { station: Some(s) } => {
                    if b.user.is_some() {
                        return Err(invariant(format!("{} is docked at {s} and in use", b.id)));
                    }
                    if !self.station(*s)?.contains(b.id) {
                        return Err(invariant(format!("{} claims {s} which does not list it", b.id)));
                    }
                }
                BikeKind::Autonomous { battery, charging_station, .. } => {
                    if !(0.0..=100.0).contains(battery) {
                        return Err(invariant(format!("{} battery {battery} out of range", b.id)));
                    }
                    if let Some(c) = charging_station {
                        if b.user.is_some() {
                            return Err(invariant(format!("{} is charging at {c} and in use", b.id)));
                        }
                        if !self.charging_station(*c)?.contains(b.id) {
                            return Err(invariant(format!("{} claims {c} which does not list it", b.id)));
                        }
                    }
                }
                _ => {}
            }
            if b.user.is_some() && !b.busy {
                return Err(invariant(format!("{} has a user but is not busy", b.id)));
            }
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn release(b: &mut Bike) -> RegistryResult<()> {
    if b.user.is_none() {
        return Err(RegistryError::NotInUse { bike: b.id });
    }
    b.user = None;
    b.busy = false;
    Ok(())
}

fn wrong_kind(b: &Bike, expected: OperatingMode) -> RegistryError {
    let expected = match expected {
        OperatingMode::StationBased => "station-based",
        OperatingMode::Dockless     => "dockless",
        OperatingMode::Autonomous   => "autonomous",
    };
    RegistryError::WrongBikeKind { bike: b.id, expected, actual: b.kind.name() }
}

fn invariant(msg: String) -> RegistryError {
    RegistryError::Invariant(msg)
}
