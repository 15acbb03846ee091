//! Fluent builder for constructing a [`Registry`].
//!
//! # Usage
//!
//! ```rust
//! use fleet_core::{GeoPoint, SimRng};
//! use fleet_registry::RegistryBuilder;
//!
//! let mut b = RegistryBuilder::new();
//! let s = b.add_station(GeoPoint::new(42.35, -71.06), 4);
//! b.add_station_bike(s).unwrap();
//! let registry = b.build(SimRng::new(7));
//!
//! assert_eq!(registry.station(s).unwrap().occupant_count(), 1);
//! ```
//!
//! Ids are issued densely in insertion order, so `StationId(n)` is the n-th
//! station added.

use fleet_core::{
    BikeId, ChargingStationId, FleetConfig, GeoPoint, OperatingMode, SimRng, StationId,
};

use crate::{
    Bike, BikeKind, ChargingStation, DockRecord, Registry, RegistryError, RegistryResult,
    Station, VisitedSet,
};

/// Fluent builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    stations:          Vec<Station>,
    charging_stations: Vec<ChargingStation>,
    bikes:             Vec<Bike>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Docks ─────────────────────────────────────────────────────────────

    pub fn add_station(&mut self, location: GeoPoint, capacity: u32) -> StationId {
        let id = StationId(self.stations.len() as u32);
        self.stations.push(Station::new(id, location, capacity));
        id
    }

    pub fn add_charging_station(&mut self, location: GeoPoint, capacity: u32) -> ChargingStationId {
        let id = ChargingStationId(self.charging_stations.len() as u32);
        self.charging_stations.push(ChargingStation::new(id, location, capacity));
        id
    }

    /// Add one station per roster record, in record order.
    pub fn add_stations(&mut self, records: &[DockRecord]) -> &mut Self {
        for r in records {
            self.add_station(r.location(), r.capacity);
        }
        self
    }

    /// Add one charging station per roster record, in record order.
    pub fn add_charging_stations(&mut self, records: &[DockRecord]) -> &mut Self {
        for r in records {
            self.add_charging_station(r.location(), r.capacity);
        }
        self
    }

    /// Mirror every docking station as a charging station with the same
    /// location and capacity.  Used when no separate charging roster is given.
    pub fn charging_from_stations(&mut self) -> &mut Self {
        let mirrored: Vec<(GeoPoint, u32)> =
            self.stations.iter().map(|s| (s.location(), s.capacity())).collect();
        for (location, capacity) in mirrored {
            self.add_charging_station(location, capacity);
        }
        self
    }

    // ── Bikes ─────────────────────────────────────────────────────────────

    /// Create a station-based bike docked at `station`.
    pub fn add_station_bike(&mut self, station: StationId) -> RegistryResult<BikeId> {
        let id = BikeId(self.bikes.len() as u32);
        let dock = self
            .stations
            .get_mut(station.index())
            .ok_or(RegistryError::UnknownStation(station))?;
        dock.attach(id)?;
        let kind = BikeKind::Station { station: Some(station) };
        self.bikes.push(Bike::new(id, dock.location(), kind));
        Ok(id)
    }

    pub fn add_dockless_bike(&mut self, location: GeoPoint) -> BikeId {
        let id = BikeId(self.bikes.len() as u32);
        self.bikes.push(Bike::new(id, location, BikeKind::Dockless));
        id
    }

    /// Create an idle autonomous bike.  `battery` is clamped into `[0, 100]`.
    pub fn add_autonomous_bike(&mut self, location: GeoPoint, battery: f64) -> BikeId {
        let id = BikeId(self.bikes.len() as u32);
        let kind = BikeKind::Autonomous {
            battery:          battery.clamp(0.0, 100.0),
            charging_station: None,
            visited:          VisitedSet::new(),
        };
        self.bikes.push(Bike::new(id, location, kind));
        id
    }

    /// Place `config.fleet_size` bikes of `config.mode`.
    ///
    /// Station-based bikes are docked at uniformly random stations that still
    /// have a free dock.  Dockless and autonomous bikes are dropped at the
    /// location of a uniformly random station.
    pub fn seed_fleet(&mut self, config: &FleetConfig, rng: &mut SimRng) -> RegistryResult<()> {
        if self.stations.is_empty() && config.fleet_size > 0 {
            return Err(RegistryError::NoStations);
        }

        match config.mode {
            OperatingMode::StationBased => {
                let available: usize = self.stations.iter().map(|s| s.free_slots() as usize).sum();
                if config.fleet_size > available {
                    return Err(RegistryError::InsufficientDocks {
                        requested: config.fleet_size,
                        available,
                    });
                }
                for _ in 0..config.fleet_size {
                    let open: Vec<StationId> = self
                        .stations
                        .iter()
                        .filter(|s| s.has_capacity())
                        .map(Station::id)
                        .collect();
                    if let Some(&station) = rng.choose(&open) {
                        self.add_station_bike(station)?;
                    }
                }
            }
            OperatingMode::Dockless | OperatingMode::Autonomous => {
                for _ in 0..config.fleet_size {
                    let Some(station) = rng.choose(&self.stations) else { break };
                    let location = station.location();
                    if config.mode == OperatingMode::Dockless {
                        self.add_dockless_bike(location);
                    } else {
                        self.add_autonomous_bike(location, config.initial_battery);
                    }
                }
            }
        }

        log::debug!(
            "seeded {} {} bikes across {} stations",
            config.fleet_size,
            config.mode,
            self.stations.len(),
        );
        Ok(())
    }

    /// Finish building.  `rng` drives the random bike choice at station
    /// unlocks.
    pub fn build(self, rng: SimRng) -> Registry {
        Registry {
            stations:          self.stations,
            charging_stations: self.charging_stations,
            bikes:             self.bikes,
            rng,
        }
    }
}
