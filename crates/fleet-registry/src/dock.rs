//! Capacity-bounded bike holders: docking stations and charging stations.
//!
//! Both resource kinds share one structure, [`Dock<I>`], parameterised by
//! their id type.  The occupant count is derived from the docked-bike list,
//! so `occupant_count == |docked_bike_ids|` holds by construction; only
//! `0 <= occupant_count <= capacity` needs guarding, and every mutator here
//! guards it before touching state.

use std::fmt;

use fleet_core::{BikeId, ChargingStationId, GeoPoint, StationId};

use crate::{RegistryError, RegistryResult};

// ── DockRef ───────────────────────────────────────────────────────────────────

/// Which resource an error or event refers to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DockRef {
    Station(StationId),
    Charging(ChargingStationId),
}

impl fmt::Display for DockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockRef::Station(id)  => write!(f, "{id}"),
            DockRef::Charging(id) => write!(f, "{id}"),
        }
    }
}

impl From<StationId> for DockRef {
    fn from(id: StationId) -> Self {
        DockRef::Station(id)
    }
}

impl From<ChargingStationId> for DockRef {
    fn from(id: ChargingStationId) -> Self {
        DockRef::Charging(id)
    }
}

// ── Dock ──────────────────────────────────────────────────────────────────────

/// A fixed-location resource holding up to `capacity` bikes.
#[derive(Clone, Debug)]
pub struct Dock<I> {
    id:       I,
    location: GeoPoint,
    capacity: u32,
    /// Docked bikes in attach order.
    bikes:    Vec<BikeId>,
}

/// A docking station for station-based bikes.
pub type Station = Dock<StationId>;

/// A charging station for autonomous bikes.
pub type ChargingStation = Dock<ChargingStationId>;

impl<I: Copy + Into<DockRef>> Dock<I> {
    pub(crate) fn new(id: I, location: GeoPoint, capacity: u32) -> Self {
        Self { id, location, capacity, bikes: Vec::with_capacity(capacity as usize) }
    }

    #[inline]
    pub fn id(&self) -> I {
        self.id
    }

    #[inline]
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn occupant_count(&self) -> u32 {
        self.bikes.len() as u32
    }

    /// Docked bikes in attach order.
    #[inline]
    pub fn bikes(&self) -> &[BikeId] {
        &self.bikes
    }

    /// `occupant_count < capacity`: a bike can be attached.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.occupant_count() < self.capacity
    }

    /// `occupant_count > 0`: a bike can be detached.
    #[inline]
    pub fn has_occupant(&self) -> bool {
        !self.bikes.is_empty()
    }

    #[inline]
    pub fn free_slots(&self) -> u32 {
        self.capacity - self.occupant_count()
    }

    #[inline]
    pub fn contains(&self, bike: BikeId) -> bool {
        self.bikes.contains(&bike)
    }

    pub(crate) fn attach(&mut self, bike: BikeId) -> RegistryResult<()> {
        if !self.has_capacity() {
            return Err(RegistryError::CapacityExceeded(self.id.into()));
        }
        self.bikes.push(bike);
        Ok(())
    }

    /// Remove the bike at `slot` (an index into [`bikes`](Self::bikes)).
    pub(crate) fn detach_slot(&mut self, slot: usize) -> RegistryResult<BikeId> {
        if slot >= self.bikes.len() {
            return Err(RegistryError::EmptyResource(self.id.into()));
        }
        Ok(self.bikes.remove(slot))
    }

    /// Remove a specific bike.
    pub(crate) fn detach(&mut self, bike: BikeId) -> RegistryResult<()> {
        if !self.has_occupant() {
            return Err(RegistryError::EmptyResource(self.id.into()));
        }
        match self.bikes.iter().position(|&b| b == bike) {
            Some(slot) => {
                self.bikes.remove(slot);
                Ok(())
            }
            None => Err(RegistryError::NotDocked { bike, dock: self.id.into() }),
        }
    }
}
