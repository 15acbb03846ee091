//! Dockless trip.
//!
//! ```text
//! Depart → Seek ─walk→ AtBike ─unlock→ Ride ─ride→ Release ─drop→ Settle ─10s→ Done
//!           ↑  taken meanwhile │
//!           └──────────────────┘
//! ```
//!
//! The chosen bike may be claimed by another rider while this one walks to
//! it.  The unlock re-checks `busy`; a stale choice sends the trip back to
//! selection.

use fleet_core::{BikeId, GeoPoint, OperatingMode, SimTime};
use fleet_dispatch::select_dockless_bike;
use fleet_registry::RegistryError;
use fleet_sched::Step;

use crate::world::wait;
use crate::{FleetEvent, Trip, World};

#[derive(Clone, Debug)]
enum State {
    Depart,
    Seek,
    AtBike { bike: BikeId },
    Release { bike: BikeId },
    Settle { bike: BikeId },
    Arrive { bike: BikeId },
}

/// A trip on a free-floating bike.
#[derive(Clone, Debug)]
pub struct DocklessTrip {
    trip:     Trip,
    location: GeoPoint,
    state:    State,
}

impl DocklessTrip {
    pub fn new(trip: Trip) -> Self {
        Self { location: trip.origin, trip, state: State::Depart }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub(crate) fn resume(&mut self, world: &mut World<'_>, now: SimTime) -> Step {
        let user = self.trip.user;
        loop {
            match self.state {
                State::Depart => {
                    world.emit(now, FleetEvent::TripDeparted {
                        user,
                        mode:   OperatingMode::Dockless,
                        origin: self.trip.origin,
                    });
                    self.state = State::Seek;
                }

                State::Seek => {
                    let pick = select_dockless_bike(
                        world.registry,
                        world.distance,
                        world.config,
                        self.location,
                    );
                    let pick = match pick {
                        Ok(pick) => pick,
                        Err(none) => {
                            world.summary.trips_aborted += 1;
                            world.emit(now, FleetEvent::TripAborted { user, reason: none.kind });
                            return Step::Done;
                        }
                    };
                    world.emit(now, FleetEvent::BikeSelected {
                        user,
                        bike:       pick.id,
                        distance_m: pick.distance_m,
                    });
                    self.location = pick.location;
                    self.state = State::AtBike { bike: pick.id };
                    if let Some(step) = wait(world.config.walk_time(pick.distance_m)) {
                        return step;
                    }
                }

                State::AtBike { bike } => match world.registry.unlock(bike, user) {
                    Ok(()) => {
                        world.emit(now, FleetEvent::UnlockSucceeded { user, bike, station: None });
                        let ride_m = world.distance_m(self.location, self.trip.destination);
                        self.state = State::Release { bike };
                        if let Some(step) = wait(world.config.ride_time(ride_m)) {
                            return step;
                        }
                    }
                    Err(e) => {
                        if !matches!(e, RegistryError::BikeBusy { .. }) {
                            world.registry_fault(now, &e);
                        }
                        world.emit(now, FleetEvent::UnlockFailed { user, bike: Some(bike), station: None });
                        self.state = State::Seek;
                    }
                },

                State::Release { bike } => {
                    self.location = self.trip.destination;
                    if let Err(e) = world.registry.ride(bike, self.location) {
                        world.registry_fault(now, &e);
                    }
                    match world.registry.lock(bike) {
                        Ok(()) => world.emit(now, FleetEvent::LockSucceeded { user, bike, station: None }),
                        Err(e) => world.registry_fault(now, &e),
                    }
                    self.state = State::Settle { bike };
                }

                State::Settle { bike } => {
                    self.state = State::Arrive { bike };
                    if let Some(step) = wait(world.config.settle_delay()) {
                        return step;
                    }
                }

                State::Arrive { bike } => {
                    world.summary.trips_completed += 1;
                    world.emit(now, FleetEvent::TripArrived { user, bike });
                    return Step::Done;
                }
            }
        }
    }
}
