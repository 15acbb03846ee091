//! Station-based trip.
//!
//! ```text
//! Depart → SeekStart ─walk→ AtStart ─unlock, 1s→ SeekEnd ─ride→ AtEnd
//!             ↑  no bikes left  │                   ↑  full   │
//!             └─────────────────┘                   └─────────┘
//!                                              ─lock, 1s→ WalkHome ─walk→ Settle ─10s→ Done
//! ```
//!
//! `SeekStart` with no candidate aborts the trip.  `SeekEnd` with no
//! candidate clears the visited set and retries after the backoff delay:
//! the rider cannot abandon the bike.

use fleet_core::{BikeId, GeoPoint, OperatingMode, SimTime, StationId};
use fleet_dispatch::{select_end_station, select_start_station};
use fleet_registry::VisitedSet;
use fleet_sched::Step;

use crate::world::wait;
use crate::{FleetEvent, StationPhase, Trip, World};

#[derive(Clone, Debug)]
enum State {
    Depart,
    SeekStart,
    AtStart { station: StationId },
    SeekEnd { bike: BikeId },
    AtEnd { bike: BikeId, station: StationId },
    WalkHome { bike: BikeId },
    Settle { bike: BikeId },
    Arrive { bike: BikeId },
}

/// A trip that picks up and returns a docked bike.
#[derive(Clone, Debug)]
pub struct StationTrip {
    trip:     Trip,
    location: GeoPoint,
    /// Stations tried in the current phase.  Cleared between start and end.
    visited:  VisitedSet<StationId>,
    state:    State,
}

impl StationTrip {
    pub fn new(trip: Trip) -> Self {
        Self { location: trip.origin, trip, visited: VisitedSet::new(), state: State::Depart }
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
                        mode:   OperatingMode::StationBased,
                        origin: self.trip.origin,
                    });
                    self.state = State::SeekStart;
                }

                State::SeekStart => {
                    let pick = select_start_station(
                        world.registry,
                        world.distance,
                        world.config,
                        self.location,
                        &mut self.visited,
                    );
                    let pick = match pick {
                        Ok(pick) => pick,
                        Err(none) => {
                            world.summary.trips_aborted += 1;
                            world.emit(now, FleetEvent::TripAborted { user, reason: none.kind });
                            return Step::Done;
                        }
                    };
                    world.emit(now, FleetEvent::StationSelected {
                        user,
                        station:    pick.id,
                        phase:      StationPhase::Start,
                        distance_m: pick.distance_m,
                    });
                    self.state = State::AtStart { station: pick.id };
                    self.location = pick.location;
                    if let Some(step) = wait(world.config.walk_time(pick.distance_m)) {
                        return step;
                    }
                }

                State::AtStart { station } => {
                    if !world.registry.station_has_bikes(station) {
                        world.emit(now, FleetEvent::UnlockFailed { user, bike: None, station: Some(station) });
                        self.state = State::SeekStart;
                        continue;
                    }
                    match world.registry.unlock_from_station(station, user) {
                        Ok(bike) => {
                            world.emit(now, FleetEvent::UnlockSucceeded { user, bike, station: Some(station) });
                            self.visited.clear();
                            self.state = State::SeekEnd { bike };
                            if let Some(step) = wait(world.config.interaction_delay()) {
                                return step;
                            }
                        }
                        Err(e) => {
                            world.registry_fault(now, &e);
                            world.emit(now, FleetEvent::UnlockFailed { user, bike: None, station: Some(station) });
                            self.state = State::SeekStart;
                        }
                    }
                }

                State::SeekEnd { bike } => {
                    let pick = select_end_station(
                        world.registry,
                        world.distance,
                        self.trip.destination,
                        &mut self.visited,
                    );
                    let Ok(pick) = pick else {
                        world.emit(now, FleetEvent::EndStationRetry { user, bike });
                        self.visited.clear();
                        return Step::Wait(world.config.retry_backoff());
                    };
                    world.emit(now, FleetEvent::StationSelected {
                        user,
                        station:    pick.id,
                        phase:      StationPhase::End,
                        distance_m: pick.distance_m,
                    });
                    if !pick.within(world.config.walk_radius_m) {
                        world.emit(now, FleetEvent::EndStationNotWalkable {
                            user,
                            station:    pick.id,
                            distance_m: pick.distance_m,
                        });
                    }
                    let ride_m = world.distance_m(self.location, pick.location);
                    self.location = pick.location;
                    self.state = State::AtEnd { bike, station: pick.id };
                    if let Some(step) = wait(world.config.ride_time(ride_m)) {
                        return step;
                    }
                }

                State::AtEnd { bike, station } => {
                    if !world.registry.station_has_docks(station) {
                        world.emit(now, FleetEvent::LockFailed { user, bike, station });
                        self.state = State::SeekEnd { bike };
                        continue;
                    }
                    match world.registry.lock_into_station(station, bike) {
                        Ok(()) => {
                            world.emit(now, FleetEvent::LockSucceeded { user, bike, station: Some(station) });
                            self.state = State::WalkHome { bike };
                            if let Some(step) = wait(world.config.interaction_delay()) {
                                return step;
                            }
                        }
                        Err(e) => {
                            world.registry_fault(now, &e);
                            world.emit(now, FleetEvent::LockFailed { user, bike, station });
                            self.state = State::SeekEnd { bike };
                        }
                    }
                }

                State::WalkHome { bike } => {
                    let walk_m = world.distance_m(self.location, self.trip.destination);
                    self.location = self.trip.destination;
                    self.state = State::Settle { bike };
                    if let Some(step) = wait(world.config.walk_time(walk_m)) {
                        return step;
                    }
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
