//! Autonomous trip.
//!
//! ```text
//! Depart → Dispatch ─bike drives to rider→ Pickup ─unlock, ride→ Release ─drop→ Settle ─10s→ Done
//! ```
//!
//! The dispatch scan also starts a recharge process for every idle bike it
//! finds at or below the minimum battery level.  The assigned bike is
//! reserved immediately so no other dispatch can claim it during the pickup
//! drive.

use fleet_core::{BikeId, GeoPoint, OperatingMode, SimTime};
use fleet_dispatch::{CandidateKind, assign_autonomous_bike};
use fleet_sched::{Context, Step};

use crate::recharge::trigger_recharge;
use crate::world::wait;
use crate::{FleetEvent, FleetProcess, Trip, World};

#[derive(Clone, Debug)]
enum State {
    Depart,
    Dispatch,
    Pickup { bike: BikeId, drive_m: f64 },
    Release { bike: BikeId },
    Settle { bike: BikeId },
    Arrive { bike: BikeId },
}

/// A trip on a self-driving bike that comes to the rider.
#[derive(Clone, Debug)]
pub struct AutonomousTrip {
    trip:     Trip,
    location: GeoPoint,
    state:    State,
}

impl AutonomousTrip {
    pub fn new(trip: Trip) -> Self {
        Self { location: trip.origin, trip, state: State::Depart }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub(crate) fn resume(
        &mut self,
        world: &mut World<'_>,
        cx:    &mut Context<'_, FleetProcess>,
    ) -> Step {
        let now = cx.now();
        let user = self.trip.user;
        loop {
            match self.state {
                State::Depart => {
                    world.emit(now, FleetEvent::TripDeparted {
                        user,
                        mode:   OperatingMode::Autonomous,
                        origin: self.trip.origin,
                    });
                    self.state = State::Dispatch;
                }

                State::Dispatch => {
                    let scan = assign_autonomous_bike(
                        world.registry,
                        world.distance,
                        world.config,
                        self.location,
                    );
                    for bike in scan.needs_recharge {
                        trigger_recharge(world, cx, bike);
                    }

                    let pick = match scan.assigned {
                        Ok(pick) => pick,
                        Err(none) => return self.abort(world, now, none.kind),
                    };
                    if let Err(e) = world.registry.reserve(pick.id) {
                        world.registry_fault(now, &e);
                        return self.abort(world, now, CandidateKind::AutonomousBike);
                    }
                    let drive_m = world.distance_m(pick.location, self.location);
                    world.emit(now, FleetEvent::BikeAssigned { user, bike: pick.id, distance_m: drive_m });
                    self.state = State::Pickup { bike: pick.id, drive_m };
                    if let Some(step) = wait(world.config.drive_time(drive_m)) {
                        return step;
                    }
                }

                State::Pickup { bike, drive_m } => {
                    world.drive(now, bike, self.location, drive_m);
                    world.emit(now, FleetEvent::PickupArrived { user, bike });
                    if let Err(e) = world.registry.unlock(bike, user) {
                        world.registry_fault(now, &e);
                        world.emit(now, FleetEvent::UnlockFailed { user, bike: Some(bike), station: None });
                        return self.abort(world, now, CandidateKind::AutonomousBike);
                    }
                    world.emit(now, FleetEvent::UnlockSucceeded { user, bike, station: None });
                    let ride_m = world.distance_m(self.location, self.trip.destination);
                    self.state = State::Release { bike };
                    if let Some(step) = wait(world.config.ride_time(ride_m)) {
                        return step;
                    }
                }

                State::Release { bike } => {
                    self.location = self.trip.destination;
                    if let Err(e) = world.registry.ride(bike, self.location) {
                        world.registry_fault(now, &e);
                    }
                    match world.registry.drop_bike(bike) {
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

    fn abort(&self, world: &mut World<'_>, now: SimTime, reason: CandidateKind) -> Step {
        world.summary.trips_aborted += 1;
        world.emit(now, FleetEvent::TripAborted { user: self.trip.user, reason });
        Step::Done
    }
}
