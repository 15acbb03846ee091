//! Autonomous recharge episode.
//!
//! ```text
//! Seek ─drive→ AtStation ─lock, 1s→ Charge ─(100 − battery) / rate→ Charged ─unlock, 1s→ Release → idle
//!  ↑  ↑   full, 1s        │
//!  │  └───────────────────┘
//!  └─ no candidate: clear visited, back off, retry (bounded)
//! ```
//!
//! The bike is busy from the trigger until `Release`, so no dispatch can
//! assign it mid-episode.  A full station sends the bike back to `Seek`
//! with the station still marked visited.  After
//! `max_charge_search_attempts` consecutive empty searches the episode is
//! abandoned and the bike returns to service; a later dispatch scan will
//! trigger it again.

use fleet_core::{BikeId, ChargingStationId, SimTime};
use fleet_dispatch::select_charging_station;
use fleet_registry::{Bike, VisitedSet};
use fleet_sched::{Context, Step};

use crate::world::wait;
use crate::{FleetEvent, FleetProcess, World};

/// Take `bike` out of service and spawn its recharge process.
pub(crate) fn trigger_recharge(
    world: &mut World<'_>,
    cx:    &mut Context<'_, FleetProcess>,
    bike:  BikeId,
) {
    let now = cx.now();
    let battery = world.registry.bike(bike).ok().and_then(Bike::battery).unwrap_or(0.0);
    match world.registry.begin_recharge(bike) {
        Ok(()) => {
            world.summary.recharges_started += 1;
            world.emit(now, FleetEvent::RechargeTriggered { bike, battery });
            cx.spawn(FleetProcess::Recharge(Recharge::new(bike)));
        }
        Err(e) => world.registry_fault(now, &e),
    }
}

#[derive(Clone, Debug)]
enum State {
    Seek,
    AtStation { station: ChargingStationId, drive_m: f64 },
    Charge { station: ChargingStationId },
    Charged { station: ChargingStationId },
    Release,
}

/// One recharge episode of one autonomous bike.
#[derive(Clone, Debug)]
pub struct Recharge {
    bike:   BikeId,
    /// Consecutive searches that found no station.
    misses: u32,
    state:  State,
}

impl Recharge {
    pub fn new(bike: BikeId) -> Self {
        Self { bike, misses: 0, state: State::Seek }
    }

    pub fn bike(&self) -> BikeId {
        self.bike
    }

    pub(crate) fn resume(&mut self, world: &mut World<'_>, now: SimTime) -> Step {
        let bike = self.bike;
        loop {
            match self.state {
                State::Seek => {
                    let pick = {
                        let registry = &*world.registry;
                        let Ok(b) = registry.bike(bike) else {
                            log::error!("[{now}] recharge for unknown {bike} dropped");
                            return Step::Done;
                        };
                        let empty = VisitedSet::new();
                        let visited = b.charge_visited().unwrap_or(&empty);
                        select_charging_station(registry, world.distance, b.location(), visited)
                    };

                    match pick {
                        Ok(pick) => {
                            self.misses = 0;
                            if let Err(e) = world.registry.record_charge_visit(bike, pick.id) {
                                world.registry_fault(now, &e);
                            }
                            world.emit(now, FleetEvent::ChargingStationSelected {
                                bike,
                                station:    pick.id,
                                distance_m: pick.distance_m,
                            });
                            self.state = State::AtStation { station: pick.id, drive_m: pick.distance_m };
                            if let Some(step) = wait(world.config.drive_time(pick.distance_m)) {
                                return step;
                            }
                        }
                        Err(_) => {
                            self.misses += 1;
                            if self.misses >= world.config.max_charge_search_attempts {
                                world.emit(now, FleetEvent::ChargeSearchExhausted { bike, attempts: self.misses });
                                if let Err(e) = world.registry.end_recharge(bike) {
                                    world.registry_fault(now, &e);
                                }
                                world.summary.recharges_abandoned += 1;
                                return Step::Done;
                            }
                            world.emit(now, FleetEvent::ChargeSearchBackoff { bike, attempt: self.misses });
                            if let Err(e) = world.registry.clear_charge_visits(bike) {
                                world.registry_fault(now, &e);
                            }
                            return Step::Wait(world.config.retry_backoff());
                        }
                    }
                }

                State::AtStation { station, drive_m } => {
                    let Ok(target) = world.registry.charging_station(station) else {
                        self.state = State::Seek;
                        continue;
                    };
                    let location = target.location();
                    world.drive(now, bike, location, drive_m);

                    if world.registry.charging_station_has_space(station) {
                        match world.registry.dock_for_charging(bike, station) {
                            Ok(()) => self.state = State::Charge { station },
                            Err(e) => {
                                world.registry_fault(now, &e);
                                world.emit(now, FleetEvent::ChargingStationFull { bike, station });
                                self.state = State::Seek;
                            }
                        }
                    } else {
                        world.emit(now, FleetEvent::ChargingStationFull { bike, station });
                        self.state = State::Seek;
                    }
                    if let Some(step) = wait(world.config.interaction_delay()) {
                        return step;
                    }
                }

                State::Charge { station } => {
                    let battery = world.registry.bike(bike).ok().and_then(Bike::battery).unwrap_or(0.0);
                    world.emit(now, FleetEvent::ChargingStarted { bike, station, battery });
                    self.state = State::Charged { station };
                    if let Some(step) = wait(world.config.charging_time(battery)) {
                        return step;
                    }
                }

                State::Charged { station } => {
                    if let Err(e) = world.registry.complete_charge(bike) {
                        world.registry_fault(now, &e);
                    }
                    if let Err(e) = world.registry.undock_from_charging(bike) {
                        world.registry_fault(now, &e);
                    }
                    world.emit(now, FleetEvent::ChargingFinished { bike, station });
                    self.state = State::Release;
                    if let Some(step) = wait(world.config.interaction_delay()) {
                        return step;
                    }
                }

                State::Release => {
                    if let Err(e) = world.registry.end_recharge(bike) {
                        world.registry_fault(now, &e);
                    }
                    world.summary.recharges_completed += 1;
                    return Step::Done;
                }
            }
        }
    }
}
