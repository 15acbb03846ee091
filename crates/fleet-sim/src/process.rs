//! The closed set of processes a run schedules.

use fleet_core::{OperatingMode, SimDuration, SimTime};
use fleet_sched::{Context, Process, Step};

use crate::{AutonomousTrip, DocklessTrip, Recharge, StationTrip, Trip, World};

/// Every kind of process in a run.  One enum keeps the scheduler monomorphic
/// and each variant's state inspectable.
#[derive(Clone, Debug)]
pub enum FleetProcess {
    StationTrip(StationTrip),
    DocklessTrip(DocklessTrip),
    AutonomousTrip(AutonomousTrip),
    Recharge(Recharge),
    Snapshot(Snapshot),
}

impl FleetProcess {
    /// The trip process for `mode`.
    pub fn trip(mode: OperatingMode, trip: Trip) -> Self {
        match mode {
            OperatingMode::StationBased => FleetProcess::StationTrip(StationTrip::new(trip)),
            OperatingMode::Dockless     => FleetProcess::DocklessTrip(DocklessTrip::new(trip)),
            OperatingMode::Autonomous   => FleetProcess::AutonomousTrip(AutonomousTrip::new(trip)),
        }
    }

    /// The trip this process serves, for trip variants.
    pub fn as_trip(&self) -> Option<&Trip> {
        match self {
            FleetProcess::StationTrip(p)    => Some(p.trip()),
            FleetProcess::DocklessTrip(p)   => Some(p.trip()),
            FleetProcess::AutonomousTrip(p) => Some(p.trip()),
            _ => None,
        }
    }
}

impl<'a> Process<World<'a>> for FleetProcess {
    fn resume(&mut self, world: &mut World<'a>, cx: &mut Context<'_, Self>) -> Step {
        let now = cx.now();
        match self {
            FleetProcess::StationTrip(p)    => p.resume(world, now),
            FleetProcess::DocklessTrip(p)   => p.resume(world, now),
            FleetProcess::AutonomousTrip(p) => p.resume(world, cx),
            FleetProcess::Recharge(p)       => p.resume(world, now),
            FleetProcess::Snapshot(p)       => p.resume(world, now),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Hands the registry to the observer at a fixed interval.  Stops once no
/// trip or recharge is left in flight.
#[derive(Clone, Debug)]
pub struct Snapshot {
    interval: SimDuration,
}

impl Snapshot {
    pub fn new(interval: SimDuration) -> Self {
        Self { interval: interval.max(SimDuration::from_millis(1)) }
    }

    fn resume(&mut self, world: &mut World<'_>, now: SimTime) -> Step {
        world.snapshot(now);
        if world.summary.trips_in_flight() == 0 && world.summary.recharges_in_flight() == 0 {
            return Step::Done;
        }
        Step::Wait(self.interval)
    }
}
