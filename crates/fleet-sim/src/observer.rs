//! Simulation observer trait for event reporting and data collection.

use fleet_core::{BikeId, SimTime, UserId};
use fleet_registry::Registry;

use crate::{FleetEvent, RunSummary};

/// Callbacks invoked while a [`FleetSim`](crate::FleetSim) runs.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: abort counter
///
/// ```rust,ignore
/// struct Aborts(usize);
///
/// impl FleetObserver for Aborts {
///     fn on_event(&mut self, _now: SimTime, event: &FleetEvent) {
///         if matches!(event, FleetEvent::TripAborted { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called for every state transition, in order.
    fn on_event(&mut self, _now: SimTime, _event: &FleetEvent) {}

    /// Called every `snapshot_interval_secs` and once at the end of the run,
    /// with read-only access to all stations and bikes.
    fn on_snapshot(&mut self, _now: SimTime, _registry: &Registry) {}

    /// Called once after the scheduler stops.
    fn on_sim_end(&mut self, _now: SimTime, _summary: &RunSummary) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// Records every event in memory.  Two runs with identical inputs produce
/// equal logs.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct EventLog {
    pub events:    Vec<(SimTime, FleetEvent)>,
    pub snapshots: Vec<SimTime>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events concerning `user`, in order.
    pub fn for_user(&self, user: UserId) -> impl Iterator<Item = &(SimTime, FleetEvent)> {
        self.events.iter().filter(move |(_, e)| e.user() == Some(user))
    }

    /// Events concerning `bike`, in order.
    pub fn for_bike(&self, bike: BikeId) -> impl Iterator<Item = &(SimTime, FleetEvent)> {
        self.events.iter().filter(move |(_, e)| e.bike() == Some(bike))
    }
}

impl FleetObserver for EventLog {
    fn on_event(&mut self, now: SimTime, event: &FleetEvent) {
        self.events.push((now, event.clone()));
    }

    fn on_snapshot(&mut self, now: SimTime, _registry: &Registry) {
        self.snapshots.push(now);
    }
}
