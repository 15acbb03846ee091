//! Shared state every process sees while it runs.

use fleet_core::{BikeId, DistanceProvider, FleetConfig, GeoPoint, SimDuration, SimTime};
use fleet_registry::{Registry, RegistryError};
use fleet_sched::Step;

use crate::{FleetEvent, FleetObserver, RunSummary};

/// Borrowed view of the run handed to each resumed process.
///
/// The scheduler runs one process at a time, so a process holding
/// `&mut World` has exclusive access to the registry until it returns.
pub struct World<'a> {
    pub registry:  &'a mut Registry,
    pub config:    &'a FleetConfig,
    pub distance:  &'a dyn DistanceProvider,
    pub summary:   &'a mut RunSummary,
    observer:      &'a mut dyn FleetObserver,
    last_snapshot: Option<SimTime>,
}

impl<'a> World<'a> {
    pub fn new(
        registry: &'a mut Registry,
        config:   &'a FleetConfig,
        distance: &'a dyn DistanceProvider,
        summary:  &'a mut RunSummary,
        observer: &'a mut dyn FleetObserver,
    ) -> Self {
        Self { registry, config, distance, summary, observer, last_snapshot: None }
    }

    /// Log `event` with the simulated timestamp and hand it to the observer.
    pub fn emit(&mut self, now: SimTime, event: FleetEvent) {
        log::log!(event.level(), "[{now}] {event}");
        self.observer.on_event(now, &event);
    }

    /// Hand the registry to the observer.  At most one snapshot per instant.
    pub fn snapshot(&mut self, now: SimTime) {
        if self.last_snapshot == Some(now) {
            return;
        }
        self.last_snapshot = Some(now);
        if cfg!(debug_assertions) {
            if let Err(e) = self.registry.check_invariants() {
                log::error!("[{now}] {e}");
            }
        }
        self.observer.on_snapshot(now, &*self.registry);
    }

    pub(crate) fn on_sim_end(&mut self, now: SimTime) {
        self.observer.on_sim_end(now, &*self.summary);
    }

    #[inline]
    pub fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self.distance.distance_m(from, to)
    }

    /// Report an assertion-level registry failure.
    pub fn registry_fault(&self, now: SimTime, e: &RegistryError) {
        log::error!("[{now}] {e}");
    }

    /// Drive `bike` to `to` under its own power, recording depletion.
    pub fn drive(&mut self, now: SimTime, bike: BikeId, to: GeoPoint, distance_m: f64) {
        let consumption = self.config.battery_consumption_per_m;
        match self.registry.autonomous_drive(bike, to, distance_m, consumption) {
            Ok(report) if report.depleted => {
                self.summary.stranded_drives += 1;
                self.emit(now, FleetEvent::BatteryDepleted { bike, location: to });
            }
            Ok(_) => {}
            Err(e) => self.registry_fault(now, &e),
        }
    }
}

/// `Some(Wait(d))` for a positive duration; `None` when the leg takes no
/// time and the process should carry on at the same instant.
#[inline]
pub(crate) fn wait(d: SimDuration) -> Option<Step> {
    (!d.is_zero()).then_some(Step::Wait(d))
}
