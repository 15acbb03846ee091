//! `FleetSim`: owns one run's registry, processes, and clock.

use fleet_core::{DistanceProvider, FleetConfig, SimTime};
use fleet_registry::Registry;
use fleet_sched::Scheduler;

use crate::{FleetObserver, FleetProcess, RunSummary, SimResult, World};

/// A ready-to-run simulation.  Build with
/// [`FleetSimBuilder`](crate::FleetSimBuilder).
///
/// # Run loop
///
/// 1. Every trip was spawned at its departure time; the optional snapshot
///    process at time 0.
/// 2. The scheduler resumes the earliest process, which runs until its next
///    travel leg or delay, possibly spawning recharge processes.
/// 3. Once the queue is empty or the horizon is reached, a final snapshot is
///    taken and the observer receives the [`RunSummary`].
pub struct FleetSim<D: DistanceProvider> {
    pub(crate) config:    FleetConfig,
    pub(crate) registry:  Registry,
    pub(crate) distance:  D,
    pub(crate) scheduler: Scheduler<FleetProcess>,
    pub(crate) summary:   RunSummary,
}

impl<D: DistanceProvider> FleetSim<D> {
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Processes spawned so far that have not finished.
    pub fn live_processes(&self) -> impl Iterator<Item = &FleetProcess> {
        self.scheduler.processes().filter_map(|(_, p)| p)
    }

    /// Run until every process finishes or the configured horizon.
    ///
    /// Processes still waiting at the horizon are left queued; they are
    /// counted in `trips_pending` and not cancelled.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let until = self.config.horizon();
        let mut world = World::new(
            &mut self.registry,
            &self.config,
            &self.distance,
            &mut self.summary,
            observer,
        );

        let resumed = self.scheduler.run_until(until, &mut world)?;
        let now = self.scheduler.now();

        world.snapshot(now);
        world.summary.trips_pending = world.summary.trips_in_flight();
        world.summary.final_time = now;
        world.on_sim_end(now);

        log::info!(
            "[{now}] run finished after {resumed} resumptions: {} of {} trips completed",
            self.summary.trips_completed,
            self.summary.trips_total,
        );
        Ok(self.summary.clone())
    }
}
