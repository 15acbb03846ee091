//! Fluent builder for constructing a [`FleetSim`].

use fleet_core::{DistanceProvider, FleetConfig, SimDuration, SimRng};
use fleet_registry::{DockRecord, Registry, RegistryBuilder};
use fleet_sched::Scheduler;

use crate::{FleetProcess, FleetSim, RunSummary, SimError, SimResult, Snapshot, Trip};

/// Seed offsets for the child RNG streams derived from `FleetConfig::seed`.
const FLEET_SEEDING_STREAM: u64 = 1;
const STATION_UNLOCK_STREAM: u64 = 2;

/// Fluent builder for [`FleetSim<D>`].
///
/// # Required inputs
///
/// - [`FleetConfig`]: mode, fleet size, speeds, thresholds, …
/// - `D: DistanceProvider`: e.g. [`HaversineDistance`](fleet_core::HaversineDistance)
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                   |
/// |---------------------------|-------------------------------------------|
/// | `.stations(v)`            | No stations                               |
/// | `.charging_stations(v)`   | Mirror of the station roster              |
/// | `.registry(r)`            | Built from the rosters and `seed_fleet`   |
/// | `.trips(v)`               | No trips                                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = FleetSimBuilder::new(config, HaversineDistance::default())
///     .stations(load_docks_csv(&stations_path)?)
///     .trips(load_trips_csv(&trips_path)?)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct FleetSimBuilder<D: DistanceProvider> {
    config:   FleetConfig,
    distance: D,
    stations: Vec<DockRecord>,
    charging: Option<Vec<DockRecord>>,
    registry: Option<Registry>,
    trips:    Vec<Trip>,
}

impl<D: DistanceProvider> FleetSimBuilder<D> {
    pub fn new(config: FleetConfig, distance: D) -> Self {
        Self {
            config,
            distance,
            stations: Vec::new(),
            charging: None,
            registry: None,
            trips:    Vec::new(),
        }
    }

    /// Docking-station roster.  Bikes are seeded from it per
    /// `config.mode` and `config.fleet_size`.
    pub fn stations(mut self, records: Vec<DockRecord>) -> Self {
        self.stations = records;
        self
    }

    /// Charging-station roster.  Without one, every docking station doubles
    /// as a charging station.
    pub fn charging_stations(mut self, records: Vec<DockRecord>) -> Self {
        self.charging = Some(records);
        self
    }

    /// Use a pre-built registry instead of the rosters.  No fleet seeding
    /// happens; the registry's bikes are used as they are.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn trips(mut self, trips: Vec<Trip>) -> Self {
        self.trips = trips;
        self
    }

    /// Validate the config, build the registry, and spawn one process per
    /// trip at its departure time.
    pub fn build(self) -> SimResult<FleetSim<D>> {
        self.config.validate().map_err(|e| SimError::Config(e.to_string()))?;

        // ── Registry ──────────────────────────────────────────────────────
        let mut root = SimRng::new(self.config.seed);
        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                let mut b = RegistryBuilder::new();
                b.add_stations(&self.stations);
                match &self.charging {
                    Some(records) => b.add_charging_stations(records),
                    None => b.charging_from_stations(),
                };
                b.seed_fleet(&self.config, &mut root.child(FLEET_SEEDING_STREAM))?;
                b.build(root.child(STATION_UNLOCK_STREAM))
            }
        };
        registry.check_invariants()?;

        // ── Processes ─────────────────────────────────────────────────────
        let mut scheduler = Scheduler::new();
        if let Some(secs) = self.config.snapshot_interval_secs {
            scheduler.spawn(FleetProcess::Snapshot(Snapshot::new(SimDuration::from_secs_f64(secs))));
        }
        for trip in &self.trips {
            scheduler.spawn_at(trip.departure, FleetProcess::trip(self.config.mode, *trip))?;
        }

        log::info!(
            "built {} run: {} stations, {} charging stations, {} bikes, {} trips",
            self.config.mode,
            registry.stations().len(),
            registry.charging_stations().len(),
            registry.bikes().len(),
            self.trips.len(),
        );

        Ok(FleetSim {
            summary: RunSummary { trips_total: self.trips.len(), ..RunSummary::default() },
            config: self.config,
            registry,
            distance: self.distance,
            scheduler,
        })
    }
}
