//! Unit and end-to-end tests for fleet-sim.

use fleet_core::{
    BikeId, ChargingStationId, DistanceProvider, FleetConfig, GeoPoint, OperatingMode,
    SimDuration, SimRng, SimTime, StationId, UserId,
};
use fleet_dispatch::CandidateKind;
use fleet_registry::{DockRecord, Registry, RegistryBuilder, RegistryError};
use fleet_sched::Step;

use crate::{
    EventLog, FleetEvent, FleetObserver, FleetSim, FleetSimBuilder, RunSummary, SimError,
    StationTrip, Trip, World, load_trips_reader,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Treats `lon`/`lat` as planar metres so distances are exact.
struct Planar;

impl DistanceProvider for Planar {
    fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        ((from.lon - to.lon).powi(2) + (from.lat - to.lat).powi(2)).sqrt()
    }
}

/// Point `x` metres east of the origin.
fn at(x: f64) -> GeoPoint {
    GeoPoint::new(0.0, x)
}

fn secs(s: u64) -> SimTime {
    SimTime(s * 1_000)
}

/// Round speeds (walk 1 m/s, ride 2 m/s, drive 1 m/s) and no seeded fleet.
fn cfg(mode: OperatingMode) -> FleetConfig {
    FleetConfig {
        mode,
        fleet_size:                0,
        walking_speed_mps:         1.0,
        riding_speed_mps:          2.0,
        aut_driving_speed_mps:     1.0,
        battery_consumption_per_m: 0.01,
        ..FleetConfig::default()
    }
}

fn trip(user: u32, from: GeoPoint, to: GeoPoint, departure_s: u64) -> Trip {
    Trip { user: UserId(user), origin: from, destination: to, departure: secs(departure_s) }
}

fn run(config: FleetConfig, registry: Registry, trips: Vec<Trip>) -> (RunSummary, EventLog, FleetSim<Planar>) {
    let mut sim = FleetSimBuilder::new(config, Planar)
        .registry(registry)
        .trips(trips)
        .build()
        .unwrap();
    let mut log = EventLog::new();
    let summary = sim.run(&mut log).unwrap();
    (summary, log, sim)
}

/// Time of the first event matching `pred`.
fn first(log: &EventLog, pred: impl Fn(&FleetEvent) -> bool) -> Option<SimTime> {
    log.events.iter().find(|(_, e)| pred(e)).map(|(t, _)| *t)
}

/// Collects invariant violations at every snapshot.
#[derive(Default)]
struct InvariantCheck {
    snapshots:  usize,
    violations: Vec<String>,
    ended:      Option<RunSummary>,
}

impl FleetObserver for InvariantCheck {
    fn on_snapshot(&mut self, now: SimTime, registry: &Registry) {
        self.snapshots += 1;
        if let Err(e) = registry.check_invariants() {
            self.violations.push(format!("[{now}] {e}"));
        }
    }

    fn on_sim_end(&mut self, _now: SimTime, summary: &RunSummary) {
        self.ended = Some(summary.clone());
    }
}

/// Ten stations on a line, 500 m apart, four docks each.
fn station_line() -> Vec<DockRecord> {
    (0..10).map(|i| DockRecord::new(0.0, i as f64 * 500.0, 4)).collect()
}

/// `n` trips with random endpoints along the station line.
fn random_trips(n: u32, seed: u64) -> Vec<Trip> {
    let mut rng = SimRng::new(seed);
    (0..n)
        .map(|user| {
            let from: f64 = rng.gen_range(0.0..4_500.0);
            let to: f64 = rng.gen_range(0.0..4_500.0);
            let departure: u64 = rng.gen_range(0..3_600);
            trip(user, at(from), at(to), departure)
        })
        .collect()
}

// ── Station-based trips ───────────────────────────────────────────────────────

#[cfg(test)]
mod station_based {
    use super::*;

    fn two_stations() -> Registry {
        let mut b = RegistryBuilder::new();
        let a = b.add_station(at(0.0), 1);
        b.add_station(at(1_000.0), 2);
        b.add_station_bike(a).unwrap();
        b.build(SimRng::new(0))
    }

    #[test]
    fn second_rider_at_emptied_station_aborts() {
        let trips = vec![
            trip(0, at(0.0), at(1_000.0), 0),
            trip(1, at(0.0), at(1_000.0), 0),
        ];
        let (summary, log, sim) = run(cfg(OperatingMode::StationBased), two_stations(), trips);

        assert_eq!(summary.trips_completed, 1);
        assert_eq!(summary.trips_aborted, 1);
        assert!(log.events.iter().any(|(t, e)| *t == SimTime::ZERO
            && *e == FleetEvent::TripAborted { user: UserId(1), reason: CandidateKind::StartStation }));

        let reg = sim.registry();
        assert_eq!(reg.station(StationId(0)).unwrap().occupant_count(), 0);
        assert_eq!(reg.station(StationId(1)).unwrap().occupant_count(), 1);
        assert_eq!(reg.bike(BikeId(0)).unwrap().station(), Some(StationId(1)));
        assert!(!reg.is_bike_busy(BikeId(0)));
    }

    #[test]
    fn trip_timeline() {
        let trips = vec![trip(0, at(0.0), at(1_000.0), 0)];
        let (summary, log, _) = run(cfg(OperatingMode::StationBased), two_stations(), trips);

        // unlock at 0, 1 s interaction, 500 s ride, 1 s lock, no walk, 10 s settle.
        assert_eq!(first(&log, |e| matches!(e, FleetEvent::UnlockSucceeded { .. })), Some(secs(0)));
        assert_eq!(first(&log, |e| matches!(e, FleetEvent::LockSucceeded { .. })), Some(secs(501)));
        assert_eq!(first(&log, |e| matches!(e, FleetEvent::TripArrived { .. })), Some(secs(512)));
        assert_eq!(summary.final_time, secs(512));
        assert_eq!(summary.success_rate(), 1.0);
    }

    #[test]
    fn start_station_beyond_walk_radius_aborts() {
        let mut b = RegistryBuilder::new();
        let s = b.add_station(at(4_000.0), 1);
        b.add_station_bike(s).unwrap();
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, _, _) = run(cfg(OperatingMode::StationBased), b.build(SimRng::new(0)), trips);
        assert_eq!(summary.trips_aborted, 1);
    }

    #[test]
    fn unwalkable_end_station_is_advisory() {
        let mut b = RegistryBuilder::new();
        let a = b.add_station(at(0.0), 1);
        b.add_station(at(2_000.0), 1);
        b.add_station_bike(a).unwrap();
        let mut config = cfg(OperatingMode::StationBased);
        config.walk_radius_m = 500.0;
        // Destination is 1500 m from the only free dock once the rider leaves A.
        let trips = vec![trip(0, at(0.0), at(3_500.0), 0)];
        let (summary, log, _) = run(config, b.build(SimRng::new(0)), trips);

        assert!(log.events.iter().any(|(_, e)| matches!(e, FleetEvent::EndStationNotWalkable { .. })));
        assert_eq!(summary.trips_completed, 1);
    }

    /// Move the docked bike at `from` into `to` on behalf of a third party.
    fn shuttle(world: &mut World<'_>, from: StationId, to: StationId) {
        let bike = world.registry.unlock_from_station(from, UserId(99)).unwrap();
        world.registry.lock_into_station(to, bike).unwrap();
    }

    #[test]
    fn full_end_stations_trigger_lock_failure_then_retry() {
        let (a, b) = (StationId(0), StationId(1));
        let mut builder = RegistryBuilder::new();
        builder.add_station(at(0.0), 1);
        builder.add_station(at(1_000.0), 1);
        builder.add_station_bike(a).unwrap();
        builder.add_station_bike(b).unwrap();
        let mut registry = builder.build(SimRng::new(0));

        let config = cfg(OperatingMode::StationBased);
        let mut summary = RunSummary { trips_total: 1, ..RunSummary::default() };
        let mut log = EventLog::new();
        let mut world = World::new(&mut registry, &config, &Planar, &mut summary, &mut log);
        let mut p = StationTrip::new(trip(0, at(0.0), at(500.0), 0));

        // Unlock at A.
        assert_eq!(p.resume(&mut world, secs(0)), Step::Wait(SimDuration::from_secs(1)));
        shuttle(&mut world, b, a);
        // A is full again: ride to B.
        assert_eq!(p.resume(&mut world, secs(1)), Step::Wait(SimDuration::from_secs(500)));
        shuttle(&mut world, a, b);
        // B filled meanwhile: re-select A.
        assert_eq!(p.resume(&mut world, secs(501)), Step::Wait(SimDuration::from_secs(500)));
        shuttle(&mut world, b, a);
        // A filled meanwhile, B already tried: back off.
        assert_eq!(p.resume(&mut world, secs(1_001)), Step::Wait(config.retry_backoff()));
        // Visited was cleared: B is eligible again.
        assert_eq!(p.resume(&mut world, secs(1_061)), Step::Wait(SimDuration::from_secs(500)));
        drop(world);

        let failures = log.events.iter().filter(|(_, e)| matches!(e, FleetEvent::LockFailed { .. })).count();
        assert_eq!(failures, 2);
        assert_eq!(first(&log, |e| matches!(e, FleetEvent::EndStationRetry { .. })), Some(secs(1_001)));
    }
}

// ── Dockless trips ────────────────────────────────────────────────────────────

#[cfg(test)]
mod dockless {
    use super::*;

    #[test]
    fn bike_beyond_walk_radius_aborts() {
        let mut b = RegistryBuilder::new();
        b.add_dockless_bike(at(5_000.0));
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, log, sim) = run(cfg(OperatingMode::Dockless), b.build(SimRng::new(0)), trips);

        assert_eq!(summary.trips_aborted, 1);
        assert!(log.events.iter().any(|(_, e)| *e
            == FleetEvent::TripAborted { user: UserId(0), reason: CandidateKind::DocklessBike }));
        assert!(!sim.registry().is_bike_busy(BikeId(0)));
    }

    #[test]
    fn bike_taken_while_walking_sends_rider_back_to_selection() {
        let mut b = RegistryBuilder::new();
        b.add_dockless_bike(at(100.0));
        let trips = vec![
            trip(0, at(0.0), at(1_000.0), 0),
            trip(1, at(200.0), at(1_000.0), 0),
        ];
        let (summary, log, sim) = run(cfg(OperatingMode::Dockless), b.build(SimRng::new(0)), trips);

        // Both walk 100 s; user 0 was queued first and wins the bike.
        assert_eq!(summary.trips_completed, 1);
        assert_eq!(summary.trips_aborted, 1);
        let lost: Vec<_> = log.for_user(UserId(1)).map(|(_, e)| e.clone()).collect();
        assert!(lost.contains(&FleetEvent::UnlockFailed { user: UserId(1), bike: Some(BikeId(0)), station: None }));
        assert_eq!(sim.registry().bike(BikeId(0)).unwrap().location(), at(1_000.0));
    }
}

// ── Autonomous trips and recharging ───────────────────────────────────────────

#[cfg(test)]
mod autonomous {
    use super::*;

    #[test]
    fn low_battery_bike_is_recharged_not_dispatched() {
        let mut b = RegistryBuilder::new();
        b.add_charging_station(at(0.0), 1);
        let low = b.add_autonomous_bike(at(0.0), 20.0);
        let ok = b.add_autonomous_bike(at(100.0), 80.0);
        let trips = vec![trip(0, at(0.0), at(500.0), 0)];
        let (summary, log, sim) = run(cfg(OperatingMode::Autonomous), b.build(SimRng::new(0)), trips);

        assert_eq!(summary.trips_completed, 1);
        assert_eq!(summary.recharges_started, 1);
        assert_eq!(summary.recharges_completed, 1);

        let triggered = first(&log, |e| matches!(e, FleetEvent::RechargeTriggered { bike, .. } if *bike == low));
        let assigned = first(&log, |e| matches!(e, FleetEvent::BikeAssigned { bike, .. } if *bike == ok));
        assert_eq!(triggered, Some(SimTime::ZERO));
        assert_eq!(assigned, Some(SimTime::ZERO));
        assert!(!log.events.iter().any(|(_, e)| matches!(e, FleetEvent::BikeAssigned { bike, .. } if *bike == low)));

        let reg = sim.registry();
        let charged = reg.bike(low).unwrap();
        assert_eq!(charged.battery(), Some(100.0));
        assert!(!charged.is_busy());
        assert_eq!(charged.charging_station(), None);
        assert!(!reg.charging_station_has_occupant(ChargingStationId(0)));
        // 100 m pickup drive at 0.01 %/m; the ride itself is pedalled.
        let ridden = reg.bike(ok).unwrap();
        assert!((ridden.battery().unwrap() - 79.0).abs() < 1e-9);
        assert_eq!(ridden.location(), at(500.0));
    }

    #[test]
    fn charging_from_empty_takes_five_hours() {
        let mut b = RegistryBuilder::new();
        b.add_charging_station(at(0.0), 1);
        let bike = b.add_autonomous_bike(at(0.0), 0.0);
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, log, sim) = run(cfg(OperatingMode::Autonomous), b.build(SimRng::new(0)), trips);

        assert_eq!(summary.trips_aborted, 1);
        let started = first(&log, |e| matches!(e, FleetEvent::ChargingStarted { .. })).unwrap();
        let finished = first(&log, |e| matches!(e, FleetEvent::ChargingFinished { .. })).unwrap();
        assert_eq!(finished - started, SimDuration::from_secs(18_000));
        assert_eq!(sim.registry().bike(bike).unwrap().battery(), Some(100.0));
    }

    #[test]
    fn full_charging_station_is_skipped() {
        let mut b = RegistryBuilder::new();
        let near = b.add_charging_station(at(0.0), 1);
        let far = b.add_charging_station(at(300.0), 1);
        let first_bike = b.add_autonomous_bike(at(-100.0), 10.0);
        let second_bike = b.add_autonomous_bike(at(-100.0), 10.0);
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, log, _) = run(cfg(OperatingMode::Autonomous), b.build(SimRng::new(0)), trips);

        assert_eq!(summary.recharges_completed, 2);
        // Both head for `near`; the second finds it taken and moves on.
        assert!(log.for_bike(second_bike).any(|(_, e)| *e
            == FleetEvent::ChargingStationFull { bike: second_bike, station: near }));
        assert!(log.for_bike(second_bike).any(|(_, e)| matches!(e,
            FleetEvent::ChargingStarted { station, .. } if *station == far)));
        assert!(log.for_bike(first_bike).any(|(_, e)| matches!(e,
            FleetEvent::ChargingStarted { station, .. } if *station == near)));
    }

    #[test]
    fn charge_search_gives_up_after_max_attempts() {
        let mut b = RegistryBuilder::new();
        let bike = b.add_autonomous_bike(at(0.0), 10.0);
        let mut config = cfg(OperatingMode::Autonomous);
        config.max_charge_search_attempts = 3;
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, log, sim) = run(config, b.build(SimRng::new(0)), trips);

        let timeline: Vec<_> = log.for_bike(bike)
            .filter(|(_, e)| matches!(e, FleetEvent::ChargeSearchBackoff { .. } | FleetEvent::ChargeSearchExhausted { .. }))
            .cloned()
            .collect();
        assert_eq!(timeline, vec![
            (secs(0), FleetEvent::ChargeSearchBackoff { bike, attempt: 1 }),
            (secs(60), FleetEvent::ChargeSearchBackoff { bike, attempt: 2 }),
            (secs(120), FleetEvent::ChargeSearchExhausted { bike, attempts: 3 }),
        ]);
        assert_eq!(summary.recharges_abandoned, 1);
        assert_eq!(summary.recharges_in_flight(), 0);
        assert!(!sim.registry().is_bike_busy(bike));
    }

    #[test]
    fn draining_pickup_clamps_battery_and_counts_stranded_drive() {
        let mut b = RegistryBuilder::new();
        let bike = b.add_autonomous_bike(at(400.0), 30.0);
        let mut config = cfg(OperatingMode::Autonomous);
        config.battery_consumption_per_m = 0.1;
        let trips = vec![trip(0, at(0.0), at(100.0), 0)];
        let (summary, log, sim) = run(config, b.build(SimRng::new(0)), trips);

        assert_eq!(summary.stranded_drives, 1);
        assert_eq!(
            first(&log, |e| matches!(e, FleetEvent::BatteryDepleted { .. })),
            Some(secs(400)),
        );
        assert_eq!(sim.registry().bike(bike).unwrap().battery(), Some(0.0));
        assert_eq!(summary.trips_completed, 1);
    }

    #[test]
    fn reserved_bike_is_not_assigned_twice() {
        let mut b = RegistryBuilder::new();
        b.add_autonomous_bike(at(100.0), 90.0);
        let trips = vec![
            trip(0, at(0.0), at(500.0), 0),
            trip(1, at(0.0), at(500.0), 0),
        ];
        let (summary, _, _) = run(cfg(OperatingMode::Autonomous), b.build(SimRng::new(0)), trips);
        assert_eq!(summary.trips_completed, 1);
        assert_eq!(summary.trips_aborted, 1);
    }
}

// ── Orchestration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod orchestration {
    use super::*;

    fn seeded(mode: OperatingMode, observer: &mut impl FleetObserver) -> RunSummary {
        let mut config = cfg(mode);
        config.fleet_size = 25;
        config.snapshot_interval_secs = Some(300.0);
        FleetSimBuilder::new(config, Planar)
            .stations(station_line())
            .trips(random_trips(60, 7))
            .build()
            .unwrap()
            .run(observer)
            .unwrap()
    }

    #[test]
    fn invariants_hold_at_every_snapshot() {
        for mode in [OperatingMode::StationBased, OperatingMode::Dockless, OperatingMode::Autonomous] {
            let mut check = InvariantCheck::default();
            let summary = seeded(mode, &mut check);
            assert!(check.violations.is_empty(), "{mode}: {:?}", check.violations);
            assert!(check.snapshots > 1);
            assert_eq!(check.ended.as_ref(), Some(&summary));
            assert_eq!(summary.trips_total, 60);
            assert_eq!(summary.trips_completed + summary.trips_aborted, 60);
            assert_eq!(summary.trips_pending, 0);
        }
    }

    #[test]
    fn identical_inputs_produce_identical_runs() {
        for mode in [OperatingMode::StationBased, OperatingMode::Dockless, OperatingMode::Autonomous] {
            let (mut a, mut b) = (EventLog::new(), EventLog::new());
            let sa = seeded(mode, &mut a);
            let sb = seeded(mode, &mut b);
            assert_eq!(sa, sb);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn snapshots_are_periodic_and_end_with_final() {
        let mut log = EventLog::new();
        let summary = seeded(OperatingMode::Dockless, &mut log);
        assert_eq!(log.snapshots.first(), Some(&SimTime::ZERO));
        assert!(log.snapshots.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(log.snapshots.last(), Some(&summary.final_time));
    }

    #[test]
    fn horizon_leaves_trips_pending() {
        let mut b = RegistryBuilder::new();
        b.add_dockless_bike(at(0.0));
        let mut config = cfg(OperatingMode::Dockless);
        config.horizon_secs = Some(100.0);
        let trips = vec![
            trip(0, at(0.0), at(1_000.0), 0),
            trip(1, at(0.0), at(1_000.0), 200),
        ];
        let (summary, _, sim) = run(config, b.build(SimRng::new(0)), trips);

        assert_eq!(summary.trips_pending, 2);
        assert_eq!(summary.trips_completed, 0);
        assert_eq!(summary.final_time, secs(100));
        assert_eq!(sim.now(), secs(100));
        assert!(sim.registry().is_bike_busy(BikeId(0)));
        assert_eq!(sim.live_processes().filter_map(|p| p.as_trip()).count(), 2);
    }

    #[test]
    fn empty_roster_finishes_at_zero() {
        let (summary, log, _) = run(cfg(OperatingMode::Dockless), RegistryBuilder::new().build(SimRng::new(0)), vec![]);
        assert_eq!(summary.final_time, SimTime::ZERO);
        assert_eq!(summary.success_rate(), 0.0);
        assert!(log.events.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = cfg(OperatingMode::Dockless);
        config.walking_speed_mps = 0.0;
        let err = FleetSimBuilder::new(config, Planar).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn nan_horizon_is_rejected() {
        let mut config = cfg(OperatingMode::StationBased);
        config.horizon_secs = Some(f64::NAN);
        let err = FleetSimBuilder::new(config, Planar)
            .trips(vec![trip(0, at(0.0), at(100.0), 0)])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn seeding_without_stations_is_rejected() {
        let mut config = cfg(OperatingMode::Dockless);
        config.fleet_size = 5;
        let err = FleetSimBuilder::new(config, Planar).build().err().unwrap();
        assert!(matches!(err, SimError::Registry(RegistryError::NoStations)));
    }

    #[test]
    fn station_seeding_fills_docks() {
        let mut config = cfg(OperatingMode::StationBased);
        config.fleet_size = 40;
        let sim = FleetSimBuilder::new(config, Planar).stations(station_line()).build().unwrap();
        assert_eq!(sim.registry().bikes().len(), 40);
        assert!(sim.registry().stations().iter().all(|s| !s.has_capacity()));
        assert_eq!(sim.registry().charging_stations().len(), 10);
    }
}

// ── Trip loader ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    #[test]
    fn rows_become_users_in_order() {
        let csv = "origin_lat,origin_lon,destination_lat,destination_lon,departure_secs\n\
                   42.35, -71.06, 42.36, -71.05, 0\n\
                   42.30,-71.10,42.31,-71.11,90.5\n";
        let trips = load_trips_reader(csv.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].user, UserId(0));
        assert_eq!(trips[0].origin, GeoPoint::new(42.35, -71.06));
        assert_eq!(trips[1].user, UserId(1));
        assert_eq!(trips[1].departure, SimTime(90_500));
    }

    #[test]
    fn negative_departure_is_rejected() {
        let csv = "origin_lat,origin_lon,destination_lat,destination_lon,departure_secs\n\
                   0,0,0,0,-1\n";
        assert!(matches!(load_trips_reader(csv.as_bytes()), Err(SimError::Parse(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn trips_are_serde_records() {
        fn record<T: serde::Serialize + serde::de::DeserializeOwned>() {}
        record::<Trip>();
    }

    #[test]
    fn malformed_row_is_rejected() {
        let csv = "origin_lat,origin_lon,destination_lat,destination_lon,departure_secs\n\
                   0,0,north,0,0\n";
        assert!(matches!(load_trips_reader(csv.as_bytes()), Err(SimError::Parse(_))));
    }
}
