//! Unit tests for fleet-dispatch.

use fleet_core::{
    ChargingStationId, DistanceProvider, FleetConfig, GeoPoint, SimRng, StationId, UserId,
};
use fleet_registry::{Registry, RegistryBuilder, VisitedSet};

use crate::{
    CandidateKind, NoCandidateFound, assign_autonomous_bike, select_charging_station,
    select_dockless_bike, select_end_station, select_start_station,
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

fn cfg() -> FleetConfig {
    FleetConfig::default()
}

/// Stations at the given offsets, each with capacity 2 and the given number
/// of docked bikes.
fn stations(layout: &[(f64, usize)]) -> Registry {
    let mut b = RegistryBuilder::new();
    for &(x, bikes) in layout {
        let s = b.add_station(at(x), 2);
        for _ in 0..bikes {
            b.add_station_bike(s).unwrap();
        }
    }
    b.build(SimRng::new(0))
}

// ── Station selection ─────────────────────────────────────────────────────────

#[cfg(test)]
mod stations {
    use super::*;

    #[test]
    fn start_picks_nearest_with_bikes() {
        // Station 0 is nearest but empty.
        let reg = stations(&[(10.0, 0), (200.0, 1), (100.0, 1)]);
        let mut visited = VisitedSet::new();
        let pick = select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited).unwrap();
        assert_eq!(pick.id, StationId(2));
        assert_eq!(pick.distance_m, 100.0);
        assert!(visited.contains(StationId(2)));
    }

    #[test]
    fn start_skips_visited_stations() {
        let reg = stations(&[(100.0, 1), (200.0, 1)]);
        let mut visited = VisitedSet::new();
        let first = select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited).unwrap();
        let second = select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited).unwrap();
        assert_eq!(first.id, StationId(0));
        assert_eq!(second.id, StationId(1));
        assert_eq!(
            select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited),
            Err(NoCandidateFound::new(CandidateKind::StartStation))
        );
    }

    #[test]
    fn start_radius_is_strict() {
        let radius = cfg().walk_radius_m;
        let reg = stations(&[(radius, 1)]);
        let mut visited = VisitedSet::new();
        assert!(select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited).is_err());
        assert!(visited.is_empty());
    }

    #[test]
    fn equal_distance_resolves_in_registry_order() {
        let reg = stations(&[(-50.0, 1), (50.0, 1)]);
        let mut visited = VisitedSet::new();
        let pick = select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut visited).unwrap();
        assert_eq!(pick.id, StationId(0));
    }

    #[test]
    fn end_ignores_walk_radius_but_requires_docks() {
        // Station 0 is full; station 1 is far beyond walking range.
        let reg = stations(&[(10.0, 2), (9_000.0, 0)]);
        let mut visited = VisitedSet::new();
        let pick = select_end_station(&reg, &Planar, at(0.0), &mut visited).unwrap();
        assert_eq!(pick.id, StationId(1));
        assert!(!pick.within(cfg().walk_radius_m));
    }

    #[test]
    fn end_with_every_station_full() {
        let reg = stations(&[(10.0, 2), (20.0, 2)]);
        let err = select_end_station(&reg, &Planar, at(0.0), &mut VisitedSet::new()).unwrap_err();
        assert_eq!(err.kind, CandidateKind::EndStation);
    }

    #[test]
    fn selection_does_not_mutate_registry() {
        let reg = stations(&[(100.0, 1)]);
        select_start_station(&reg, &Planar, &cfg(), at(0.0), &mut VisitedSet::new()).unwrap();
        assert_eq!(reg.station(StationId(0)).unwrap().occupant_count(), 1);
    }
}

// ── Dockless ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dockless {
    use super::*;

    #[test]
    fn bike_beyond_walk_radius_is_excluded() {
        // A single bike 5000 m away with a 3500 m walking radius.
        let mut b = RegistryBuilder::new();
        b.add_dockless_bike(at(5_000.0));
        let reg = b.build(SimRng::new(0));
        let err = select_dockless_bike(&reg, &Planar, &cfg(), at(0.0)).unwrap_err();
        assert_eq!(err.kind, CandidateKind::DocklessBike);
    }

    #[test]
    fn busy_bikes_are_skipped() {
        let mut b = RegistryBuilder::new();
        let near = b.add_dockless_bike(at(10.0));
        let far = b.add_dockless_bike(at(20.0));
        let mut reg = b.build(SimRng::new(0));
        reg.unlock(near, UserId(0)).unwrap();

        let pick = select_dockless_bike(&reg, &Planar, &cfg(), at(0.0)).unwrap();
        assert_eq!(pick.id, far);
    }

    #[test]
    fn other_bike_kinds_are_not_candidates() {
        let mut b = RegistryBuilder::new();
        b.add_autonomous_bike(at(5.0), 90.0);
        let s = b.add_station(at(5.0), 1);
        b.add_station_bike(s).unwrap();
        let reg = b.build(SimRng::new(0));
        assert!(select_dockless_bike(&reg, &Planar, &cfg(), at(0.0)).is_err());
    }
}

// ── Autonomous ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod autonomous {
    use super::*;

    #[test]
    fn low_battery_idle_bike_is_flagged_not_assigned() {
        // Battery 20 < 25: it must trigger a recharge and not be returned.
        let mut b = RegistryBuilder::new();
        let low = b.add_autonomous_bike(at(10.0), 20.0);
        let reg = b.build(SimRng::new(0));

        let out = assign_autonomous_bike(&reg, &Planar, &cfg(), at(0.0));
        assert_eq!(out.needs_recharge, vec![low]);
        assert_eq!(out.assigned, Err(NoCandidateFound::new(CandidateKind::AutonomousBike)));
    }

    #[test]
    fn threshold_boundaries() {
        let min = cfg().min_battery_level;
        let mut b = RegistryBuilder::new();
        let at_min = b.add_autonomous_bike(at(10.0), min);
        let above = b.add_autonomous_bike(at(20.0), min + 0.5);
        let reg = b.build(SimRng::new(0));

        let out = assign_autonomous_bike(&reg, &Planar, &cfg(), at(0.0));
        assert_eq!(out.needs_recharge, vec![at_min]);
        assert_eq!(out.assigned.unwrap().id, above);
    }

    #[test]
    fn recharge_candidates_include_out_of_range_bikes() {
        let mut b = RegistryBuilder::new();
        let far_low = b.add_autonomous_bike(at(50_000.0), 5.0);
        let near = b.add_autonomous_bike(at(100.0), 80.0);
        let reg = b.build(SimRng::new(0));

        let out = assign_autonomous_bike(&reg, &Planar, &cfg(), at(0.0));
        assert_eq!(out.needs_recharge, vec![far_low]);
        assert_eq!(out.assigned.unwrap().id, near);
    }

    #[test]
    fn busy_bikes_are_neither_assigned_nor_flagged() {
        let mut b = RegistryBuilder::new();
        let reserved = b.add_autonomous_bike(at(10.0), 80.0);
        let charging = b.add_autonomous_bike(at(10.0), 3.0);
        let mut reg = b.build(SimRng::new(0));
        reg.reserve(reserved).unwrap();
        reg.begin_recharge(charging).unwrap();

        let out = assign_autonomous_bike(&reg, &Planar, &cfg(), at(0.0));
        assert!(out.needs_recharge.is_empty());
        assert!(out.assigned.is_err());
    }

    #[test]
    fn dispatch_radius_is_strict() {
        let radius = cfg().max_autonomous_radius_m;
        let mut b = RegistryBuilder::new();
        b.add_autonomous_bike(at(radius), 90.0);
        let reg = b.build(SimRng::new(0));
        assert!(assign_autonomous_bike(&reg, &Planar, &cfg(), at(0.0)).assigned.is_err());
    }
}

// ── Charging stations ─────────────────────────────────────────────────────────

#[cfg(test)]
mod charging {
    use super::*;

    #[test]
    fn nearest_with_space_not_visited() {
        let mut b = RegistryBuilder::new();
        let full = b.add_charging_station(at(5.0), 1);
        let visited_one = b.add_charging_station(at(10.0), 1);
        let open = b.add_charging_station(at(400.0), 1);
        let occupant = b.add_autonomous_bike(at(5.0), 10.0);
        let mut reg = b.build(SimRng::new(0));
        reg.dock_for_charging(occupant, full).unwrap();

        let mut visited = VisitedSet::new();
        visited.insert(visited_one);
        let pick = select_charging_station(&reg, &Planar, at(0.0), &visited).unwrap();
        assert_eq!(pick.id, open);
        // The caller records the visit.
        assert!(!visited.contains(open));
    }

    #[test]
    fn no_station_with_space() {
        let reg = RegistryBuilder::new().build(SimRng::new(0));
        let err = select_charging_station(&reg, &Planar, at(0.0), &VisitedSet::new()).unwrap_err();
        assert_eq!(err.kind, CandidateKind::ChargingStation);
        assert_eq!(err.to_string(), "no eligible charging station found");
    }

    #[test]
    fn unknown_ids_in_visited_are_harmless() {
        let mut b = RegistryBuilder::new();
        let only = b.add_charging_station(at(1.0), 1);
        let reg = b.build(SimRng::new(0));
        let mut visited = VisitedSet::new();
        visited.insert(ChargingStationId(99));
        assert_eq!(select_charging_station(&reg, &Planar, at(0.0), &visited).unwrap().id, only);
    }
}
