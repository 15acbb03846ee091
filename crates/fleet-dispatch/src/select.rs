//! Nearest-candidate selection.
//!
//! Every selector follows the same scan:
//!
//! 1. Take every resource of the relevant kind from the registry.
//! 2. Compute the distance from the query location to each one (no early
//!    pruning).
//! 3. Keep the candidates passing the mode's eligibility predicate.
//! 4. Stable-sort by ascending distance and return the first, so equal
//!    distances resolve in registry order.
//!
//! Selectors only read the registry.  Station selectors record their pick in
//! the caller's [`VisitedSet`]; the charging selector leaves that to the
//! caller because the recharge episode's visited list lives on the bike.

use fleet_core::{
    BikeId, ChargingStationId, DistanceProvider, FleetConfig, GeoPoint, StationId,
};
use fleet_registry::{BikeKind, Registry, VisitedSet};

use crate::{CandidateKind, NoCandidateFound};

// ── Selection ─────────────────────────────────────────────────────────────────

/// A chosen candidate and its distance from the query location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection<I> {
    pub id:         I,
    pub location:   GeoPoint,
    pub distance_m: f64,
}

impl<I> Selection<I> {
    /// `distance_m < radius_m`.
    #[inline]
    pub fn within(&self, radius_m: f64) -> bool {
        self.distance_m < radius_m
    }
}

pub type SelectResult<I> = Result<Selection<I>, NoCandidateFound>;

/// Outcome of an autonomous dispatch scan.
#[derive(Clone, Debug, PartialEq)]
pub struct AutonomousDispatch {
    pub assigned:       SelectResult<BikeId>,
    /// Idle bikes at or below the minimum battery level seen during the
    /// scan, in registry order.  The caller starts a recharge for each.
    pub needs_recharge: Vec<BikeId>,
}

// ── Selectors ─────────────────────────────────────────────────────────────────

/// Nearest station with a docked bike, not yet visited, strictly within
/// walking radius.  The pick is added to `visited`.
pub fn select_start_station<D: DistanceProvider + ?Sized>(
    registry: &Registry,
    distance: &D,
    config:   &FleetConfig,
    from:     GeoPoint,
    visited:  &mut VisitedSet<StationId>,
) -> SelectResult<StationId> {
    let stations = registry.stations();
    let dists = distances(stations, |s| s.location(), distance, from);

    let pick = nearest(stations.iter().zip(dists).filter_map(|(s, d)| {
        let eligible = s.has_occupant() && !visited.contains(s.id()) && d < config.walk_radius_m;
        eligible.then(|| Selection { id: s.id(), location: s.location(), distance_m: d })
    }))
    .ok_or(NoCandidateFound::new(CandidateKind::StartStation))?;

    visited.insert(pick.id);
    Ok(pick)
}

/// Nearest station with a free dock, not yet visited.  Walkability from
/// `to` is not enforced; callers check [`Selection::within`] and log.  The
/// pick is added to `visited`.
pub fn select_end_station<D: DistanceProvider + ?Sized>(
    registry: &Registry,
    distance: &D,
    to:       GeoPoint,
    visited:  &mut VisitedSet<StationId>,
) -> SelectResult<StationId> {
    let stations = registry.stations();
    let dists = distances(stations, |s| s.location(), distance, to);

    let pick = nearest(stations.iter().zip(dists).filter_map(|(s, d)| {
        let eligible = s.has_capacity() && !visited.contains(s.id());
        eligible.then(|| Selection { id: s.id(), location: s.location(), distance_m: d })
    }))
    .ok_or(NoCandidateFound::new(CandidateKind::EndStation))?;

    visited.insert(pick.id);
    Ok(pick)
}

/// Nearest idle dockless bike strictly within walking radius.
pub fn select_dockless_bike<D: DistanceProvider + ?Sized>(
    registry: &Registry,
    distance: &D,
    config:   &FleetConfig,
    from:     GeoPoint,
) -> SelectResult<BikeId> {
    let bikes: Vec<_> = registry
        .bikes()
        .iter()
        .filter(|b| matches!(b.kind(), BikeKind::Dockless))
        .collect();
    let dists = distances(&bikes, |b| b.location(), distance, from);

    nearest(bikes.iter().zip(dists).filter_map(|(b, d)| {
        let eligible = !b.is_busy() && d < config.walk_radius_m;
        eligible.then(|| Selection { id: b.id(), location: b.location(), distance_m: d })
    }))
    .ok_or(NoCandidateFound::new(CandidateKind::DocklessBike))
}

/// Nearest idle autonomous bike strictly within the dispatch radius whose
/// battery is strictly above the minimum level.
///
/// The same scan collects every idle bike at or below the minimum level into
/// [`AutonomousDispatch::needs_recharge`], whether or not it is in range.
pub fn assign_autonomous_bike<D: DistanceProvider + ?Sized>(
    registry: &Registry,
    distance: &D,
    config:   &FleetConfig,
    from:     GeoPoint,
) -> AutonomousDispatch {
    let bikes: Vec<(_, f64)> = registry
        .bikes()
        .iter()
        .filter_map(|b| b.battery().map(|battery| (b, battery)))
        .collect();
    let dists = distances(&bikes, |(b, _)| b.location(), distance, from);

    let needs_recharge = bikes
        .iter()
        .filter(|(b, battery)| !b.is_busy() && *battery <= config.min_battery_level)
        .map(|(b, _)| b.id())
        .collect();

    let assigned = nearest(bikes.iter().zip(dists).filter_map(|((b, battery), d)| {
        let eligible = !b.is_busy()
            && d < config.max_autonomous_radius_m
            && *battery > config.min_battery_level;
        eligible.then(|| Selection { id: b.id(), location: b.location(), distance_m: d })
    }))
    .ok_or(NoCandidateFound::new(CandidateKind::AutonomousBike));

    AutonomousDispatch { assigned, needs_recharge }
}

/// Nearest charging station with a free slot that is not in `visited`.
pub fn select_charging_station<D: DistanceProvider + ?Sized>(
    registry: &Registry,
    distance: &D,
    from:     GeoPoint,
    visited:  &VisitedSet<ChargingStationId>,
) -> SelectResult<ChargingStationId> {
    let stations = registry.charging_stations();
    let dists = distances(stations, |c| c.location(), distance, from);

    nearest(stations.iter().zip(dists).filter_map(|(c, d)| {
        let eligible = c.has_capacity() && !visited.contains(c.id());
        eligible.then(|| Selection { id: c.id(), location: c.location(), distance_m: d })
    }))
    .ok_or(NoCandidateFound::new(CandidateKind::ChargingStation))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Distance from `from` to every item, in item order.
fn distances<T, D, L>(items: &[T], locate: L, distance: &D, from: GeoPoint) -> Vec<f64>
where
    T: Sync,
    D: DistanceProvider + ?Sized,
    L: Fn(&T) -> GeoPoint + Sync,
{
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(|item| distance.distance_m(from, locate(item))).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        // `collect` on an indexed parallel iterator preserves input order.
        items.par_iter().map(|item| distance.distance_m(from, locate(item))).collect()
    }
}

/// Stable ascending sort by distance; first element wins.
fn nearest<I>(eligible: impl Iterator<Item = Selection<I>>) -> Option<Selection<I>> {
    let mut ranked: Vec<Selection<I>> = eligible.collect();
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    log::trace!("{} eligible candidates", ranked.len());
    ranked.into_iter().next()
}
