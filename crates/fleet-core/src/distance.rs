//! Geo-distance provider.
//!
//! The simulator never routes by itself: every travel distance comes from a
//! [`DistanceProvider`], so applications can plug in a road-network router,
//! a precomputed matrix, or the great-circle fallback shipped here.
//!
//! # Contract
//!
//! - Result is metres, finite and `>= 0`.
//! - Deterministic for fixed inputs: run replay depends on it.

use crate::GeoPoint;

/// Pluggable travel-distance source.
///
/// `Send + Sync` so candidate scans can compute distances on worker threads
/// (`fleet-dispatch` with the `parallel` feature).
pub trait DistanceProvider: Send + Sync {
    /// Travel distance from `from` to `to` along the path network, in metres.
    fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

impl<D: DistanceProvider + ?Sized> DistanceProvider for &D {
    #[inline]
    fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        (**self).distance_m(from, to)
    }
}

impl<D: DistanceProvider + ?Sized> DistanceProvider for Box<D> {
    #[inline]
    fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        (**self).distance_m(from, to)
    }
}

/// Great-circle distance scaled by a detour factor.
///
/// Road distance is longer than the great-circle distance; `detour_factor`
/// (>= 1.0) is the average ratio between the two for the study area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HaversineDistance {
    pub detour_factor: f64,
}

impl HaversineDistance {
    pub fn new(detour_factor: f64) -> Self {
        Self { detour_factor: detour_factor.max(1.0) }
    }
}

impl Default for HaversineDistance {
    fn default() -> Self {
        Self { detour_factor: 1.0 }
    }
}

impl DistanceProvider for HaversineDistance {
    #[inline]
    fn distance_m(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        from.haversine_m(to) * self.detour_factor
    }
}
