//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer count of simulated **milliseconds** since the start of
//! the run.  Travel and charging durations are computed in floating-point
//! seconds and rounded to the nearest millisecond exactly once, at the point
//! they become a `SimDuration`.  Everything downstream (queue ordering,
//! horizon checks, summing legs) is exact integer arithmetic, so two runs
//! over identical inputs order their wake-ups identically.

use std::fmt;

const MILLIS_PER_SEC: f64 = 1_000.0;

// ── SimDuration ───────────────────────────────────────────────────────────────

/// A non-negative span of simulated time, in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimDuration(pub u64);

impl SimDuration {
    pub const ZERO: SimDuration = SimDuration(0);

    #[inline]
    pub fn from_millis(ms: u64) -> Self {
        SimDuration(ms)
    }

    #[inline]
    pub fn from_secs(secs: u64) -> Self {
        SimDuration(secs.saturating_mul(1_000))
    }

    /// Round `secs` to the nearest millisecond.  Negative and NaN inputs
    /// collapse to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return SimDuration::ZERO;
        }
        SimDuration((secs * MILLIS_PER_SEC).round() as u64)
    }

    /// Time to cover `distance_m` at `speed_mps`.
    #[inline]
    pub fn travel(distance_m: f64, speed_mps: f64) -> Self {
        Self::from_secs_f64(distance_m / speed_mps)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MILLIS_PER_SEC
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::Add for SimDuration {
    type Output = SimDuration;
    #[inline]
    fn add(self, rhs: SimDuration) -> SimDuration {
        SimDuration(self.0 + rhs.0)
    }
}

impl fmt::Display for SimDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in milliseconds since the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    /// Round `secs` to the nearest millisecond (see [`SimDuration::from_secs_f64`]).
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime(SimDuration::from_secs_f64(secs).0)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MILLIS_PER_SEC
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> SimDuration {
        SimDuration(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<SimDuration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimDuration) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimDuration;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimDuration {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    /// Seconds with millisecond precision, e.g. `1234.500`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The sole source of "now" for every timeout in the run.
///
/// Only the scheduler advances the clock, and only forward.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock to `t`.  Moving backward is a scheduler bug.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        debug_assert!(t >= self.now, "clock moved backward: {} -> {}", self.now, t);
        self.now = self.now.max(t);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.now.0 / 1_000;
        let (h, m, s) = (total / 3_600, (total % 3_600) / 60, total % 60);
        write!(f, "{} ({:02}:{:02}:{:02})", self.now, h, m, s)
    }
}
