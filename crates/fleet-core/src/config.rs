//! Run configuration.
//!
//! `FleetConfig` is read once at process start (the demo loads it from JSON)
//! and is immutable for the run.  Every component receives it by reference
//! at construction time.

use std::fmt;
use std::str::FromStr;

use crate::{FleetError, FleetResult, SimDuration, SimTime};

const KMH: f64 = 1.0 / 3.6;

// ── OperatingMode ─────────────────────────────────────────────────────────────

/// How bikes are acquired and returned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OperatingMode {
    /// Bikes live in docking stations; users walk to a station to unlock.
    StationBased,
    /// Bikes are parked anywhere; users walk to the nearest free bike.
    Dockless,
    /// Bikes drive themselves to the user and to charging stations.
    #[default]
    Autonomous,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::StationBased => "station_based",
            OperatingMode::Dockless     => "dockless",
            OperatingMode::Autonomous   => "autonomous",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = FleetError;

    fn from_str(s: &str) -> FleetResult<Self> {
        match s.trim() {
            "station_based" | "0" => Ok(OperatingMode::StationBased),
            "dockless"      | "1" => Ok(OperatingMode::Dockless),
            "autonomous"    | "2" => Ok(OperatingMode::Autonomous),
            other => Err(FleetError::Parse(format!(
                "invalid operating mode {other:?}: expected station_based, dockless, or autonomous"
            ))),
        }
    }
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Speeds are metres per second, distances metres, durations seconds,
/// battery levels percent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    pub mode: OperatingMode,

    /// Number of bikes placed by fleet seeding.
    pub fleet_size: usize,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Stop the run at this simulated instant.  `None` runs until every
    /// process has finished.
    pub horizon_secs: Option<f64>,

    pub walking_speed_mps: f64,
    pub riding_speed_mps: f64,
    pub aut_driving_speed_mps: f64,

    /// Battery percent consumed per metre of autonomous driving.
    pub battery_consumption_per_m: f64,

    /// Battery percent gained per second while charging.
    pub charging_speed_pct_per_sec: f64,

    /// Furthest a user walks to reach a station or a dockless bike.
    pub walk_radius_m: f64,

    /// Furthest an autonomous bike is dispatched to pick up a user.
    pub max_autonomous_radius_m: f64,

    /// Bikes at or below this level are sent to recharge and never dispatched.
    pub min_battery_level: f64,

    /// Battery level of autonomous bikes at fleet seeding.
    pub initial_battery: f64,

    /// Dismount/paperwork delay before a trip counts as arrived.
    pub settle_delay_secs: f64,

    /// Lock/unlock micro-delay at a station or charging station.
    pub interaction_delay_secs: f64,

    /// Wait before retrying a selection that found no candidate (end-station
    /// search while riding, charging-station search).
    pub retry_backoff_secs: f64,

    /// Consecutive empty charging-station searches before a recharge
    /// episode is abandoned.
    pub max_charge_search_attempts: u32,

    /// Emit a registry snapshot this often.  `None` disables periodic
    /// snapshots (a final snapshot is always taken).
    pub snapshot_interval_secs: Option<f64>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            mode:                       OperatingMode::Autonomous,
            fleet_size:                 300,
            seed:                       42,
            horizon_secs:               None,
            walking_speed_mps:          5.0 * KMH,
            riding_speed_mps:           15.0 * KMH,
            aut_driving_speed_mps:      10.0 * KMH,
            battery_consumption_per_m:  0.1,
            charging_speed_pct_per_sec: 100.0 / (5.0 * 3_600.0), // full charge in 5 h
            walk_radius_m:              3_500.0,
            max_autonomous_radius_m:    3_000.0,
            min_battery_level:          25.0,
            initial_battery:            26.0,
            settle_delay_secs:          10.0,
            interaction_delay_secs:     1.0,
            retry_backoff_secs:         60.0,
            max_charge_search_attempts: 10,
            snapshot_interval_secs:     None,
        }
    }
}

impl FleetConfig {
    /// Reject configurations that would make the run meaningless or stall
    /// the scheduler (non-positive speeds divide travel distances).
    pub fn validate(&self) -> FleetResult<()> {
        let positive = [
            ("walking_speed_mps",          self.walking_speed_mps),
            ("riding_speed_mps",           self.riding_speed_mps),
            ("aut_driving_speed_mps",      self.aut_driving_speed_mps),
            ("charging_speed_pct_per_sec", self.charging_speed_pct_per_sec),
            ("retry_backoff_secs",         self.retry_backoff_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FleetError::Config(format!("{name} must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("battery_consumption_per_m", self.battery_consumption_per_m),
            ("walk_radius_m",             self.walk_radius_m),
            ("max_autonomous_radius_m",   self.max_autonomous_radius_m),
            ("settle_delay_secs",         self.settle_delay_secs),
            ("interaction_delay_secs",    self.interaction_delay_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FleetError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }

        for (name, value) in [
            ("min_battery_level", self.min_battery_level),
            ("initial_battery",   self.initial_battery),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(FleetError::Config(format!("{name} must be within [0, 100], got {value}")));
            }
        }

        if self.max_charge_search_attempts == 0 {
            return Err(FleetError::Config("max_charge_search_attempts must be >= 1".into()));
        }
        if let Some(horizon) = self.horizon_secs {
            if !(horizon.is_finite() && horizon >= 0.0) {
                return Err(FleetError::Config(format!("horizon_secs must be >= 0, got {horizon}")));
            }
        }
        if let Some(interval) = self.snapshot_interval_secs {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(FleetError::Config(format!(
                    "snapshot_interval_secs must be > 0, got {interval}"
                )));
            }
        }
        Ok(())
    }

    /// The instant the run stops, or `SimTime::MAX` without a horizon.
    pub fn horizon(&self) -> SimTime {
        self.horizon_secs.map_or(SimTime::MAX, SimTime::from_secs_f64)
    }

    #[inline]
    pub fn settle_delay(&self) -> SimDuration {
        SimDuration::from_secs_f64(self.settle_delay_secs)
    }

    #[inline]
    pub fn interaction_delay(&self) -> SimDuration {
        SimDuration::from_secs_f64(self.interaction_delay_secs)
    }

    /// Never zero: a retry always lets simulated time move on.
    #[inline]
    pub fn retry_backoff(&self) -> SimDuration {
        SimDuration::from_secs_f64(self.retry_backoff_secs).max(SimDuration::from_millis(1))
    }

    #[inline]
    pub fn walk_time(&self, distance_m: f64) -> SimDuration {
        SimDuration::travel(distance_m, self.walking_speed_mps)
    }

    #[inline]
    pub fn ride_time(&self, distance_m: f64) -> SimDuration {
        SimDuration::travel(distance_m, self.riding_speed_mps)
    }

    #[inline]
    pub fn drive_time(&self, distance_m: f64) -> SimDuration {
        SimDuration::travel(distance_m, self.aut_driving_speed_mps)
    }

    /// Time to charge from `battery` to 100 %.
    pub fn charging_time(&self, battery: f64) -> SimDuration {
        SimDuration::from_secs_f64((100.0 - battery).max(0.0) / self.charging_speed_pct_per_sec)
    }
}
