//! `fleet-core`: foundational types for the bike-fleet simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`ids`]       | `StationId`, `ChargingStationId`, `BikeId`, `UserId`, `ProcessId` |
//! | [`geo`]       | `GeoPoint`, haversine distance                              |
//! | [`time`]      | `SimTime`, `SimDuration`, `SimClock`                        |
//! | [`rng`]       | `SimRng` (seeded, deterministic)                            |
//! | [`config`]    | `FleetConfig`, `OperatingMode`                              |
//! | [`distance`]  | `DistanceProvider` trait, `HaversineDistance`               |
//! | [`error`]     | `FleetError`, `FleetResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and data types.   |

pub mod config;
pub mod distance;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FleetConfig, OperatingMode};
pub use distance::{DistanceProvider, HaversineDistance};
pub use error::{FleetError, FleetResult};
pub use geo::GeoPoint;
pub use ids::{BikeId, ChargingStationId, ProcessId, StationId, UserId};
pub use rng::SimRng;
pub use time::{SimClock, SimDuration, SimTime};
