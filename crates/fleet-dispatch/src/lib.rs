//! `fleet-dispatch`: the selection engine.
//!
//! Pure functions that rank and filter stations, bikes, and charging
//! stations around a query location.  Nothing here mutates the registry.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                         |
//! |------------|------------------------------------------------------------------|
//! | [`select`] | `select_start_station`, `select_end_station`, `select_dockless_bike`, `assign_autonomous_bike`, `select_charging_station`, `Selection` |
//! | [`error`]  | `NoCandidateFound`, `CandidateKind`                              |
//!
//! # Eligibility
//!
//! | Selector                   | Predicate                                            |
//! |----------------------------|------------------------------------------------------|
//! | `select_start_station`     | has bikes, not visited, `d < walk_radius_m`           |
//! | `select_end_station`       | has docks, not visited (walkability advisory only)   |
//! | `select_dockless_bike`     | dockless, idle, `d < walk_radius_m`                  |
//! | `assign_autonomous_bike`   | idle, `d < max_autonomous_radius_m`, battery > min   |
//! | `select_charging_station`  | has space, not visited                               |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Candidate distances are computed on Rayon's thread pool. |
//! | `fx-hash`  | Forwards to `fleet-registry/fx-hash`.                   |

pub mod error;
pub mod select;

#[cfg(test)]
mod tests;

pub use error::{CandidateKind, NoCandidateFound};
pub use fleet_registry::VisitedSet;
pub use select::{
    AutonomousDispatch, SelectResult, Selection, assign_autonomous_bike, select_charging_station,
    select_dockless_bike, select_end_station, select_start_station,
};
