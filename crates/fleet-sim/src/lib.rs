//! `fleet-sim`: trip and recharge processes plus the run orchestrator.
//!
//! # Processes
//!
//! Every trip becomes one process, spawned at its departure time.  Which
//! state machine it runs depends on `FleetConfig::mode`:
//!
//! | Mode            | Process            | Acquire                         | Return                   |
//! |-----------------|--------------------|---------------------------------|--------------------------|
//! | `station_based` | [`StationTrip`]    | walk to nearest station, unlock | ride to station, lock    |
//! | `dockless`      | [`DocklessTrip`]   | walk to nearest free bike       | ride to destination      |
//! | `autonomous`    | [`AutonomousTrip`] | bike drives to the rider        | ride to destination      |
//!
//! Autonomous dispatch scans also spawn a [`Recharge`] process for every
//! idle bike at or below `min_battery_level`.  An optional [`Snapshot`]
//! process hands the registry to the observer at a fixed interval.
//!
//! # Crate layout
//!
//! | Module              | Contents                                              |
//! |---------------------|-------------------------------------------------------|
//! | [`station_trip`]    | `StationTrip`                                         |
//! | [`dockless_trip`]   | `DocklessTrip`                                        |
//! | [`autonomous_trip`] | `AutonomousTrip`                                      |
//! | [`recharge`]        | `Recharge` (charging sub-process)                     |
//! | [`process`]         | `FleetProcess`, `Snapshot`                            |
//! | [`world`]           | `World` (registry, config, distances, observer)       |
//! | [`event`]           | `FleetEvent`, `StationPhase`                          |
//! | [`observer`]        | `FleetObserver`, `NoopObserver`, `EventLog`           |
//! | [`summary`]         | `RunSummary`                                          |
//! | [`trip`]            | `Trip`, `load_trips_csv`, `load_trips_reader`         |
//! | [`builder`]         | `FleetSimBuilder`                                     |
//! | [`sim`]             | `FleetSim`                                            |
//! | [`error`]           | `SimError`, `SimResult`                               |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Candidate distances on Rayon's thread pool.            |
//! | `fx-hash`  | FxHash visited sets.                                   |
//! | `serde`    | `Serialize`/`Deserialize` on config, ids, and trips.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::{FleetConfig, HaversineDistance};
//! use fleet_registry::load_docks_csv;
//! use fleet_sim::{FleetSimBuilder, NoopObserver, load_trips_csv};
//!
//! let mut sim = FleetSimBuilder::new(config, HaversineDistance::default())
//!     .stations(load_docks_csv(&stations_path)?)
//!     .trips(load_trips_csv(&trips_path)?)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{summary}");
//! ```

pub mod autonomous_trip;
pub mod builder;
pub mod dockless_trip;
pub mod error;
pub mod event;
pub mod observer;
pub mod process;
pub mod recharge;
pub mod sim;
pub mod station_trip;
pub mod summary;
pub mod trip;
pub mod world;

#[cfg(test)]
mod tests;

pub use autonomous_trip::AutonomousTrip;
pub use builder::FleetSimBuilder;
pub use dockless_trip::DocklessTrip;
pub use error::{SimError, SimResult};
pub use event::{FleetEvent, StationPhase};
pub use observer::{EventLog, FleetObserver, NoopObserver};
pub use process::{FleetProcess, Snapshot};
pub use recharge::Recharge;
pub use sim::FleetSim;
pub use station_trip::StationTrip;
pub use summary::RunSummary;
pub use trip::{Trip, load_trips_csv, load_trips_reader};
pub use world::World;
