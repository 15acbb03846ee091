//! `fleet-registry`: the single owner of every station, charging station,
//! and bike in a run.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`dock`]      | `Dock<I>`, `Station`, `ChargingStation`, `DockRef`        |
//! | [`bike`]      | `Bike`, `BikeKind`                                        |
//! | [`visited`]   | `VisitedSet<I>` (per-phase "already tried" record)        |
//! | [`registry`]  | `Registry` (atomic state transitions), `DriveReport`      |
//! | [`builder`]   | `RegistryBuilder` (rosters, fleet seeding)                |
//! | [`loader`]    | `DockRecord`, CSV roster loader                           |
//! | [`error`]     | `RegistryError`, `RegistryResult`                         |
//!
//! # Ownership model
//!
//! Processes never hold references into the registry across a suspension;
//! they keep ids and call a `Registry` method to change state.  Because the
//! scheduler runs one process at a time, every check-then-act sequence a
//! process performs between two suspensions is atomic.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | `VisitedSet` uses `FxHashSet` instead of `HashSet`.     |
//! | `serde`   | Forwards to `fleet-core/serde`.                         |

pub mod bike;
pub mod builder;
pub mod dock;
pub mod error;
pub mod loader;
pub mod registry;
pub mod visited;


pub use bike::{Bike, BikeKind};
pub use builder::RegistryBuilder;
pub use dock::{ChargingStation, Dock, DockRef, Station};
pub use error::{RegistryError, RegistryResult};
pub use loader::{DockRecord, load_docks_csv, load_docks_reader};
pub use registry::{DriveReport, Registry};
pub use visited::VisitedSet;
