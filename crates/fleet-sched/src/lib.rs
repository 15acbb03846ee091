//! `fleet-sched`: discrete-event scheduler for the bike-fleet simulator.
//!
//! # Crate layout
//!
//! | Module          | Contents                                             |
//! |-----------------|------------------------------------------------------|
//! | [`wake_queue`]  | `WakeQueue` (BTreeMap keyed by time, FIFO per time)  |
//! | [`process`]     | `Process` trait, `Step`, `Context`                   |
//! | [`scheduler`]   | `Scheduler` (owns processes, drives the clock)       |
//! | [`error`]       | `SchedError`, `SchedResult`                          |
//!
//! # Execution model
//!
//! ```text
//! loop {
//!     (t, pid) = queue.pop()            // earliest time, FIFO within t
//!     if t >= until { stop }
//!     clock = t
//!     step = procs[pid].resume(world)   // runs to its next suspension
//!     Wait(d) => queue.push(t + d, pid)
//!     Done    => drop procs[pid]
//!     queue processes spawned during the resumption at t
//! }
//! ```
//!
//! Concurrency is interleaving, never parallelism: any read-modify-write a
//! process performs between two suspensions is atomic with respect to every
//! other process.

pub mod error;
pub mod process;
pub mod scheduler;
pub mod wake_queue;


pub use error::{SchedError, SchedResult};
pub use process::{Context, Process, Step};
pub use scheduler::Scheduler;
pub use wake_queue::WakeQueue;
