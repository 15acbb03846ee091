//! The cooperative process abstraction.
//!
//! A process is an explicit state machine.  Each call to
//! [`Process::resume`] runs it from its current state until it reaches the
//! next suspension point, then returns how long to sleep ([`Step::Wait`]) or
//! that it has finished ([`Step::Done`]).  Everything a process needs across
//! a suspension (phase, visited set, assigned resource id) lives in `self`.

use fleet_core::{ProcessId, SimDuration, SimTime};

/// What a process asks for when it yields control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Resume after this much simulated time.  Must be positive.
    Wait(SimDuration),
    /// The process has terminated and is never resumed again.
    Done,
}

/// A resumable unit of simulated behaviour operating on a shared world `W`.
pub trait Process<W>: Sized {
    fn resume(&mut self, world: &mut W, cx: &mut Context<'_, Self>) -> Step;
}

/// Per-resumption view of the scheduler handed to a running process.
pub struct Context<'a, P> {
    now:     SimTime,
    pid:     ProcessId,
    spawned: &'a mut Vec<P>,
}

impl<'a, P> Context<'a, P> {
    pub(crate) fn new(now: SimTime, pid: ProcessId, spawned: &'a mut Vec<P>) -> Self {
        Self { now, pid, spawned }
    }

    /// The current simulated instant.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Id of the running process.
    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Start a new process at the current instant.  It runs after every
    /// wake-up already queued for this instant.
    pub fn spawn(&mut self, process: P) {
        self.spawned.push(process);
    }
}
