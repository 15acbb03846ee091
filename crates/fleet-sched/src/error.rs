use thiserror::Error;

use fleet_core::{ProcessId, SimTime};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedError {
    /// A process asked to wait for zero time.  Time must move forward
    /// between two resumptions of the same process.
    #[error("{pid} requested a non-positive delay at {at}")]
    NonPositiveDelay { pid: ProcessId, at: SimTime },

    #[error("cannot schedule at {at}: clock is already at {now}")]
    ScheduleInPast { at: SimTime, now: SimTime },
}

pub type SchedResult<T> = Result<T, SchedError>;
