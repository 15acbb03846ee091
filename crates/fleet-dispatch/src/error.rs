//! Selection outcome type.

use std::fmt;

use thiserror::Error;

/// What a selector was looking for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CandidateKind {
    StartStation,
    EndStation,
    DocklessBike,
    AutonomousBike,
    ChargingStation,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CandidateKind::StartStation    => "start station",
            CandidateKind::EndStation      => "end station",
            CandidateKind::DocklessBike    => "dockless bike",
            CandidateKind::AutonomousBike  => "autonomous bike",
            CandidateKind::ChargingStation => "charging station",
        })
    }
}

/// No candidate passed the eligibility filter.
///
/// A normal outcome, not a failure of the engine: the caller aborts the trip
/// or retries after a wait.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[error("no eligible {kind} found")]
pub struct NoCandidateFound {
    pub kind: CandidateKind,
}

impl NoCandidateFound {
    pub const fn new(kind: CandidateKind) -> Self {
        Self { kind }
    }
}
