//! End-of-run counters.

use std::fmt;

use fleet_core::SimTime;

/// Aggregate outcome of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub trips_total:         usize,
    pub trips_completed:     usize,
    pub trips_aborted:       usize,
    /// Trips neither completed nor aborted when the run stopped (not yet
    /// departed, or still underway at the horizon).
    pub trips_pending:       usize,
    pub recharges_started:   usize,
    pub recharges_completed: usize,
    /// Episodes given up after too many empty charging-station searches.
    pub recharges_abandoned: usize,
    /// Autonomous drives that ran the battery down to 0.
    pub stranded_drives:     usize,
    pub final_time:          SimTime,
}

impl RunSummary {
    /// Trips that have not reached a terminal state.
    pub fn trips_in_flight(&self) -> usize {
        self.trips_total - self.trips_completed - self.trips_aborted
    }

    /// Recharge episodes still running.
    pub fn recharges_in_flight(&self) -> usize {
        self.recharges_started - self.recharges_completed - self.recharges_abandoned
    }

    /// Share of trips that completed, in `[0, 1]`.
    pub fn success_rate(&self) -> f64 {
        if self.trips_total == 0 {
            return 0.0;
        }
        self.trips_completed as f64 / self.trips_total as f64
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trips:     {} total, {} completed, {} aborted, {} pending ({:.1}% success)",
            self.trips_total,
            self.trips_completed,
            self.trips_aborted,
            self.trips_pending,
            self.success_rate() * 100.0,
        )?;
        writeln!(f, "recharges: {} started, {} completed, {} abandoned",
            self.recharges_started, self.recharges_completed, self.recharges_abandoned,
        )?;
        writeln!(f, "stranded:  {} drives", self.stranded_drives)?;
        write!(f, "ended at:  {}s", self.final_time)
    }
}
