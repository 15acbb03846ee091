//! `Scheduler`: single-threaded discrete-event executor.

use fleet_core::{ProcessId, SimClock, SimTime};

use crate::{Context, Process, SchedError, SchedResult, Step, WakeQueue};

/// Owns every process of a run and resumes them in `(time, seq)` order.
///
/// Exactly one process runs at a time.  A resumed process runs until it
/// returns a [`Step`]; there is no pre-emption and no cancellation.
#[derive(Debug)]
pub struct Scheduler<P> {
    clock: SimClock,
    queue: WakeQueue,
    /// Indexed by `ProcessId`.  `None` once a process has finished; slots
    /// are never reused so a `ProcessId` names one process for the whole run.
    procs: Vec<Option<P>>,
    /// Count of `Some` slots in `procs`.
    live: usize,
    /// Reused buffer for processes spawned during a resumption.
    spawn_buf: Vec<P>,
}

impl<P> Default for Scheduler<P> {
    fn default() -> Self {
        Self {
            clock:     SimClock::new(),
            queue:     WakeQueue::new(),
            procs:     Vec::new(),
            live:      0,
            spawn_buf: Vec::new(),
        }
    }
}

impl<P> Scheduler<P> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Register `process` to be resumed first at `at`.
    pub fn spawn_at(&mut self, at: SimTime, process: P) -> SchedResult<ProcessId> {
        let now = self.clock.now();
        if at < now {
            return Err(SchedError::ScheduleInPast { at, now });
        }
        let pid = ProcessId(self.procs.len() as u32);
        self.procs.push(Some(process));
        self.live += 1;
        self.queue.push(at, pid);
        Ok(pid)
    }

    /// Register `process` to be resumed at the current instant.
    pub fn spawn(&mut self, process: P) -> ProcessId {
        let pid = ProcessId(self.procs.len() as u32);
        self.procs.push(Some(process));
        self.live += 1;
        self.queue.push(self.clock.now(), pid);
        pid
    }

    /// Processes that have not finished, including ones never resumed.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of queued wake-ups.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Every process ever spawned, finished ones as `None`.
    pub fn processes(&self) -> impl Iterator<Item = (ProcessId, Option<&P>)> {
        self.procs.iter().enumerate().map(|(i, p)| (ProcessId(i as u32), p.as_ref()))
    }

    /// Resume processes in order until the queue empties or the next
    /// wake-up is at or after `until`.
    ///
    /// Wake-ups at or past `until` stay queued and are simply never resumed
    /// by this call.  With a finite `until` the clock ends exactly at
    /// `until`.  Returns the number of resumptions.
    pub fn run_until<W>(&mut self, until: SimTime, world: &mut W) -> SchedResult<usize>
    where
        P: Process<W>,
    {
        let mut resumed = 0usize;

        while let Some(next) = self.queue.next_time() {
            if next >= until {
                break;
            }
            let Some((at, pid)) = self.queue.pop() else { break };
            self.clock.advance_to(at);

            let Some(mut process) = self.procs.get_mut(pid.index()).and_then(Option::take) else {
                log::warn!("[{at}] wake-up for finished {pid} ignored");
                continue;
            };

            let mut spawned = std::mem::take(&mut self.spawn_buf);
            let step = {
                let mut cx = Context::new(at, pid, &mut spawned);
                process.resume(world, &mut cx)
            };
            resumed += 1;

            match step {
                Step::Wait(delay) if delay.is_zero() => {
                    self.procs[pid.index()] = Some(process);
                    self.spawn_buf = spawned;
                    return Err(SchedError::NonPositiveDelay { pid, at });
                }
                Step::Wait(delay) => {
                    self.procs[pid.index()] = Some(process);
                    self.queue.push(at + delay, pid);
                }
                Step::Done => self.live -= 1,
            }

            for child in spawned.drain(..) {
                self.spawn(child);
            }
            self.spawn_buf = spawned;
        }

        if until != SimTime::MAX && self.clock.now() < until {
            self.clock.advance_to(until);
        }
        Ok(resumed)
    }

    /// Run until no wake-up remains.
    pub fn run<W>(&mut self, world: &mut W) -> SchedResult<usize>
    where
        P: Process<W>,
    {
        self.run_until(SimTime::MAX, world)
    }
}
