use super::{IdleAdvance, Scheduler};
use crate::types::{Duration, Process, Schedule, Time};
use crate::utils::prelude::*;

/// Non-preemptive shortest job first.
///
/// Only processes that have arrived are eligible. Among them the shortest
/// burst runs next, ties go to the lower id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sjf {
    idle_advance: IdleAdvance,
}

impl Sjf {
    pub fn new(idle_advance: IdleAdvance) -> Self {
        Self { idle_advance }
    }
}

/// Processes not yet dispatched
struct Pending {
    processes: Vec<Process>,
    executed: Vec<bool>,
    left: usize,
}

impl Pending {
    fn new(processes: &[Process]) -> Self {
        Self {
            processes: processes.to_vec(),
            executed: vec![false; processes.len()],
            left: processes.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.left == 0
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &Process)> + '_ {
        self.processes
            .iter()
            .enumerate()
            .filter(move |(idx, _)| !self.executed[*idx])
    }

    /// index of the shortest process that has arrived by `now`
    fn shortest_arrived(&self, now: Time) -> Option<usize> {
        self.iter()
            .filter(|(_, p)| p.arrival <= now)
            .min_by_key(|(_, p)| (p.burst, p.id))
            .map(|(idx, _)| idx)
    }

    fn earliest_arrival(&self) -> Option<Time> {
        self.iter().map(|(_, p)| p.arrival).min()
    }

    fn take(&mut self, idx: usize) -> Process {
        debug_assert!(!self.executed[idx]);
        self.executed[idx] = true;
        self.left -= 1;
        self.processes[idx]
    }
}

impl Scheduler for Sjf {
    #[instrument(
        level = "info",
        name = "schedule",
        skip_all,
        fields(discipline = "sjf", idle_advance = %self.idle_advance, processes.len = processes.len())
    )]
    fn schedule(&self, processes: &[Process]) -> Schedule {
        let mut pending = Pending::new(processes);
        let mut schedule = Schedule::with_capacity(processes.len());
        let mut now = Time::default();

        while !pending.is_empty() {
            match pending.shortest_arrived(now) {
                Some(idx) => {
                    let dispatch = pending.take(idx).dispatch(now);
                    now = dispatch.completion;
                    debug!(%dispatch, "dispatched");
                    schedule.push(dispatch);
                }
                None => {
                    let next = match self.idle_advance {
                        IdleAdvance::Tick => now + Duration(1),
                        // pending is non-empty, so there is an earliest arrival, and it is after now
                        IdleAdvance::Jump => pending.earliest_arrival().unwrap_or(now + Duration(1)),
                    };
                    trace!(%now, %next, "cpu idle");
                    now = next;
                }
            }
        }
        schedule
    }
}
