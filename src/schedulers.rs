use std::str::FromStr;

use parse_display::Display;

use crate::types::{Process, Schedule};
use crate::utils::prelude::*;

mod fcfs;
mod sjf;

pub use fcfs::Fcfs;
pub use sjf::Sjf;

/// A non-preemptive uniprocessor scheduling discipline
pub trait Scheduler {
    /// Assign every process exactly one slot on the CPU, returned in execution order
    fn schedule(&self, processes: &[Process]) -> Schedule;
}

impl Scheduler for Box<dyn Scheduler> {
    #[inline]
    fn schedule(&self, processes: &[Process]) -> Schedule {
        (**self).schedule(processes)
    }
}

/// Scheduling discipline selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum Mode {
    Fcfs,
    Sjf,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Mode::Fcfs),
            "sjf" => Ok(Mode::Sjf),
            _ => Err(Error::UnknownMode(s.to_owned())),
        }
    }
}

/// How SJF moves the clock when no pending process has arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Deserialize, serde::Serialize)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IdleAdvance {
    /// one time unit at a time
    Tick,
    /// straight to the earliest pending arrival
    Jump,
}

impl Default for IdleAdvance {
    fn default() -> Self {
        IdleAdvance::Jump
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SjfConfig {
    #[serde(default)]
    pub idle_advance: IdleAdvance,
}

pub fn from_mode(mode: Mode, sjf: &SjfConfig) -> Box<dyn Scheduler> {
    info!(%mode, "using");
    match mode {
        Mode::Fcfs => Box::new(Fcfs),
        Mode::Sjf => Box::new(Sjf::new(sjf.idle_advance)),
    }
}

/// Checks shared by both disciplines
#[cfg(test)]
pub(crate) mod checks {
    use crate::types::{Process, Schedule};

    pub fn procs(pairs: &[(u64, u64)]) -> Vec<Process> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(arrival, burst))| Process::new(i + 1, arrival, burst))
            .collect()
    }

    pub fn order(schedule: &Schedule) -> Vec<usize> {
        schedule.order().collect()
    }

    pub fn starts(schedule: &Schedule) -> Vec<u64> {
        schedule.iter().map(|d| d.start.0).collect()
    }

    /// every process exactly once, never before arrival, never overlapping
    pub fn assert_valid(processes: &[Process], schedule: &Schedule) {
        assert_eq!(schedule.len(), processes.len());

        let mut ids = order(schedule);
        ids.sort_unstable();
        assert_eq!(ids, (1..=processes.len()).collect::<Vec<_>>());

        for d in schedule {
            assert_eq!(d.process, processes[d.id() - 1]);
            assert!(d.start >= d.process.arrival, "{} starts before arrival", d);
            assert_eq!(d.completion, d.start + d.process.burst);
        }
        for pair in schedule.dispatches.windows(2) {
            assert!(pair[0].completion <= pair[1].start, "{} overlaps {}", pair[0], pair[1]);
            assert!(pair[0].completion < pair[1].completion);
        }
    }
}
