use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use parse_display::Display;
use serde::{Deserialize, Serialize};

/// A time point in simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize)]
#[display("{0}")]
pub struct Time(pub u64);

/// A duration of time in simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize)]
#[display("{0}")]
pub struct Duration(pub u64);

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Time {
    type Output = Duration;

    /// Panics in debug builds if `rhs` is later than `self`
    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

/// 1-based position of a process in the input
pub type ProcessId = usize;

/// A process as described by the input, before scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Process {
    pub id: ProcessId,
    pub arrival: Time,
    pub burst: Duration,
}

impl Process {
    pub fn new(id: ProcessId, arrival: u64, burst: u64) -> Self {
        Self {
            id,
            arrival: Time(arrival),
            burst: Duration(burst),
        }
    }

    /// Run this process starting at `start`
    pub fn dispatch(self, start: Time) -> Dispatch {
        debug_assert!(start >= self.arrival, "{} dispatched before arrival at {}", self, start);
        Dispatch {
            process: self,
            start,
            completion: start + self.burst,
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}(@{}, {})", self.id, self.arrival, self.burst)
    }
}

/// A process that has been given its slot on the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub process: Process,
    pub start: Time,
    pub completion: Time,
}

impl Dispatch {
    pub fn id(&self) -> ProcessId {
        self.process.id
    }

    /// time spent eligible but not yet running
    pub fn waiting(&self) -> Duration {
        self.start - self.process.arrival
    }

    /// time from arrival to completion
    pub fn turnaround(&self) -> Duration {
        self.completion - self.process.arrival
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}[{}..{})", self.process.id, self.start, self.completion)
    }
}

/// Dispatches in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub dispatches: Vec<Dispatch>,
}

impl Schedule {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            dispatches: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, dispatch: Dispatch) {
        debug_assert!(
            self.dispatches
                .last()
                .map_or(true, |prev| prev.completion <= dispatch.start),
            "{} overlaps the previous dispatch",
            dispatch
        );
        self.dispatches.push(dispatch);
    }

    /// Process ids in execution order
    pub fn order(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.dispatches.iter().map(Dispatch::id)
    }

    pub fn len(&self) -> usize {
        self.dispatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dispatch> {
        self.dispatches.iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Dispatch;
    type IntoIter = std::slice::Iter<'a, Dispatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.dispatches.iter()
    }
}
