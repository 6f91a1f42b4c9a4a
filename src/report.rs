//! Aggregate statistics over a finished schedule and the text report.

use std::fmt;

use itertools::Itertools;

use crate::types::Schedule;
use crate::utils::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Stats {
    /// mean of `start - arrival`
    pub avg_waiting: f64,
    /// mean of `completion - arrival`
    pub avg_turnaround: f64,
}

impl Stats {
    pub fn calculate(schedule: &Schedule) -> Result<Self> {
        if schedule.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = schedule.len() as f64;
        // sum as f64, a handful of long turnarounds can exceed u64 together
        let (waiting, turnaround) = schedule.iter().fold((0.0, 0.0), |(w, t), d| {
            (w + d.waiting().0 as f64, t + d.turnaround().0 as f64)
        });

        Ok(Self {
            avg_waiting: waiting / n,
            avg_turnaround: turnaround / n,
        })
    }
}

/// The execution order followed by the averages
#[derive(Debug, Clone)]
pub struct Report {
    pub schedule: Schedule,
    pub stats: Stats,
}

impl Report {
    #[instrument(level = "info", name = "report", skip_all)]
    pub fn new(schedule: Schedule) -> Result<Self> {
        let stats = Stats::calculate(&schedule)?;
        info!(avg_waiting = stats.avg_waiting, avg_turnaround = stats.avg_turnaround, "done");
        Ok(Self { schedule, stats })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.schedule.order().map(|id| format!("P{}", id)).join(" -> "))?;
        writeln!(f, "Avg Waiting Time: {:.2}", self.stats.avg_waiting)?;
        writeln!(f, "Avg TAT: {:.2}", self.stats.avg_turnaround)
    }
}
