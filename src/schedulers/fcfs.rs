use std::cmp::max;

use super::Scheduler;
use crate::types::{Process, Schedule, Time};
use crate::utils::prelude::*;

/// First come, first served. Ties in arrival go to the lower id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl Scheduler for Fcfs {
    #[instrument(level = "info", name = "schedule", skip_all, fields(discipline = "fcfs", processes.len = processes.len()))]
    fn schedule(&self, processes: &[Process]) -> Schedule {
        let mut queue = processes.to_vec();
        queue.sort_by_key(|p| (p.arrival, p.id));

        let mut clock = Time::default();
        let mut schedule = Schedule::with_capacity(queue.len());
        for process in queue {
            // the CPU idles until the next arrival
            let dispatch = process.dispatch(max(clock, process.arrival));
            clock = dispatch.completion;
            debug!(%dispatch, "dispatched");
            schedule.push(dispatch);
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::super::checks::*;
    use super::*;

    #[test]
    fn arrival_order() {
        let procs = procs(&[(0, 5), (1, 3), (2, 1)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(order(&schedule), vec![1, 2, 3]);
        assert_eq!(starts(&schedule), vec![0, 5, 8]);
        let completions: Vec<_> = schedule.iter().map(|d| d.completion.0).collect();
        assert_eq!(completions, vec![5, 8, 9]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let procs = procs(&[(4, 1), (0, 2), (2, 2), (0, 1)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(order(&schedule), vec![2, 4, 3, 1]);
    }

    #[test]
    fn ties_go_to_lower_id() {
        let procs = procs(&[(3, 9), (1, 2), (1, 1), (3, 1)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(order(&schedule), vec![2, 3, 1, 4]);
    }

    #[test]
    fn continuous_when_all_arrive_at_zero() {
        let procs = procs(&[(0, 3), (0, 1), (0, 4)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(starts(&schedule), vec![0, 3, 4]);
        assert_eq!(schedule.dispatches.last().unwrap().completion, Time(8));
    }

    #[test]
    fn idles_until_late_arrival() {
        let procs = procs(&[(0, 2), (5, 1)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(starts(&schedule), vec![0, 5]);
    }

    #[test]
    fn lone_late_process() {
        let procs = procs(&[(7, 3)]);
        let schedule = Fcfs.schedule(&procs);

        assert_valid(&procs, &schedule);
        assert_eq!(starts(&schedule), vec![7]);
    }
}
