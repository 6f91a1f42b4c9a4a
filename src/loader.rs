use std::fs;
use std::path::Path;

use crate::types::Process;
use crate::utils::prelude::*;

/// Read and parse the process list at `path`
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<Process>> {
    let src = fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
        path: path.to_owned(),
        source,
    })?;
    let processes = parse(&src)?;
    info!(processes.len = processes.len(), "loaded");
    Ok(processes)
}

/// Parse `N` followed by `N` pairs of `arrival burst`, all whitespace separated.
///
/// Ids are assigned by position, starting from 1. Anything after the last
/// declared pair is ignored.
pub fn parse(src: &str) -> Result<Vec<Process>> {
    let mut tokens = src.split_ascii_whitespace();

    let count = match tokens.next() {
        Some(tok) => tok
            .parse::<usize>()
            .map_err(|_| Error::malformed(format!("process count `{}` is not a non-negative integer", tok)))?,
        None => return Err(Error::malformed("missing process count")),
    };
    if count == 0 {
        return Err(Error::EmptyInput);
    }

    // don't trust `count` for the allocation, the records may not be there
    let mut processes = Vec::new();
    for id in 1..=count {
        let arrival = field(tokens.next(), id, count, "arrival")?;
        let burst = field(tokens.next(), id, count, "burst")?;
        if burst == 0 {
            return Err(Error::malformed(format!("process {} has a zero burst", id)));
        }
        let process = Process::new(id, arrival, burst);
        trace!(%process, "parsed");
        processes.push(process);
    }

    check_horizon(&processes)?;

    let rest = tokens.count();
    if rest > 0 {
        warn!(tokens = rest, "ignoring trailing input after {} processes", count);
    }

    Ok(processes)
}

/// Nothing can complete later than the last arrival plus all bursts back to back,
/// so if that fits, every simulated time does.
fn check_horizon(processes: &[Process]) -> Result<()> {
    let last_arrival = processes.iter().map(|p| p.arrival.0).max().unwrap_or(0);
    processes
        .iter()
        .try_fold(last_arrival, |t, p| t.checked_add(p.burst.0))
        .map(|_| ())
        .ok_or_else(|| Error::malformed("arrival and burst times add up beyond the representable time range"))
}

fn field(tok: Option<&str>, id: usize, count: usize, name: &str) -> Result<u64> {
    let tok = tok.ok_or_else(|| {
        Error::malformed(format!(
            "expected {} processes, input ends at process {} (missing {})",
            count, id, name
        ))
    })?;
    tok.parse().map_err(|_| {
        Error::malformed(format!(
            "{} of process {} is `{}`, not a non-negative integer",
            name, id, tok
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedulers::{Fcfs, Scheduler, Sjf};
    use crate::types::Time;

    fn assert_malformed(src: &str) {
        match parse(src) {
            Err(Error::MalformedInput(_)) => {}
            other => panic!("expected MalformedInput for {:?}, got {:?}", src, other),
        }
    }

    #[test]
    fn parses_pairs_in_order() {
        let procs = parse("3\n0 5\n1 3\n2 1\n").unwrap();
        assert_eq!(
            procs,
            vec![Process::new(1, 0, 5), Process::new(2, 1, 3), Process::new(3, 2, 1)]
        );
    }

    #[test]
    fn any_whitespace_separates() {
        let procs = parse("  2 0\t4   3\r\n 2").unwrap();
        assert_eq!(procs, vec![Process::new(1, 0, 4), Process::new(2, 3, 2)]);
    }

    #[test]
    fn ignores_trailing_tokens() {
        let procs = parse("1\n0 5\n7 7\n").unwrap();
        assert_eq!(procs, vec![Process::new(1, 0, 5)]);
    }

    #[test]
    fn fewer_pairs_than_declared() {
        assert_malformed("3\n0 5\n1 3\n");
        // half a pair
        assert_malformed("2\n0 5\n1\n");
    }

    #[test]
    fn bad_count() {
        assert_malformed("");
        assert_malformed("   \n");
        assert_malformed("three\n0 5\n");
        assert_malformed("-1\n");
    }

    #[test]
    fn bad_fields() {
        assert_malformed("1\n-1 5\n");
        assert_malformed("1\n0 x\n");
        assert_malformed("1\n0 2.5\n");
        assert_malformed("1\n0 0\n");
    }

    #[test]
    fn time_overflow() {
        assert_malformed("1\n18446744073709551615 1\n");
        assert_malformed("2\n0 18446744073709551615\n0 1\n");
        assert_malformed("3\n5 9223372036854775807\n0 9223372036854775807\n0 1\n");
    }

    #[test]
    fn largest_horizon_schedules() {
        let procs = parse("2\n18446744073709551613 1\n0 1\n").unwrap();
        for schedule in vec![Fcfs.schedule(&procs), Sjf::default().schedule(&procs)] {
            assert_eq!(schedule.dispatches.last().unwrap().completion, Time(u64::MAX - 1));
        }
    }

    #[test]
    fn zero_processes() {
        assert!(matches!(parse("0\n"), Err(Error::EmptyInput)));
    }

    #[test]
    fn missing_file() {
        let err = load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::InputUnavailable { .. }));
    }
}
