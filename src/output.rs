use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;

use crate::types::{Dispatch, Schedule};
use crate::utils::prelude::*;

/// Chrome trace events are on microseconds, one time unit is drawn as 1ms
const TRACE_SCALE: u64 = 1000;

#[derive(Debug, serde::Serialize)]
struct Row {
    id: usize,
    arrival: u64,
    burst: u64,
    start: u64,
    completion: u64,
    waiting: u64,
    turnaround: u64,
}

impl From<&Dispatch> for Row {
    fn from(d: &Dispatch) -> Self {
        Self {
            id: d.id(),
            arrival: d.process.arrival.0,
            burst: d.process.burst.0,
            start: d.start.0,
            completion: d.completion.0,
            waiting: d.waiting().0,
            turnaround: d.turnaround().0,
        }
    }
}

/// One row per process, in execution order
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn render_csv(schedule: &Schedule, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for dispatch in schedule {
        writer.serialize(Row::from(dispatch))?;
    }
    writer.flush()?;
    info!(rows = schedule.len(), "written");
    Ok(())
}

fn trace_events(schedule: &Schedule) -> Vec<serde_json::Value> {
    let mut events = vec![json!({
        "name": "thread_name",
        "ph": "M",
        "pid": 0,
        "tid": 0,
        "args": { "name": "CPU" },
    })];

    for d in schedule {
        // execution on the cpu track
        events.push(json!({
            "name": format!("P{}", d.id()),
            "ph": "X",
            "cat": "exec",
            "ts": d.start.0 * TRACE_SCALE,
            "dur": d.process.burst.0 * TRACE_SCALE,
            "pid": 0,
            "tid": 0,
            "args": {
                "id": d.id(),
                "arrival": d.process.arrival.0,
                "burst": d.process.burst.0,
            }
        }));
        // queuing time drawn on the process' own track
        if d.waiting().0 > 0 {
            events.push(json!({
                "name": format!("P{} waiting", d.id()),
                "ph": "X",
                "cat": "queuing",
                "ts": d.process.arrival.0 * TRACE_SCALE,
                "dur": d.waiting().0 * TRACE_SCALE,
                "pid": 1,
                "tid": d.id(),
                "args": {
                    "id": d.id(),
                    "waiting": d.waiting().0,
                }
            }));
        }
    }
    events
}

/// Chrome trace json, viewable in chrome://tracing or perfetto
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn render_chrome_trace(schedule: &Schedule, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let events = trace_events(schedule);
    serde_json::to_writer(&mut file, &json!({ "traceEvents": events }))?;
    file.write_all(b"\n")?;
    file.flush()?;
    info!(events = events.len(), "written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::schedulers::{Scheduler, Sjf};
    use crate::types::Process;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("schedsim-{}-{}", std::process::id(), name))
    }

    fn schedule() -> Schedule {
        let procs = vec![Process::new(1, 0, 5), Process::new(2, 1, 3), Process::new(3, 2, 1)];
        Sjf::default().schedule(&procs)
    }

    #[test]
    fn csv_rows() {
        let path = scratch("rows.csv");
        render_csv(&schedule(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(
            text,
            "id,arrival,burst,start,completion,waiting,turnaround\n\
             1,0,5,0,5,0,5\n\
             3,2,1,5,6,3,4\n\
             2,1,3,6,9,5,8\n"
        );
    }

    #[test]
    fn trace_has_exec_and_queuing_spans() {
        let events = trace_events(&schedule());

        let exec: Vec<_> = events.iter().filter(|e| e["cat"] == "exec").collect();
        assert_eq!(exec.len(), 3);
        assert_eq!(exec[1]["name"], "P3");
        assert_eq!(exec[1]["ts"], 5 * TRACE_SCALE);

        // P1 never waits
        let queuing: Vec<_> = events.iter().filter(|e| e["cat"] == "queuing").collect();
        assert_eq!(queuing.len(), 2);
        assert!(queuing.iter().all(|e| e["name"] != "P1 waiting"));
    }

    #[test]
    fn trace_file_is_json() {
        let path = scratch("trace.json");
        render_chrome_trace(&schedule(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["traceEvents"].as_array().unwrap().len(), 1 + 3 + 2);
    }
}
