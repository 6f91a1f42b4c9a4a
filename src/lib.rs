use std::path::{Path, PathBuf};

use crate::report::Report;
use crate::schedulers::{Mode, Scheduler, SjfConfig};
use crate::utils::prelude::*;
use crate::workload::WorkloadConfig;

pub mod loader;
pub mod output;
pub mod randvars;
pub mod report;
pub mod schedulers;
pub mod types;
pub mod utils;
pub mod workload;

/// Extra files to write next to the stdout report
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub csv: Option<PathBuf>,
    pub trace: Option<PathBuf>,
}

/// Load `input`, schedule it with `mode` and write any requested outputs
pub fn run_sim(input: &Path, mode: Mode, outputs: &Outputs) -> Result<Report> {
    let _g = info_span!("sim", %mode).entered();

    let sjf: SjfConfig = config().get("sjf")?;
    let processes = loader::load(input)?;
    let schedule = schedulers::from_mode(mode, &sjf).schedule(&processes);
    let report = Report::new(schedule)?;

    {
        let _g = info_span!("output").entered();
        if let Some(path) = &outputs.csv {
            output::render_csv(&report.schedule, path)?;
        }
        if let Some(path) = &outputs.trace {
            output::render_chrome_trace(&report.schedule, path)?;
        }
    }

    Ok(report)
}

/// Generate a random input file from the `workload` config section
pub fn run_gen(count: Option<usize>, seed: Option<String>) -> Result<String> {
    let _g = info_span!("gen").entered();

    let mut cfg: WorkloadConfig = config().get("workload")?;
    if let Some(count) = count {
        cfg.count = count;
    }
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    let processes = workload::generate(&cfg)?;
    Ok(workload::render(&processes))
}
