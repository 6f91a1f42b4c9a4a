use std::io::{self, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use schedsim::schedulers::Mode;
use schedsim::utils::prelude::*;
use schedsim::utils::app_config;
use schedsim::utils::logging::GlobalLoggingContext;
use schedsim::Outputs;

/// Simulate FCFS or non-preemptive SJF over a list of processes
#[derive(Debug, StructOpt)]
#[structopt(name = "schedsim")]
pub struct Opts {
    /// Set a custom config file
    #[structopt(short, long, value_name = "FILE", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Also write a per-process table as csv
    #[structopt(long, value_name = "FILE", parse(from_os_str))]
    csv: Option<PathBuf>,

    /// Also write a chrome trace of the schedule
    #[structopt(long, value_name = "FILE", parse(from_os_str))]
    trace: Option<PathBuf>,

    /// Process count followed by `arrival burst` pairs
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Scheduling discipline, `fcfs` or `sjf` in any case
    mode: Mode,
}

/// Parse arguments, set up config and logging, then run
pub fn execute(logging: &mut GlobalLoggingContext) -> Result<()> {
    // usage errors exit here with status 1
    let opts = Opts::from_args();

    app_config::setup(opts.config.as_deref())?;
    logging.reconfigure(true)?;

    trace!(?opts, "Start cli execution");

    let outputs = Outputs {
        csv: opts.csv,
        trace: opts.trace,
    };
    let report = schedsim::run_sim(&opts.input, opts.mode, &outputs)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", report)?;
    out.flush()?;
    Ok(())
}
