use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use schedsim::utils;
use schedsim::utils::prelude::*;
use schedsim::utils::app_config;
use schedsim::utils::logging::GlobalLoggingContext;

/// Generate a random process list for schedsim
#[derive(Debug, StructOpt)]
#[structopt(name = "schedgen")]
struct Opts {
    /// Set a custom config file
    #[structopt(short, long, value_name = "FILE", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Number of processes, overrides `workload.count`
    #[structopt(short = "n", long)]
    count: Option<usize>,

    /// Seed string, overrides `workload.seed`
    #[structopt(long)]
    seed: Option<String>,
}

fn execute(logging: &mut GlobalLoggingContext) -> Result<()> {
    let opts = Opts::from_args();

    app_config::setup(opts.config.as_deref())?;
    logging.reconfigure(true)?;

    let text = schedsim::run_gen(opts.count, opts.seed)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn main() {
    utils::panic::setup();

    let mut logging = match utils::logging::setup() {
        Ok(logging) => logging,
        Err(err) => fail(err),
    };
    if let Err(err) = execute(&mut logging) {
        error!(%err, "aborted");
        // exit skips destructors, flush the log writers first
        drop(logging);
        fail(err);
    }
}

fn fail(err: Error) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1)
}
