use std::process;

use schedsim::utils;
use schedsim::utils::prelude::*;

mod cli;

fn main() {
    // panic setup should be done early
    utils::panic::setup();

    // the logging context owns the writer guards, keep it until exit
    let mut logging = match utils::logging::setup() {
        Ok(logging) => logging,
        Err(err) => fail(err),
    };
    if let Err(err) = cli::execute(&mut logging) {
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
