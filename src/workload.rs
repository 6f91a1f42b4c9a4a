use std::fmt::Write;

use rand::distributions::Distribution;
use rand_seeder::{Seeder, SipRng};

use crate::randvars::RandomVariable;
use crate::types::Process;
use crate::utils::prelude::*;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WorkloadConfig {
    pub count: usize,
    pub seed: String,
    /// gap between consecutive arrivals, the first process arrives at 0
    pub inter_arrival: RandomVariable,
    pub burst: RandomVariable,
}

/// Draw a random process list. The same config always gives the same list.
#[instrument(level = "info", skip_all, fields(count = cfg.count, seed = %cfg.seed))]
pub fn generate(cfg: &WorkloadConfig) -> Result<Vec<Process>> {
    if cfg.count == 0 {
        return Err(Error::EmptyInput);
    }
    let mut rng: SipRng = Seeder::from(cfg.seed.as_str()).make_rng();
    let gaps = cfg.inter_arrival.sampler()?;
    let bursts = cfg.burst.sampler()?;

    let mut clock = 0.0f64;
    let processes = (1..=cfg.count)
        .map(|id| {
            if id > 1 {
                clock += gaps.sample(&mut rng).max(0.0);
            }
            let burst = bursts.sample(&mut rng).round().max(1.0);
            Process::new(id, clock.round() as u64, burst as u64)
        })
        .collect();
    Ok(processes)
}

/// Format processes the way `loader::parse` reads them
pub fn render(processes: &[Process]) -> String {
    let mut out = String::new();
    // writing to a String never fails
    let _ = writeln!(out, "{}", processes.len());
    for p in processes {
        let _ = writeln!(out, "{} {}", p.arrival, p.burst);
    }
    out
}
