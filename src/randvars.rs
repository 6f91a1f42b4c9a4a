use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::{Exp, LogNormal, Normal, Uniform};

use crate::utils::prelude::*;

/// A random variable as written in the config, e.g. `{ type = "Exp", lambda = 0.5 }`
#[derive(Debug, Copy, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type")]
pub enum RandomVariable {
    Constant { value: f64 },
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// `mean` and `std_dev` of the underlying normal
    LogNormal { mean: f64, std_dev: f64 },
    Exp { lambda: f64 },
}

/// A validated, ready to sample `RandomVariable`
#[derive(Debug, Clone)]
pub enum Sampler {
    Constant(f64),
    Uniform(Uniform),
    Normal(Normal),
    LogNormal(LogNormal),
    Exp(Exp),
}

impl RandomVariable {
    pub fn sampler(&self) -> Result<Sampler> {
        Ok(match *self {
            RandomVariable::Constant { value } => Sampler::Constant(value),
            RandomVariable::Uniform { low, high } => Sampler::Uniform(Uniform::new(low.min(high), high.max(low))?),
            RandomVariable::Normal { mean, std_dev } => Sampler::Normal(Normal::new(mean, std_dev)?),
            RandomVariable::LogNormal { mean, std_dev } => Sampler::LogNormal(LogNormal::new(mean, std_dev)?),
            RandomVariable::Exp { lambda } => Sampler::Exp(Exp::new(lambda)?),
        })
    }
}

impl Distribution<f64> for Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Constant(v) => *v,
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Normal(d) => d.sample(rng),
            Sampler::LogNormal(d) => d.sample(rng),
            Sampler::Exp(d) => d.sample(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_seeder::{Seeder, SipRng};

    use super::*;

    #[test]
    fn constant() {
        let mut rng: SipRng = Seeder::from("constant").make_rng();
        let s = RandomVariable::Constant { value: 3.5 }.sampler().unwrap();
        assert!((0..10).all(|_| s.sample(&mut rng) == 3.5));
    }

    #[test]
    fn uniform_within_bounds_even_if_swapped() {
        let mut rng: SipRng = Seeder::from("uniform").make_rng();
        let s = RandomVariable::Uniform { low: 9.0, high: 2.0 }.sampler().unwrap();
        for _ in 0..100 {
            let v = s.sample(&mut rng);
            assert!((2.0..=9.0).contains(&v), "{} out of range", v);
        }
    }

    #[test]
    fn invalid_parameters() {
        let bad = [
            RandomVariable::Normal { mean: 1.0, std_dev: -1.0 },
            RandomVariable::Exp { lambda: 0.0 },
            RandomVariable::LogNormal { mean: 0.0, std_dev: 0.0 },
        ];
        for rv in bad.iter() {
            assert!(matches!(rv.sampler(), Err(Error::InvalidDistribution(_))), "{:?}", rv);
        }
    }
}
