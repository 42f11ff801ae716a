use crate::error::EvaluatorError;
use crate::inventory::{ActivityKey, Uncertainty};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::{LogNormal, Normal, Triangular, Uniform};

/// A validated distribution ready to draw exchange amounts from.
#[derive(Debug, Clone)]
pub(crate) enum Sampler {
    Normal(Normal),
    /// The distribution of `|amount|`; the sign is reapplied after sampling.
    LogNormal { distribution: LogNormal, sign: f64 },
    Uniform(Uniform),
    Triangular(Triangular),
}

impl Sampler {
    pub(crate) fn new(
        amount: f64,
        uncertainty: &Uncertainty,
        input: &ActivityKey,
        output: &ActivityKey,
    ) -> Result<Self, EvaluatorError> {
        let invalid = |message: String| EvaluatorError::InvalidDistribution {
            input: input.clone(),
            output: output.clone(),
            message,
        };

        match *uncertainty {
            Uncertainty::Normal { std_dev } => Normal::new(amount, std_dev)
                .map(Sampler::Normal)
                .map_err(|e| invalid(e.to_string())),
            Uncertainty::Lognormal { sigma } => {
                if amount == 0.0 {
                    return Err(invalid("lognormal amount must be non-zero".to_string()));
                }
                LogNormal::new(amount.abs().ln(), sigma)
                    .map(|distribution| Sampler::LogNormal {
                        distribution,
                        sign: amount.signum(),
                    })
                    .map_err(|e| invalid(e.to_string()))
            }
            Uncertainty::Uniform { min, max } => Uniform::new(min, max)
                .map(Sampler::Uniform)
                .map_err(|e| invalid(e.to_string())),
            Uncertainty::Triangular { min, max } => Triangular::new(min, max, amount)
                .map(Sampler::Triangular)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    pub(crate) fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::LogNormal { distribution, sign } => sign * distribution.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Triangular(d) => d.sample(rng),
        }
    }
}
