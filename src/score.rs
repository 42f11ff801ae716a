use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;

/// The weight of one flow: a deterministic value or one draw per Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Scalar(f64),
    Samples(Vec<f64>),
}

impl Score {
    /// Arithmetic mean. A scalar is its own mean; an empty sample set is NaN.
    pub fn mean(&self) -> f64 {
        match self {
            Score::Scalar(v) => *v,
            Score::Samples(samples) => samples.iter().mean(),
        }
    }

    /// Population standard deviation. Scalars have none.
    pub fn std_dev(&self) -> f64 {
        match self {
            Score::Scalar(_) => 0.0,
            Score::Samples(samples) if samples.len() < 2 => 0.0,
            Score::Samples(samples) => samples.iter().population_std_dev(),
        }
    }

    pub fn samples(&self) -> Option<&[f64]> {
        match self {
            Score::Scalar(_) => None,
            Score::Samples(samples) => Some(samples),
        }
    }

    pub fn is_samples(&self) -> bool {
        matches!(self, Score::Samples(_))
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::Scalar(value)
    }
}

impl From<Vec<f64>> for Score {
    fn from(value: Vec<f64>) -> Self {
        Score::Samples(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Scalar(v) => write!(f, "{}", v),
            Score::Samples(samples) => write!(
                f,
                "{} (mean of {} samples, sd {})",
                self.mean(),
                samples.len(),
                self.std_dev()
            ),
        }
    }
}

/// Quantile with linear interpolation between closest ranks.
///
/// `q` is clamped to `[0, 1]`. Returns NaN for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&sorted, q)
}

/// Same as [`quantile`] for data that is already sorted ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}
