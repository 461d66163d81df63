use crate::errors::{BootstatError, BootstatResult};
use crate::stats::{mean, population_std};
use rand::seq::SliceRandom;
use rand::Rng;

/// The empirical sampling distribution of the mean of one dataset,
/// obtained via repeated random resampling.
#[derive(Debug, Default, Clone)]
pub struct BootstrapDistribution {
    /// One mean per resampling trial; `None` until computed.
    means: Option<Vec<f64>>,
    /// Population standard deviation of `means`; 0 until computed.
    std: f64,
}

impl BootstrapDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing means vector, e.g. one derived externally.
    /// The standard deviation is not computed here; call [`Self::compute_std`].
    pub fn from_means(means: Vec<f64>) -> Self {
        Self {
            means: Some(means),
            std: 0.0,
        }
    }

    pub fn means(&self) -> Option<&[f64]> {
        self.means.as_deref()
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    /// Resamples `data` for `iterations` trials of `samples` draws each and records
    /// the mean of every trial, in trial order. Deterministic for a seeded `rng`.
    ///
    /// Without replacement, a trial draws `samples` distinct positions of `data`,
    /// so `samples` must not exceed `data.len()`.
    pub fn compute_means<R: Rng>(
        &mut self,
        rng: &mut R,
        data: &[f64],
        iterations: usize,
        samples: usize,
        with_replacement: bool,
    ) -> BootstatResult<()> {
        if data.is_empty() {
            return Err(BootstatError::InvalidArgument {
                issue: "data must not be empty".to_string(),
            });
        }
        if iterations == 0 {
            return Err(BootstatError::InvalidArgument {
                issue: "iterations must be positive".to_string(),
            });
        }
        if samples == 0 {
            return Err(BootstatError::InvalidArgument {
                issue: "samples must be positive".to_string(),
            });
        }
        if !with_replacement && samples > data.len() {
            return Err(BootstatError::InvalidArgument {
                issue: format!(
                    "cannot draw {} samples from {} values without replacement",
                    samples,
                    data.len()
                ),
            });
        }

        let mut means = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let trial_sum = if with_replacement {
                let mut sum = 0.0;
                for _ in 0..samples {
                    sum += data[rng.gen_range(0..data.len())];
                }
                sum
            } else {
                data.choose_multiple(rng, samples).copied().sum::<f64>()
            };
            means.push(trial_sum / samples as f64);
        }
        self.means = Some(means);
        Ok(())
    }

    /// Recomputes `std` from the current `means` (population denominator `n`).
    pub fn compute_std(&mut self) -> BootstatResult<()> {
        let means = self
            .means
            .as_ref()
            .ok_or(BootstatError::PreconditionNotMet {
                operation: "compute_std",
                requires: "means to be computed first",
            })?;
        self.std = population_std(means, mean(means));
        Ok(())
    }

    /// Returns a fresh distribution with the element-wise difference of means,
    /// `result.means[i] = self.means[i] - other.means[i]`. Neither operand is
    /// mutated, and `std` of the result is left uncomputed.
    pub fn difference(&self, other: &Self) -> BootstatResult<Self> {
        let lhs = self
            .means
            .as_ref()
            .ok_or(BootstatError::PreconditionNotMet {
                operation: "difference",
                requires: "means of both distributions to be computed first",
            })?;
        let rhs = other
            .means
            .as_ref()
            .ok_or(BootstatError::PreconditionNotMet {
                operation: "difference",
                requires: "means of both distributions to be computed first",
            })?;
        if lhs.len() != rhs.len() {
            return Err(BootstatError::ShapeMismatch {
                left: lhs.len(),
                right: rhs.len(),
            });
        }

        let means = lhs.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect();
        Ok(Self::from_means(means))
    }
}
