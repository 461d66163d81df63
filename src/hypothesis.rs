use crate::bootstrap::BootstrapDistribution;
use crate::config::TestConfig;
use crate::errors::{BootstatError, BootstatResult};
use crate::stats::mean;
use log::{info, warn};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::fmt;
use std::str::FromStr;

/// The shape of the alternative hypothesis supported by the test,
/// evaluated by checking how extreme the observed mean difference is
/// against the null distribution.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    /// The first population mean is at least as large as the second.
    #[default]
    #[serde(rename = ">=")]
    GreaterEqual,
    /// The first population mean is at most as large as the second.
    #[serde(rename = "<=")]
    LessEqual,
    /// The population means differ (two-sided).
    #[serde(rename = "==")]
    NotEqual,
}

impl FromStr for Alternative {
    type Err = BootstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(Alternative::GreaterEqual),
            "<=" => Ok(Alternative::LessEqual),
            "==" => Ok(Alternative::NotEqual),
            other => Err(BootstatError::InvalidAlternative(other.to_string())),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alternative::GreaterEqual => write!(f, ">="),
            Alternative::LessEqual => write!(f, "<="),
            Alternative::NotEqual => write!(f, "=="),
        }
    }
}

/// Two-sample hypothesis test on the difference of population means,
/// driven by independent bootstrap distributions of both datasets.
///
/// The observed difference `mu = mean(data_one) - mean(data_two)` is fixed at
/// construction. The remaining state is built up step by step:
/// [`Self::run_bootstrap`] -> [`Self::compute_difference`] ->
/// [`Self::synthesize_null`] -> [`Self::evaluate`], or in one go via
/// [`Self::evaluate_full`].
#[derive(Debug, Clone)]
pub struct HypothesisTest {
    data_one: Vec<f64>,
    data_two: Vec<f64>,
    bootstrap_one: BootstrapDistribution,
    bootstrap_two: BootstrapDistribution,
    bootstrap_diff: BootstrapDistribution,
    mu: f64,
    null: Option<Vec<f64>>,
    p_val: Option<f64>,
}

impl HypothesisTest {
    /// The datasets do not need to be of equal length, but neither may be empty.
    pub fn new(data_one: Vec<f64>, data_two: Vec<f64>) -> BootstatResult<Self> {
        if data_one.is_empty() || data_two.is_empty() {
            return Err(BootstatError::InvalidArgument {
                issue: "both datasets must be non-empty".to_string(),
            });
        }
        let mu = mean(&data_one) - mean(&data_two);
        Ok(Self {
            data_one,
            data_two,
            bootstrap_one: BootstrapDistribution::new(),
            bootstrap_two: BootstrapDistribution::new(),
            bootstrap_diff: BootstrapDistribution::new(),
            mu,
            null: None,
            p_val: None,
        })
    }

    /// The observed difference of the raw sample means.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn bootstrap_one(&self) -> &BootstrapDistribution {
        &self.bootstrap_one
    }

    pub fn bootstrap_two(&self) -> &BootstrapDistribution {
        &self.bootstrap_two
    }

    pub fn bootstrap_diff(&self) -> &BootstrapDistribution {
        &self.bootstrap_diff
    }

    pub fn null(&self) -> Option<&[f64]> {
        self.null.as_deref()
    }

    pub fn p_val(&self) -> Option<f64> {
        self.p_val
    }

    /// Bootstraps both datasets with the same configuration so the resulting
    /// distributions are comparable. Randomness is consumed sequentially from
    /// the one injected source, first for `data_one`, then for `data_two`.
    pub fn run_bootstrap<R: Rng>(
        &mut self,
        rng: &mut R,
        iterations: usize,
        samples: usize,
        with_replacement: bool,
    ) -> BootstatResult<()> {
        info!(
            "Bootstrapping both datasets: {} trials of {} draws each (replacement: {})",
            iterations, samples, with_replacement
        );
        self.bootstrap_one
            .compute_means(rng, &self.data_one, iterations, samples, with_replacement)?;
        self.bootstrap_one.compute_std()?;
        self.bootstrap_two
            .compute_means(rng, &self.data_two, iterations, samples, with_replacement)?;
        self.bootstrap_two.compute_std()?;
        Ok(())
    }

    /// Derives the bootstrap distribution of the mean difference and its spread.
    pub fn compute_difference(&mut self) -> BootstatResult<()> {
        let mut diff = self.bootstrap_one.difference(&self.bootstrap_two)?;
        diff.compute_std()?;
        self.bootstrap_diff = diff;
        Ok(())
    }

    /// Draws `iterations` values from a normal distribution centered at zero with
    /// the spread of the bootstrap difference: what the difference of means would
    /// look like if the true difference were zero.
    pub fn synthesize_null<R: Rng>(
        &mut self,
        rng: &mut R,
        iterations: usize,
    ) -> BootstatResult<()> {
        if iterations == 0 {
            return Err(BootstatError::InvalidArgument {
                issue: "iterations must be positive".to_string(),
            });
        }
        if self.bootstrap_diff.means().is_none() {
            return Err(BootstatError::PreconditionNotMet {
                operation: "synthesize_null",
                requires: "the bootstrap difference to be computed first",
            });
        }

        let spread = self.bootstrap_diff.std();
        let null = if spread > 0.0 {
            let normal =
                Normal::new(0.0, spread).map_err(|e| BootstatError::InvalidArgument {
                    issue: format!("invalid null distribution spread {}: {}", spread, e),
                })?;
            let mut draws = Vec::with_capacity(iterations);
            for _ in 0..iterations {
                draws.push(normal.sample(rng));
            }
            draws
        } else {
            warn!("Bootstrap difference has zero spread; null distribution degenerates to a point mass at zero");
            vec![0.0; iterations]
        };
        self.null = Some(null);
        Ok(())
    }

    /// The p-value: the fraction of the null distribution at least as extreme as
    /// the observed `mu`, in the direction implied by `alternative`.
    ///
    /// NOTE: the two-sided variant sums `fraction(null <= -mu)` and
    /// `fraction(null >= mu)` with `mu`'s own sign, not its absolute value. For
    /// negative `mu` both comparisons cover the bulk of the null instead of its
    /// tails, so the result is sign-sensitive (see the mirror test below).
    pub fn evaluate(&mut self, alternative: Alternative) -> BootstatResult<f64> {
        let mu = self.mu;
        let null = self.null.as_ref().ok_or(BootstatError::PreconditionNotMet {
            operation: "evaluate",
            requires: "the null distribution to be synthesized first",
        })?;

        let p_val = match alternative {
            Alternative::GreaterEqual => fraction(null, |v| v < mu),
            Alternative::LessEqual => fraction(null, |v| v > mu),
            Alternative::NotEqual => {
                fraction(null, |v| v <= -mu) + fraction(null, |v| v >= mu)
            }
        };

        self.p_val = Some(p_val);
        Ok(p_val)
    }

    /// Runs the whole inference in sequence and returns the p-value:
    /// bootstrap both datasets, derive their difference, synthesize the null,
    /// evaluate the alternative.
    pub fn evaluate_full<R: Rng>(
        &mut self,
        rng: &mut R,
        iterations: usize,
        samples: usize,
        with_replacement: bool,
        alternative: Alternative,
    ) -> BootstatResult<f64> {
        self.run_bootstrap(rng, iterations, samples, with_replacement)?;
        self.compute_difference()?;
        self.synthesize_null(rng, iterations)?;
        self.evaluate(alternative)
    }

    /// [`Self::evaluate_full`] driven by a [`TestConfig`], with defaults applied.
    pub fn evaluate_with<R: Rng>(
        &mut self,
        rng: &mut R,
        config: &TestConfig,
    ) -> BootstatResult<f64> {
        config.validate()?;
        self.evaluate_full(
            rng,
            config.iterations(),
            config.samples(),
            config.with_replacement(),
            config.alternative(),
        )
    }
}

/// The fraction of `values` satisfying `pred`.
fn fraction<F>(values: &[f64], pred: F) -> f64
where
    F: Fn(f64) -> bool,
{
    values.iter().filter(|&&v| pred(v)).count() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_datasets() -> (Vec<f64>, Vec<f64>) {
        // unequal lengths on purpose
        let data_one = vec![5.1, 4.9, 6.2, 5.6, 5.8, 5.0, 5.4, 6.0];
        let data_two = vec![4.8, 4.6, 5.1, 4.9, 5.3, 4.7, 5.0];
        (data_one, data_two)
    }

    #[test]
    fn mu_is_fixed_at_construction() {
        let test = HypothesisTest::new(vec![2.0, 2.0, 2.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(test.mu(), 1.0);
        assert!(test.null().is_none());
        assert!(test.p_val().is_none());
    }

    #[test]
    fn empty_datasets_are_rejected() {
        assert!(matches!(
            HypothesisTest::new(vec![], vec![1.0]),
            Err(BootstatError::InvalidArgument { .. })
        ));
        assert!(matches!(
            HypothesisTest::new(vec![1.0], vec![]),
            Err(BootstatError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn alternative_parses_source_tags() {
        assert_eq!(">=".parse::<Alternative>().unwrap(), Alternative::GreaterEqual);
        assert_eq!("<=".parse::<Alternative>().unwrap(), Alternative::LessEqual);
        assert_eq!("==".parse::<Alternative>().unwrap(), Alternative::NotEqual);
        assert!(matches!(
            "!=".parse::<Alternative>(),
            Err(BootstatError::InvalidAlternative(_))
        ));
    }

    #[test]
    fn evaluate_counts_the_right_tails() {
        // mu = 1.0; the null contains values exactly at +/- mu to pin down
        // which comparisons are strict and which are inclusive.
        let mut test = HypothesisTest::new(vec![2.0, 2.0], vec![1.0, 1.0]).unwrap();
        test.null = Some(vec![-2.0, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.0]);

        // 5 of 8 values strictly below 1.0
        assert_eq!(test.evaluate(Alternative::GreaterEqual).unwrap(), 0.625);
        // 2 of 8 values strictly above 1.0
        assert_eq!(test.evaluate(Alternative::LessEqual).unwrap(), 0.25);
        // 3 of 8 values <= -1.0, plus 3 of 8 values >= 1.0
        assert_eq!(test.evaluate(Alternative::NotEqual).unwrap(), 0.75);
        assert_eq!(test.p_val(), Some(0.75));
    }

    #[test]
    fn two_sided_formula_is_sign_sensitive() {
        // The preserved source formula uses mu with its own sign. Swapping the
        // datasets flips mu and turns the tail sum p into 2 - p whenever the
        // null has no values exactly at +/- mu.
        let null = vec![-2.0, -1.5, -0.5, 0.0, 0.5, 1.5, 2.0, 3.0];

        let mut test = HypothesisTest::new(vec![2.0, 2.0], vec![1.0, 1.0]).unwrap();
        test.null = Some(null.clone());
        let p = test.evaluate(Alternative::NotEqual).unwrap();
        assert_eq!(p, 0.625);

        let mut swapped = HypothesisTest::new(vec![1.0, 1.0], vec![2.0, 2.0]).unwrap();
        swapped.null = Some(null);
        let p_swapped = swapped.evaluate(Alternative::NotEqual).unwrap();
        assert_eq!(p_swapped, 2.0 - p);
    }

    #[test]
    fn one_sided_p_values_are_complementary() {
        let (data_one, data_two) = test_datasets();
        let mut test = HypothesisTest::new(data_one, data_two).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        test.run_bootstrap(&mut rng, 1000, 100, true).unwrap();
        test.compute_difference().unwrap();
        test.synthesize_null(&mut rng, 1000).unwrap();

        // evaluated against the same null; no draw ties with mu
        let p_ge = test.evaluate(Alternative::GreaterEqual).unwrap();
        let p_le = test.evaluate(Alternative::LessEqual).unwrap();
        assert!((p_ge + p_le - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p_ge));
        assert!((0.0..=1.0).contains(&p_le));
    }

    #[test]
    fn evaluate_full_is_deterministic_for_a_fixed_seed() {
        let (data_one, data_two) = test_datasets();

        let mut first = HypothesisTest::new(data_one.clone(), data_two.clone()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p_first = first
            .evaluate_full(&mut rng, 1000, 100, true, Alternative::NotEqual)
            .unwrap();

        let mut second = HypothesisTest::new(data_one, data_two).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p_second = second
            .evaluate_full(&mut rng, 1000, 100, true, Alternative::NotEqual)
            .unwrap();

        assert_eq!(p_first, p_second);
        assert_eq!(first.null().unwrap(), second.null().unwrap());
    }

    #[test]
    fn unequal_length_datasets_bootstrap_to_equal_length_distributions() {
        let (data_one, data_two) = test_datasets();
        assert_ne!(data_one.len(), data_two.len());

        let mut test = HypothesisTest::new(data_one, data_two).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p_val = test
            .evaluate_full(&mut rng, 500, 50, true, Alternative::GreaterEqual)
            .unwrap();

        assert_eq!(test.bootstrap_one().means().unwrap().len(), 500);
        assert_eq!(test.bootstrap_two().means().unwrap().len(), 500);
        assert_eq!(test.bootstrap_diff().means().unwrap().len(), 500);
        assert!((0.0..=1.0).contains(&p_val));
    }

    #[test]
    fn steps_enforce_their_preconditions() {
        let (data_one, data_two) = test_datasets();
        let mut test = HypothesisTest::new(data_one, data_two).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(matches!(
            test.compute_difference(),
            Err(BootstatError::PreconditionNotMet { .. })
        ));
        assert!(matches!(
            test.synthesize_null(&mut rng, 100),
            Err(BootstatError::PreconditionNotMet { .. })
        ));
        assert!(matches!(
            test.evaluate(Alternative::GreaterEqual),
            Err(BootstatError::PreconditionNotMet { .. })
        ));
    }

    #[test]
    fn degenerate_spread_yields_a_point_mass_null() {
        // constant data leaves every trial mean identical, hence zero spread
        let mut test = HypothesisTest::new(vec![3.0, 3.0, 3.0], vec![3.0, 3.0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        test.run_bootstrap(&mut rng, 100, 10, true).unwrap();
        test.compute_difference().unwrap();
        test.synthesize_null(&mut rng, 100).unwrap();

        assert!(test.null().unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn evaluate_with_applies_config_defaults() {
        let (data_one, data_two) = test_datasets();
        let mut test = HypothesisTest::new(data_one, data_two).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let config = TestConfig::default();
        let p_val = test.evaluate_with(&mut rng, &config).unwrap();

        // defaults: 1000 iterations, 100 samples, with replacement, '>='
        assert_eq!(test.bootstrap_one().means().unwrap().len(), 1000);
        assert!((0.0..=1.0).contains(&p_val));
        assert_eq!(test.p_val(), Some(p_val));
    }
}
