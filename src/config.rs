use crate::errors::{BootstatError, BootstatResult};
use crate::hypothesis::Alternative;
use serde::{Deserialize, Serialize};

const DEFAULT_ITERATIONS: usize = 1_000;
const DEFAULT_SAMPLES: usize = 100;

/// Configuration of a bootstrap hypothesis test. All fields are optional with
/// documented defaults, applied by the accessor methods.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct TestConfig {
    /// Number of resampling trials per dataset (default 1000).
    #[serde(alias = "numberIterations")]
    #[serde(alias = "nIterations")]
    iterations: Option<usize>,

    /// Number of draws per trial (default 100).
    #[serde(alias = "numberSamples")]
    #[serde(alias = "nSamples")]
    samples: Option<usize>,

    /// Whether a trial's draws may repeat values (default true).
    #[serde(alias = "withReplacement")]
    with_replacement: Option<bool>,

    /// Alternative hypothesis tag: one of ">=", "<=", "==" (default ">=").
    alternative: Option<Alternative>,
}

impl TestConfig {
    pub fn iterations(&self) -> usize {
        self.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    pub fn samples(&self) -> usize {
        self.samples.unwrap_or(DEFAULT_SAMPLES)
    }

    pub fn with_replacement(&self) -> bool {
        self.with_replacement.unwrap_or(true)
    }

    pub fn alternative(&self) -> Alternative {
        self.alternative.unwrap_or_default()
    }

    pub fn validate(&self) -> BootstatResult<()> {
        if self.iterations() == 0 {
            return Err(BootstatError::InvalidArgument {
                issue: "iterations must be positive".to_string(),
            });
        }
        if self.samples() == 0 {
            return Err(BootstatError::InvalidArgument {
                issue: "samples must be positive".to_string(),
            });
        }
        Ok(())
    }
}
