//! Bootstrap resampling and two-sample hypothesis testing on the difference of means.
//!
//! The sampling distribution of the mean of a dataset is estimated by repeated
//! random resampling ([`BootstrapDistribution`]); two such distributions drive a
//! hypothesis test on the difference of the population means ([`HypothesisTest`]),
//! with one-sided and two-sided alternatives ([`Alternative`]).
//!
//! The random source is injected by the caller, so a seeded generator makes every
//! result reproducible bit-for-bit:
//!
//! ```
//! use bootstat::{Alternative, HypothesisTest};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let treatment = vec![5.1, 4.9, 6.2, 5.6, 5.8, 5.0, 5.4, 6.0];
//! let control = vec![4.8, 4.6, 5.1, 4.9, 5.3, 4.7, 5.0];
//!
//! let mut test = HypothesisTest::new(treatment, control)?;
//! let p_val = test.evaluate_full(&mut rng, 1000, 5, true, Alternative::NotEqual)?;
//! assert!((0.0..=1.0).contains(&p_val));
//! # Ok::<(), bootstat::BootstatError>(())
//! ```

mod bootstrap;
mod config;
mod errors;
mod hypothesis;
mod stats;

pub use bootstrap::BootstrapDistribution;
pub use config::TestConfig;
pub use errors::{BootstatError, BootstatResult};
pub use hypothesis::{Alternative, HypothesisTest};
