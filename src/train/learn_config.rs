use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters for one [`Network::learn`](crate::Network::learn) call.
///
/// # Fields
/// - `learning_rate`  — step size applied to every weight delta; must be positive
/// - `max_iterations` — cap on forward/backward passes per sample
/// - `epsilon`        — per-output tolerance that counts as converged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnConfig {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub epsilon: f64,
}

impl LearnConfig {
    pub fn new(learning_rate: f64, max_iterations: usize, epsilon: f64) -> Self {
        LearnConfig {
            learning_rate,
            max_iterations,
            epsilon,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::invalid_argument(format!(
                "learning rate must be positive, was {}",
                self.learning_rate
            )));
        }
        if !(self.epsilon >= 0.0) {
            return Err(Error::invalid_argument(format!(
                "epsilon must be non-negative, was {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl Default for LearnConfig {
    /// The XOR setting: rate 0.75, 100 passes, tolerance 0.001.
    fn default() -> Self {
        LearnConfig::new(0.75, 100, 0.001)
    }
}
