use tracing::debug;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::learn_config::LearnConfig;
use crate::train::sample::Sample;

/// Runs [`Network::learn`] once per sample, in order, and returns the summed
/// number of passes.
///
/// A result of `0` means every sample already met `config.epsilon` and no
/// weight changed during the lap.
pub fn run_lap(network: &mut Network, samples: &[Sample], config: &LearnConfig) -> Result<usize> {
    config.validate()?;
    let mut iterations = 0;
    for sample in samples {
        iterations += network.learn_sample(sample, config)?;
    }
    debug!(samples = samples.len(), iterations, "lap finished");
    Ok(iterations)
}

/// Repeats [`run_lap`] until a lap needs no passes or `max_laps` is reached.
///
/// Returns the number of laps run, and whether the final lap converged.
pub fn train_until_converged(
    network: &mut Network,
    samples: &[Sample],
    config: &LearnConfig,
    max_laps: usize,
) -> Result<(usize, bool)> {
    for lap in 0..max_laps {
        if run_lap(network, samples, config)? == 0 {
            return Ok((lap + 1, true));
        }
    }
    Ok((max_laps, false))
}
