//! MNIST digit classification with a 784 → 450 → 250 → 10 sigmoid network.
//!
//! Run with:
//!   cargo run --example mnist --release -- --data-dir path/to/mnist
//!
//! The data directory must hold the four extracted IDX files
//! (`train-images-idx3-ubyte`, `train-labels-idx1-ubyte`,
//! `t10k-images-idx3-ubyte`, `t10k-labels-idx1-ubyte`).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use sigmoid_mlp::mnist::{MnistSample, MnistSamples};
use sigmoid_mlp::{LearnConfig, Network};
use tracing::{debug, info};

const CLASSES: usize = 10;

#[derive(Parser)]
struct Args {
    /// Directory with the extracted MNIST IDX files.
    #[arg(long, default_value = "mnist_data")]
    data_dir: PathBuf,

    /// Where weights are loaded from (if present) and saved to.
    #[arg(long, default_value = "target/mnist.network")]
    network: PathBuf,

    #[arg(long, default_value_t = 60_000)]
    train_limit: usize,

    #[arg(long, default_value_t = 10_000)]
    test_limit: usize,

    #[arg(long, default_value_t = 25)]
    laps: usize,

    #[arg(long, default_value_t = 0.025)]
    learning_rate: f64,

    #[arg(long, default_value_t = 25)]
    max_iterations: usize,

    #[arg(long, default_value_t = 0.01)]
    epsilon: f64,

    /// Print every misclassified test image.
    #[arg(long)]
    show_errors: bool,
}

fn load(dir: &Path, prefix: &str, limit: usize) -> anyhow::Result<Vec<MnistSample>> {
    let images = dir.join(format!("{}-images-idx3-ubyte", prefix));
    let labels = dir.join(format!("{}-labels-idx1-ubyte", prefix));
    info!(images = %images.display(), "reading samples");
    let samples = MnistSamples::open(&images, &labels)
        .with_context(|| format!("cannot open {} set in {}", prefix, dir.display()))?
        .take(limit)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}

/// Index of the largest output.
fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Number of misclassified samples.
fn count_errors(network: &Network, samples: &[MnistSample], show: bool) -> anyhow::Result<usize> {
    let mut errors = 0;
    for sample in samples {
        let output = network.decide(&sample.input())?;
        if argmax(&output) != sample.label as usize {
            errors += 1;
            if show {
                println!("{}: {:.3?}\n{}", sample.label, output, sample);
            }
        }
    }
    Ok(errors)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let train = load(&args.data_dir, "train", args.train_limit)?;
    let test = load(&args.data_dir, "t10k", args.test_limit)?;
    info!(train = train.len(), test = test.len(), "samples loaded");

    let mut network = if args.network.exists() {
        info!(path = %args.network.display(), "loaded from file");
        Network::from_file(&args.network)?
    } else {
        info!("random initialization");
        let mut network = Network::new(&[28 * 28, 450, 250, CLASSES])?;
        network.randomize_with(&mut rand::thread_rng());
        network
    };

    let config = LearnConfig::new(args.learning_rate, args.max_iterations, args.epsilon);
    config.validate()?;

    for lap in 1..=args.laps {
        let mut learning = 0;
        for (i, sample) in train.iter().enumerate() {
            let target = sample
                .target(CLASSES)
                .with_context(|| format!("label {} out of range", sample.label))?;
            learning += network.learn(
                &sample.input(),
                &target,
                config.learning_rate,
                config.max_iterations,
                config.epsilon,
            )?;
            if (i + 1) % 10_000 == 0 {
                debug!(lap, samples = i + 1, learning, "progress");
            }
        }

        let train_errors = count_errors(&network, &train, false)?;
        let test_errors = count_errors(&network, &test, args.show_errors && lap == args.laps)?;
        info!("lap #{:03}  {:5}  {:5}  {}", lap, train_errors, test_errors, learning);

        if learning == 0 {
            break;
        }
    }

    if let Some(parent) = args.network.parent() {
        std::fs::create_dir_all(parent)?;
    }
    network.write(&args.network)?;
    info!(path = %args.network.display(), "network saved");
    Ok(())
}
