use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use sigmoid_mlp::{Network, NetworkSpec};

/// Inspect, evaluate and create sigmoid-mlp weight files.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the shape and Frobenius norm of every weight matrix.
    Inspect {
        file: PathBuf,
    },

    /// Run one input through a saved network.
    Decide {
        file: PathBuf,

        /// Input values, one per input neuron.
        #[arg(required = true, allow_negative_numbers = true)]
        input: Vec<f64>,
    },

    /// Build a randomized network from a JSON spec and write it.
    Init {
        spec: PathBuf,
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Inspect { file } => {
            let network = Network::from_file(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            println!("dimensions: {:?}", network.dimensions());
            for (i, matrix) in network.weights().iter().enumerate() {
                println!(
                    "  W[{}]: {:>5} x {:<5} norm = {:.6}",
                    i,
                    matrix.rows(),
                    matrix.cols(),
                    matrix.frobenius_norm()
                );
            }
        }

        Command::Decide { file, input } => {
            let network = Network::from_file(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            let output = network.decide(&input)?;
            println!("{:?} --> {:?}", input, output);
        }

        Command::Init { spec, file } => {
            let spec = NetworkSpec::load_json(&spec)
                .with_context(|| format!("failed to read spec {}", spec.display()))?;
            let mut network = spec.build()?;
            network.randomize_with(&mut rand::thread_rng());
            network.write(&file)?;
            info!(name = %spec.name, dimensions = ?spec.dimensions, path = %file.display(), "network written");
        }
    }

    Ok(())
}
