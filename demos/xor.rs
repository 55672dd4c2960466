//! Learns XOR with a 2 → 5 → 5 → 1 sigmoid network.
//!
//! Run with:
//!   cargo run --example xor --release
//!
//! Weights are saved to `target/xor.network` and reused on the next run.

use std::path::Path;

use sigmoid_mlp::{run_lap, LearnConfig, Network, Sample};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let file = Path::new("target").join("xor.network");
    let mut network = if file.exists() {
        info!(path = %file.display(), "loading network");
        Network::from_file(&file)?
    } else {
        let mut network = Network::new(&[2, 5, 5, 1])?;
        network.randomize_with(&mut rand::thread_rng());
        network
    };

    let samples: Vec<Sample> = [(0u8, 0u8), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(x, y)| Sample::new(vec![x as f64, y as f64], vec![(x ^ y) as f64]))
        .collect();
    let config = LearnConfig::new(0.75, 100, 0.001);

    for lap in 0..10_000 {
        let learning = run_lap(&mut network, &samples, &config)?;

        println!("#{}: learning: {}", lap, learning);
        for sample in &samples {
            println!("{:?} --> {:.4?}", sample.input, network.decide(&sample.input)?);
        }

        if learning == 0 {
            break;
        }
    }

    std::fs::create_dir_all("target")?;
    network.write(&file)?;
    info!(path = %file.display(), "network saved");
    Ok(())
}
