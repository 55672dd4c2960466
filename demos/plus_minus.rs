//! Tells a 3×3 "+" glyph from a "-" glyph with a 9 → 18 → 15 → 1 network.
//!
//! Run with:
//!   cargo run --example plus_minus

use sigmoid_mlp::{run_lap, LearnConfig, Network, Sample};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    #[rustfmt::skip]
    let plus = vec![
        0.0, 1.0, 0.0,
        1.0, 1.0, 1.0,
        0.0, 1.0, 0.0,
    ];
    #[rustfmt::skip]
    let minus = vec![
        0.0, 0.0, 0.0,
        1.0, 1.0, 1.0,
        0.0, 0.0, 0.0,
    ];

    let samples = vec![
        Sample::new(plus.clone(), vec![1.0]),
        Sample::new(minus.clone(), vec![0.0]),
    ];
    let config = LearnConfig::new(1.0, 100, 0.001);

    let mut network = Network::new(&[9, 18, 15, 1])?;
    network.randomize_with(&mut rand::thread_rng());

    for lap in 0..10_000 {
        let learning = run_lap(&mut network, &samples, &config)?;
        info!(
            lap,
            learning,
            plus = network.decide(&plus)?[0],
            minus = network.decide(&minus)?[0],
            "lap finished"
        );
        if learning == 0 {
            break;
        }
    }
    Ok(())
}
