use rand::rngs::StdRng;
use rand::SeedableRng;
use sigmoid_mlp::{train_until_converged, LearnConfig, Network, Sample};

fn xor_samples() -> Vec<Sample> {
    [(0u8, 0u8), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(x, y)| Sample::new(vec![x as f64, y as f64], vec![(x ^ y) as f64]))
        .collect()
}

// Converges in a few seconds with --release, around half a minute in debug builds.
#[test]
fn xor_converges() {
    let samples = xor_samples();
    let config = LearnConfig::new(0.75, 100, 0.001);

    let mut network = Network::new(&[2, 5, 5, 1]).unwrap();
    network.randomize_with(&mut StdRng::seed_from_u64(2024));

    let (laps, converged) = train_until_converged(&mut network, &samples, &config, 10_000).unwrap();
    assert!(converged, "no convergence after {} laps", laps);

    for sample in &samples {
        let output = network.decide(&sample.input).unwrap();
        assert!(
            (output[0] - sample.target[0]).abs() < 0.1,
            "{:?} --> {:?}",
            sample.input,
            output
        );
    }
}
