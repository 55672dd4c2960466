#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use sigmoid_mlp::Network;

/// Network with deterministic random weights.
pub fn seeded_network(dims: &[usize], seed: u64) -> Network {
    let mut network = Network::new(dims).unwrap();
    network.randomize_with(&mut StdRng::seed_from_u64(seed));
    network
}

/// Big-endian i32 fields, as the weight file stores them.
pub fn int_fields(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}
