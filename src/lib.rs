pub mod activation;
pub mod error;
pub mod math;
pub mod mnist;
pub mod network;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use train::{run_lap, train_until_converged, LearnConfig, Sample};
