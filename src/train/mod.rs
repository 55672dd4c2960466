pub mod lap;
pub mod learn_config;
pub mod sample;

pub use lap::{run_lap, train_until_converged};
pub use learn_config::LearnConfig;
pub use sample::Sample;
