//! Streaming reader for the MNIST IDX image/label file pair.

pub mod header;
pub mod reader;
pub mod sample;

pub use header::{ImageHeader, LabelHeader};
pub use reader::MnistSamples;
pub use sample::MnistSample;
