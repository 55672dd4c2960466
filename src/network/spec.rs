use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::LearnConfig;

/// Serializable description of a network shape plus its training parameters.
///
/// Stored as JSON next to (not inside) the binary weight file, so a run can
/// be reproduced before any weights exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Layer widths, input first. At least two entries, each positive.
    pub dimensions: Vec<usize>,
    #[serde(default)]
    pub learn: LearnConfig,
}

impl NetworkSpec {
    pub fn new(name: impl Into<String>, dimensions: Vec<usize>) -> NetworkSpec {
        NetworkSpec {
            name: name.into(),
            dimensions,
            learn: LearnConfig::default(),
        }
    }

    /// Checks the dimensions and the learn parameters.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.len() < 2 {
            return Err(Error::invalid_argument(format!(
                "spec '{}' needs at least 2 dimensions, has {}",
                self.name,
                self.dimensions.len()
            )));
        }
        if self.dimensions.contains(&0) {
            return Err(Error::invalid_argument(format!(
                "spec '{}' has a zero-width layer",
                self.name
            )));
        }
        self.learn.validate()
    }

    /// Allocates a zeroed network with these dimensions.
    pub fn build(&self) -> Result<Network> {
        self.validate()?;
        Network::new(&self.dimensions)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learn_section_defaults_when_missing() {
        let spec: NetworkSpec =
            serde_json::from_str(r#"{ "name": "xor", "dimensions": [2, 5, 5, 1] }"#).unwrap();
        assert_eq!(spec.learn, LearnConfig::default());
        assert_eq!(spec.build().unwrap().dimensions(), vec![2, 5, 5, 1]);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plus.json");
        let mut spec = NetworkSpec::new("plus", vec![9, 18, 15, 1]);
        spec.learn.learning_rate = 1.0;
        spec.save_json(&path).unwrap();
        assert_eq!(NetworkSpec::load_json(&path).unwrap(), spec);
    }

    #[test]
    fn rejects_single_layer() {
        let spec = NetworkSpec::new("bad", vec![4]);
        assert!(matches!(spec.build(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"name\": ").unwrap();
        assert!(matches!(NetworkSpec::load_json(&path), Err(Error::Json(_))));
    }
}
