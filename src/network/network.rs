use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use rand::Rng;

use crate::activation::sigmoid::sigmoid_in_place;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::codec;
use crate::train::{LearnConfig, Sample};

/// Fully connected sigmoid network without bias terms.
///
/// `weights[i]` maps layer `i` (length `rows`) to layer `i + 1` (length `cols`).
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    weights: Vec<Matrix>,
}

impl Network {
    /// Allocates one zeroed matrix per layer transition, `dims[i] x dims[i + 1]`.
    pub fn new(dims: &[usize]) -> Result<Network> {
        if dims.len() < 2 {
            return Err(Error::invalid_argument(format!(
                "expected at least 2 dimensions, was {}",
                dims.len()
            )));
        }
        if let Some(pos) = dims.iter().position(|&d| d == 0) {
            return Err(Error::invalid_argument(format!(
                "dimension {} must be positive",
                pos
            )));
        }
        let weights = dims
            .windows(2)
            .map(|pair| Matrix::zeros(pair[0], pair[1]))
            .collect();
        Ok(Network { weights })
    }

    /// Wraps an existing matrix list after checking that the shapes chain.
    pub fn from_weights(weights: Vec<Matrix>) -> Result<Network> {
        check_chain(&weights).map_err(Error::InvalidArgument)?;
        Ok(Network { weights })
    }

    /// Loads a network written by [`Network::write`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = File::open(path)?;
        Network::read_from(file)
    }

    /// Decodes a network from any byte stream in the weight-file layout.
    pub fn read_from<R: Read>(reader: R) -> Result<Network> {
        let weights = codec::decode(reader)?;
        check_chain(&weights).map_err(Error::InvalidFormat)?;
        Ok(Network { weights })
    }

    /// Writes the weight file, truncating anything already at `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        codec::encode(&mut writer, &self.weights)?;
        writer.flush()?;
        Ok(())
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    /// Number of layer transitions.
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Layer widths, input first.
    pub fn dimensions(&self) -> Vec<usize> {
        let mut dims = Vec::with_capacity(self.weights.len() + 1);
        dims.push(self.input_size());
        dims.extend(self.weights.iter().map(Matrix::cols));
        dims
    }

    pub fn input_size(&self) -> usize {
        self.weights[0].rows()
    }

    pub fn output_size(&self) -> usize {
        self.weights[self.weights.len() - 1].cols()
    }

    /// Fills every matrix from `source` and rescales it to unit Frobenius norm.
    ///
    /// An all-zero draw divides by zero and leaves NaN entries behind; no
    /// guard is applied.
    pub fn randomize<F>(&mut self, mut source: F)
    where
        F: FnMut() -> f64,
    {
        for matrix in &mut self.weights {
            matrix.fill_with(&mut source);
            let factor = 1.0 / matrix.frobenius_norm();
            matrix.scale(factor);
        }
    }

    /// [`Network::randomize`] with uniform `[0, 1)` draws from `rng`.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        self.randomize(|| rng.gen::<f64>());
    }

    /// Forward inference. Does not touch the weights.
    pub fn decide(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let mut current = input.to_vec();
        for matrix in &self.weights {
            current = matrix.pre_multiply(&current);
            sigmoid_in_place(&mut current);
        }
        Ok(current)
    }

    /// Trains on one input/target pair until every output error is below
    /// `epsilon` or `max_iterations` passes have been made.
    ///
    /// Returns the number of passes that updated the weights: `0` when the
    /// target was already met, `max_iterations` when it never was.
    pub fn learn(
        &mut self,
        input: &[f64],
        target: &[f64],
        learning_rate: f64,
        max_iterations: usize,
        epsilon: f64,
    ) -> Result<usize> {
        self.check_input(input)?;
        if target.len() != self.output_size() {
            return Err(Error::invalid_argument(format!(
                "target length {} does not match output size {}",
                target.len(),
                self.output_size()
            )));
        }

        let layers = self.weights.len();
        for lap in 0..max_iterations {
            let outputs = self.forward_all(input);

            let error: Vec<f64> = target
                .iter()
                .zip(&outputs[layers])
                .map(|(t, o)| t - o)
                .collect();
            if error.iter().all(|e| e.abs() < epsilon) {
                return Ok(lap);
            }

            // errors[i] is the error at the output of weights[i].
            let mut errors = vec![Vec::new(); layers];
            errors[layers - 1] = error;
            for i in (1..layers).rev() {
                errors[i - 1] = self.weights[i].multiply(&errors[i]);
            }

            for i in (0..layers).rev() {
                let out = &outputs[i + 1];
                let gradient: Vec<f64> = errors[i]
                    .iter()
                    .zip(out)
                    .map(|(e, o)| e * o * (o - 1.0))
                    .collect();
                self.weights[i].sub_scaled_outer(&outputs[i], &gradient, learning_rate);
            }
        }
        Ok(max_iterations)
    }

    /// [`Network::learn`] on a [`Sample`] with parameters from `config`.
    pub fn learn_sample(&mut self, sample: &Sample, config: &LearnConfig) -> Result<usize> {
        self.learn(
            &sample.input,
            &sample.target,
            config.learning_rate,
            config.max_iterations,
            config.epsilon,
        )
    }

    /// Activations of every layer, `outputs[0]` being the input itself.
    fn forward_all(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut outputs = Vec::with_capacity(self.weights.len() + 1);
        outputs.push(input.to_vec());
        for matrix in &self.weights {
            let mut next = matrix.pre_multiply(&outputs[outputs.len() - 1]);
            sigmoid_in_place(&mut next);
            outputs.push(next);
        }
        outputs
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(Error::invalid_argument(format!(
                "input length {} does not match input size {}",
                input.len(),
                self.input_size()
            )));
        }
        Ok(())
    }
}

fn check_chain(weights: &[Matrix]) -> std::result::Result<(), String> {
    if weights.is_empty() {
        return Err("network needs at least one weight matrix".to_owned());
    }
    for (i, pair) in weights.windows(2).enumerate() {
        if pair[0].cols() != pair[1].rows() {
            return Err(format!(
                "matrix {} has {} columns but matrix {} has {} rows",
                i,
                pair[0].cols(),
                i + 1,
                pair[1].rows()
            ));
        }
    }
    Ok(())
}
