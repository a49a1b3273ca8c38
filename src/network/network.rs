use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    activation::sigmoid::sigmoid_derivative,
    error::{ensure_width, NnError, Result},
    layers::dense::Layer,
    loss::mse::MseLoss,
    math::init::INIT_SCALE,
    optim::sgd::Sgd,
    train::{loop_fn::train_loop, train_config::TrainConfig},
};

/// Which weights carry the error from layer `i` back to layer `i - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPropagation {
    /// Layer `i` is updated in place first and the error travels through the
    /// freshly updated weights.
    #[default]
    UpdatedWeights,
    /// The error travels through the weights that produced the gradient
    /// (textbook backpropagation).
    PreUpdateWeights,
}

/// A stack of fully connected sigmoid layers trained online with MSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct Network {
    architecture: Vec<usize>,
    layers: Vec<Layer>,
    #[serde(default)]
    error_propagation: ErrorPropagation,
    /// Input plus every layer's output from the most recent `forward` call.
    #[serde(skip)]
    activations: Vec<Vec<f64>>,
}

/// Unchecked on-disk shape of a `Network`.
#[derive(Deserialize)]
struct RawNetwork {
    architecture: Vec<usize>,
    layers: Vec<Layer>,
    #[serde(default)]
    error_propagation: ErrorPropagation,
}

impl TryFrom<RawNetwork> for Network {
    type Error = NnError;

    fn try_from(raw: RawNetwork) -> Result<Network> {
        let network =
            Network::from_layers(raw.layers)?.with_error_propagation(raw.error_propagation);
        if network.architecture != raw.architecture {
            return Err(NnError::InvalidArchitecture(format!(
                "stored architecture {:?} does not match its layers {:?}",
                raw.architecture, network.architecture
            )));
        }
        Ok(network)
    }
}

impl Network {
    /// Builds a network for `architecture` (input width, hidden widths...,
    /// output width) drawing initial weights from `rng`.
    pub fn new<R: Rng + ?Sized>(architecture: &[usize], rng: &mut R) -> Result<Network> {
        validate_architecture(architecture)?;
        let layers = architecture
            .windows(2)
            .map(|pair| Layer::new(pair[1], pair[0], &mut *rng))
            .collect();
        debug!("built network {architecture:?} with init scale {INIT_SCALE}");
        Ok(Network {
            architecture: architecture.to_vec(),
            layers,
            error_propagation: ErrorPropagation::default(),
            activations: Vec::new(),
        })
    }

    /// Same as `new` with a reproducible `StdRng` seeded from `seed`.
    pub fn seeded(architecture: &[usize], seed: u64) -> Result<Network> {
        Network::new(architecture, &mut StdRng::seed_from_u64(seed))
    }

    /// Assembles a network from already built layers; widths must chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        let first = layers.first().ok_or_else(|| {
            NnError::InvalidArchitecture("a network needs at least one layer".into())
        })?;
        let mut architecture = vec![first.input_size()];
        for (i, layer) in layers.iter().enumerate() {
            if layer.input_size() != architecture[i] {
                return Err(NnError::InvalidArchitecture(format!(
                    "layer {i} expects {} inputs but the previous layer produces {}",
                    layer.input_size(),
                    architecture[i]
                )));
            }
            architecture.push(layer.size());
        }
        validate_architecture(&architecture)?;
        Ok(Network {
            architecture,
            layers,
            error_propagation: ErrorPropagation::default(),
            activations: Vec::new(),
        })
    }

    pub fn with_error_propagation(mut self, mode: ErrorPropagation) -> Network {
        self.error_propagation = mode;
        self
    }

    pub fn error_propagation(&self) -> ErrorPropagation {
        self.error_propagation
    }

    pub fn architecture(&self) -> &[usize] {
        &self.architecture
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.architecture[0]
    }

    pub fn output_size(&self) -> usize {
        self.architecture[self.architecture.len() - 1]
    }

    /// Cache left by the last `forward` call; empty before the first one.
    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    /// Forward pass; overwrites the activation cache with this sample's
    /// intermediate vectors.
    pub fn forward(&mut self, sample: &[f64]) -> Result<Vec<f64>> {
        ensure_width("sample", sample.len(), self.input_size())?;
        self.activations.clear();
        self.activations.push(sample.to_vec());
        let mut current = sample.to_vec();
        for layer in &self.layers {
            current = layer.feed_from(&current)?;
            self.activations.push(current.clone());
        }
        Ok(current)
    }

    /// Mean squared error between a prediction and its target.
    pub fn loss(predicted: &[f64], target: &[f64]) -> Result<f64> {
        MseLoss::loss(predicted, target)
    }

    /// One online update towards `target` for `sample`.
    pub fn backpropagate(
        &mut self,
        sample: &[f64],
        target: &[f64],
        learning_rate: f64,
    ) -> Result<()> {
        let optimizer = Sgd::new(learning_rate)?;
        self.backpropagate_with(sample, target, &optimizer)
    }

    /// Backpropagation with an already validated optimizer.
    ///
    /// Re-runs `forward` first so the cache always belongs to `sample`.
    pub fn backpropagate_with(
        &mut self,
        sample: &[f64],
        target: &[f64],
        optimizer: &Sgd,
    ) -> Result<()> {
        ensure_width("target", target.len(), self.output_size())?;
        let predicted = self.forward(sample)?;
        let mut error = MseLoss::error(&predicted, target)?;

        for i in (0..self.layers.len()).rev() {
            let gradients: Vec<f64> = self.activations[i + 1]
                .iter()
                .zip(&error)
                .map(|(out, e)| e * sigmoid_derivative(*out))
                .collect();

            let snapshot = match self.error_propagation {
                ErrorPropagation::PreUpdateWeights if i > 0 => {
                    Some(self.layers[i].propagate(&gradients))
                }
                _ => None,
            };

            let inputs = &self.activations[i];
            let layer = &mut self.layers[i];
            for (j, g) in gradients.iter().enumerate() {
                optimizer.step(layer, j, *g, inputs)?;
            }

            if i > 0 {
                error = match snapshot {
                    Some(prev) => prev,
                    None => self.layers[i].propagate(&gradients),
                };
            }
        }
        Ok(())
    }

    /// Trains for exactly `epochs` passes over the samples in order and
    /// returns the average loss of the last epoch.
    pub fn train(
        &mut self,
        samples: &[Vec<f64>],
        targets: &[Vec<f64>],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<f64> {
        train_loop(self, samples, targets, &TrainConfig::new(epochs, learning_rate))
    }

    /// Evaluates one sample without touching the weights.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// Evaluates each sample independently.
    pub fn predict_batch(&mut self, inputs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        inputs.iter().map(|input| self.forward(input)).collect()
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn validate_architecture(architecture: &[usize]) -> Result<()> {
    if architecture.len() < 2 {
        return Err(NnError::InvalidArchitecture(format!(
            "need at least an input and an output width, got {architecture:?}"
        )));
    }
    if let Some(pos) = architecture.iter().position(|&w| w == 0) {
        return Err(NnError::InvalidArchitecture(format!(
            "width at position {pos} of {architecture:?} must be positive"
        )));
    }
    Ok(())
}
