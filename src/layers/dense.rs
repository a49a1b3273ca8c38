use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_width, NnError, Result};
use crate::layers::unit::Unit;
use crate::math::init::{small_normal, INIT_SCALE};

/// A fully connected sigmoid layer.
///
/// Weights are stored row-major by unit: `weights[j * input_size + k]` is the
/// weight unit `j` applies to input `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayer")]
pub struct Layer {
    size: usize,
    input_size: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

/// Unchecked on-disk shape of a `Layer`.
#[derive(Deserialize)]
struct RawLayer {
    size: usize,
    input_size: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl TryFrom<RawLayer> for Layer {
    type Error = NnError;

    fn try_from(raw: RawLayer) -> Result<Layer> {
        ensure_width("layer biases", raw.biases.len(), raw.size)?;
        Layer::from_parts(raw.input_size, raw.weights, raw.biases)
    }
}

impl Layer {
    /// `size` units of width `input_size`, small random weights and zero biases.
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer {
            size,
            input_size,
            weights: small_normal(size * input_size, INIT_SCALE, rng),
            biases: vec![0.0; size],
        }
    }

    /// Builds a layer from explicit parameters, one bias per unit.
    pub fn from_parts(input_size: usize, weights: Vec<f64>, biases: Vec<f64>) -> Result<Layer> {
        let size = biases.len();
        if size == 0 || input_size == 0 {
            return Err(NnError::InvalidArchitecture(format!(
                "layer needs at least one unit and one input, \
                 got {size} units of width {input_size}"
            )));
        }
        ensure_width("layer weights", weights.len(), size * input_size)?;
        Ok(Layer { size, input_size, weights, biases })
    }

    /// Number of units.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width every unit expects.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Unit `j`, or `None` past the last unit.
    pub fn unit(&self, j: usize) -> Option<Unit<'_>> {
        let row = self.weights.get(j * self.input_size..(j + 1) * self.input_size)?;
        Some(Unit::new(row, *self.biases.get(j)?))
    }

    pub fn units(&self) -> impl Iterator<Item = Unit<'_>> + '_ {
        self.weights
            .chunks(self.input_size)
            .zip(&self.biases)
            .map(|(row, &bias)| Unit::new(row, bias))
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Evaluates every unit on `input`.
    pub fn feed_from(&self, input: &[f64]) -> Result<Vec<f64>> {
        ensure_width("layer input", input.len(), self.input_size)?;
        Ok(self
            .units()
            .map(|unit| unit.activate(unit.weighted_sum(input)))
            .collect())
    }

    /// In-place update of unit `j`: `w += step * inputs`, `b += step`.
    ///
    /// Nothing is touched unless `j` names a unit and `inputs` has the
    /// layer's input width.
    pub fn nudge_unit(&mut self, j: usize, step: f64, inputs: &[f64]) -> Result<()> {
        if j >= self.size {
            return Err(NnError::DimensionMismatch {
                what: "unit index (must be below the layer size)",
                got: j,
                expected: self.size,
            });
        }
        ensure_width("update inputs", inputs.len(), self.input_size)?;
        let row = &mut self.weights[j * self.input_size..(j + 1) * self.input_size];
        for (w, x) in row.iter_mut().zip(inputs) {
            *w += step * x;
        }
        self.biases[j] += step;
        Ok(())
    }

    /// Pushes per-unit gradients back to the inputs of this layer:
    /// `out[k] = Σ_j gradients[j] * w[j][k]` with the current weights.
    pub fn propagate(&self, gradients: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.input_size];
        for (unit, g) in self.units().zip(gradients) {
            for (o, w) in out.iter_mut().zip(unit.weights) {
                *o += g * w;
            }
        }
        out
    }
}
