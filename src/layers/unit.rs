use crate::activation::sigmoid::sigmoid;
use crate::error::{ensure_width, Result};

/// A single sigmoid neuron, viewed over its layer's weight storage.
///
/// The owning `Layer` keeps the weights in one contiguous buffer; a `Unit`
/// only borrows its row of it, so evaluating a neuron can never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
    pub weights: &'a [f64],
    pub bias: f64,
}

impl<'a> Unit<'a> {
    pub fn new(weights: &'a [f64], bias: f64) -> Unit<'a> {
        Unit { weights, bias }
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn activate(&self, z: f64) -> f64 {
        sigmoid(z)
    }

    /// `σ(inputs · weights + bias)`.
    pub fn forward(&self, inputs: &[f64]) -> Result<f64> {
        ensure_width("unit inputs", inputs.len(), self.weights.len())?;
        Ok(self.activate(self.weighted_sum(inputs)))
    }

    /// Caller guarantees `inputs.len() == weights.len()`.
    pub(crate) fn weighted_sum(&self, inputs: &[f64]) -> f64 {
        inputs
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;

    #[test]
    fn zero_weights_give_half() {
        let w = [0.0; 4];
        let unit = Unit::new(&w, 0.0);
        let out = unit.forward(&[5.1, 3.5, 1.4, 0.2]).unwrap();
        assert!((out - 0.5).abs() < 1e-12);
    }

    #[test]
    fn computes_weighted_sum_plus_bias() {
        let w = [1.0, -2.0];
        let unit = Unit::new(&w, 0.5);
        let out = unit.forward(&[3.0, 1.0]).unwrap();
        // z = 3 - 2 + 0.5
        assert!((out - sigmoid(1.5)).abs() < 1e-12);
    }

    #[test]
    fn output_in_unit_interval() {
        let w = [0.3, -0.1, 0.2, 0.05];
        let unit = Unit::new(&w, 0.0);
        let out = unit.forward(&[5.1, 3.5, 1.4, 0.2]).unwrap();
        assert!(out > 0.0 && out < 1.0);
    }

    #[test]
    fn rejects_wrong_width() {
        let w = [0.1, 0.2, 0.3];
        let unit = Unit::new(&w, 0.0);
        match unit.forward(&[1.0, 2.0]) {
            Err(NnError::DimensionMismatch { got, expected, .. }) => {
                assert_eq!((got, expected), (2, 3));
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }
}
