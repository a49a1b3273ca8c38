use crate::{error::{NnError, Result}, layers::dense::Layer};

/// Plain gradient step with a fixed learning rate.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NnError::InvalidHyperparameter(format!(
                "learning rate must be a positive finite number, got {learning_rate}"
            )));
        }
        Ok(Sgd { learning_rate })
    }

    /// Moves unit `j` of `layer` along its local gradient:
    /// `w += lr * gradient * inputs`, `b += lr * gradient`.
    pub fn step(&self, layer: &mut Layer, j: usize, gradient: f64, inputs: &[f64]) -> Result<()> {
        layer.nudge_unit(j, self.learning_rate * gradient, inputs)
    }
}
