use crate::error::{ensure_width, Result};

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((target - predicted)²); `0.0` for empty vectors.
    pub fn loss(predicted: &[f64], target: &[f64]) -> Result<f64> {
        ensure_width("loss target", target.len(), predicted.len())?;
        if predicted.is_empty() {
            return Ok(0.0);
        }
        let n = predicted.len() as f64;
        Ok(predicted.iter().zip(target.iter())
            .map(|(p, t)| (t - p).powi(2))
            .sum::<f64>() / n)
    }

    /// Per-output error signal: target - predicted.
    /// Points in the direction that lowers the loss, so updates add it.
    pub fn error(predicted: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        ensure_width("loss target", target.len(), predicted.len())?;
        Ok(predicted.iter().zip(target.iter())
            .map(|(p, t)| t - p)
            .collect())
    }
}
