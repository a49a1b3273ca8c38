use crate::error::{ensure_width, Result};

/// Index of the maximum element in a slice (`0` when empty).
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Winning class of every prediction row.
pub fn predicted_classes(predictions: &[Vec<f64>]) -> Vec<usize> {
    predictions.iter().map(|p| argmax(p)).collect()
}

/// Percentage of rows whose argmax equals the expected code.
pub fn accuracy(predictions: &[Vec<f64>], codes: &[usize]) -> Result<f64> {
    ensure_width("expected codes", codes.len(), predictions.len())?;
    if predictions.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted_classes(predictions)
        .iter()
        .zip(codes)
        .filter(|(p, c)| p == c)
        .count();
    Ok(correct as f64 / codes.len() as f64 * 100.0)
}
