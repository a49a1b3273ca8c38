/// Pre-activations are clamped to this magnitude so `exp` never overflows.
pub const CLAMP: f64 = 500.0;

/// Logistic sigmoid `1 / (1 + e^-z)`, with `z` clamped to `[-CLAMP, CLAMP]`.
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-CLAMP, CLAMP);
    1.0 / (1.0 + (-z).exp())
}

/// Derivative of the sigmoid written in terms of its output `out = σ(z)`.
pub fn sigmoid_derivative(out: f64) -> f64 {
    out * (1.0 - out)
}
