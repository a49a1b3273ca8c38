use rand::Rng;
use std::f64::consts::PI;

/// Fresh weights are `INIT_SCALE * N(0, 1)`; small enough to keep sigmoids
/// out of saturation on the first passes.
pub const INIT_SCALE: f64 = 0.1;

/// Samples a single value from N(0, 1) using the Box-Muller transform.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both uniforms live in (0, 1] so ln() never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// `len` samples of `scale * N(0, 1)`.
pub fn small_normal<R: Rng + ?Sized>(len: usize, scale: f64, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| sample_standard_normal(rng) * scale).collect()
}
