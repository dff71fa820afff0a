//! Root exploration noise.
//!
//! Symmetric Dirichlet samples are drawn as normalized Gamma(alpha, 1)
//! variates. `rand_distr::Gamma` uses Marsaglia and Tsang's method, with the
//! `u^(1/alpha)` boost for shapes below one.

use rand::Rng;
use rand_distr::{Distribution, Gamma};

/// Draw one sample from a symmetric Dirichlet(alpha) over `n` outcomes.
///
/// Returns an empty vector for `n == 0`. A non-positive or non-finite alpha
/// has no Gamma distribution; in that case the sample is uniform.
pub fn dirichlet_noise<R: Rng + ?Sized>(n: usize, alpha: f32, rng: &mut R) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    let uniform = || vec![1.0 / n as f32; n];

    let Ok(gamma) = Gamma::new(alpha as f64, 1.0) else {
        return uniform();
    };
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for s in &mut samples {
            *s /= sum;
        }
        samples
    } else {
        // Every draw underflowed (tiny alpha).
        uniform()
    }
}

/// Mix `noise` into `priors` in place: `p' = (1 - eps) * p + eps * noise`.
pub fn blend_noise(priors: &mut [f32], noise: &[f32], epsilon: f32) {
    if epsilon == 0.0 {
        return;
    }
    for (p, n) in priors.iter_mut().zip(noise.iter()) {
        *p = if epsilon == 1.0 {
            *n
        } else {
            (1.0 - epsilon) * *p + epsilon * n
        };
    }
}
