use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::activation::Activation;
use crate::math::matrix::Matrix;

/// Weight initialization strategy. Biases are never produced here; they start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitMethod {
    /// Uniform(-0.5, 0.5).
    Random,
    /// N(0, sqrt(2 / (rows + cols))). Pairs with sigmoid/tanh.
    Xavier,
    /// N(0, sqrt(2 / cols)). Pairs with relu/leaky_relu.
    He,
}

impl InitMethod {
    pub fn recommended_for(activation: Activation) -> InitMethod {
        match activation {
            Activation::Sigmoid | Activation::Tanh => InitMethod::Xavier,
            Activation::ReLU | Activation::LeakyReLU { .. } => InitMethod::He,
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Uniform on (0, 1] so ln(u1) stays finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Builds a `rows`×`cols` weight matrix.
///
/// `cols` is the fan-in (inputs feeding each unit), `rows` the fan-out.
pub fn initialize_weights<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    method: InitMethod,
    rng: &mut R,
) -> Matrix {
    match method {
        InitMethod::Random => Matrix::from_fn(rows, cols, |_, _| rng.gen_range(-0.5..0.5)),
        InitMethod::Xavier => {
            let std_dev = (2.0 / (rows + cols) as f64).sqrt();
            Matrix::from_fn(rows, cols, |_, _| sample_standard_normal(&mut *rng) * std_dev)
        }
        InitMethod::He => {
            let std_dev = (2.0 / cols as f64).sqrt();
            Matrix::from_fn(rows, cols, |_, _| sample_standard_normal(&mut *rng) * std_dev)
        }
    }
}
