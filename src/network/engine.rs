use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::activation::{Activation, sigmoid, sigmoid_derivative};
use crate::error::{EngineError, Result};
use crate::init::initialize_weights;
use crate::loss::{BceLoss, LossFunction, MseLoss};
use crate::math::matrix::Matrix;
use crate::math::ops;
use crate::network::params::{ForwardCache, Gradients, NetworkParameters};
use crate::train::train_config::TrainingConfig;

/// A feed-forward network with exactly one hidden layer and a sigmoid output.
///
/// The engine owns its parameters. They change only through `backward`
/// (or `apply_gradients` / `set_parameters`, which take `&mut self`), and every
/// read accessor hands out an owned copy.
#[derive(Debug, Clone)]
pub struct Engine {
    config: TrainingConfig,
    params: NetworkParameters,
}

impl Engine {
    /// Validates `config` and draws the initial weights. Biases start at zero.
    pub fn new(config: TrainingConfig) -> Result<Engine> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let method = config.init_method();
        let params = NetworkParameters {
            w1: initialize_weights(config.hidden_size, config.input_size, method, &mut rng),
            b1: vec![0.0; config.hidden_size],
            w2: initialize_weights(config.output_size, config.hidden_size, method, &mut rng),
            b2: vec![0.0; config.output_size],
        };

        debug!(
            input = config.input_size,
            hidden = config.hidden_size,
            output = config.output_size,
            activation = config.activation.name(),
            loss = config.loss_function.name(),
            init = ?method,
            "engine initialized"
        );

        Ok(Engine { config, params })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Deep copy of the current parameters.
    pub fn parameters(&self) -> NetworkParameters {
        self.params.clone()
    }

    /// Replaces all parameters; rejected without change if any tensor has the wrong shape.
    pub fn set_parameters(&mut self, params: NetworkParameters) -> Result<()> {
        params.check_shape(self.config.input_size, self.config.hidden_size, self.config.output_size)?;
        self.params = params;
        Ok(())
    }

    /// Runs the batch `x` (batch × input) through the network.
    pub fn forward(&self, x: &Matrix) -> Result<ForwardCache> {
        self.check_input(x, "Engine::forward")?;
        forward_pass(&self.params, self.config.activation, x)
    }

    /// Computes the gradients for `(x, y)` from `cache` and takes one
    /// gradient-descent step. Nothing is modified if any shape is wrong.
    pub fn backward(&mut self, x: &Matrix, y: &Matrix, cache: &ForwardCache) -> Result<()> {
        let grads = self.compute_gradients(x, y, cache)?;
        self.apply_gradients(&grads)
    }

    /// Backpropagation without the update step.
    ///
    /// With batch size m, for every sample i:
    ///   δ2[i] = ∂L/∂ŷ[i] ⊙ σ'(z2[i])        (MSE)
    ///   δ2[i] = (ŷ[i] - y[i]) / n_out         (BCE, sigmoid folded in)
    ///   δ1[i] = (W2ᵀ · δ2[i]) ⊙ f'(z1[i])
    /// and
    ///   dW2 = (1/m) Σ δ2[i] ⊗ h[i],   db2 = (1/m) Σ δ2[i]
    ///   dW1 = (1/m) Σ δ1[i] ⊗ x[i],   db1 = (1/m) Σ δ1[i]
    pub fn compute_gradients(&self, x: &Matrix, y: &Matrix, cache: &ForwardCache) -> Result<Gradients> {
        self.check_targets(x, y, "Engine::backward")?;
        self.check_cache(x, cache)?;

        let (input, hidden, output) = (self.config.input_size, self.config.hidden_size, self.config.output_size);
        let w2_t = self.params.w2.transpose();

        let mut dw1 = Matrix::zeros(hidden, input);
        let mut db1 = vec![0.0; hidden];
        let mut dw2 = Matrix::zeros(output, hidden);
        let mut db2 = vec![0.0; output];

        for i in 0..x.rows() {
            let delta2 = self.output_delta(y.row(i), cache.output.row(i), cache.z2.row(i))?;

            // Error signal for the hidden layer goes through the W2 that produced `cache`.
            let dl_dh = w2_t.mat_vec(&delta2)?;
            let act_derivative = self.config.activation.apply_derivative(cache.z1.row(i));
            let delta1: Vec<f64> = dl_dh.iter().zip(&act_derivative).map(|(e, d)| e * d).collect();

            dw2 = dw2.add(&ops::outer(&delta2, cache.h.row(i)))?;
            db2 = ops::add_bias(&db2, &delta2)?;
            dw1 = dw1.add(&ops::outer(&delta1, x.row(i)))?;
            db1 = ops::add_bias(&db1, &delta1)?;
        }

        let inv_batch = 1.0 / x.rows() as f64;
        Ok(Gradients {
            dw1: dw1.scale(inv_batch),
            db1: ops::map(&db1, |g| g * inv_batch),
            dw2: dw2.scale(inv_batch),
            db2: ops::map(&db2, |g| g * inv_batch),
        })
    }

    /// `θ ← θ - η·∇θ` for every parameter tensor.
    pub fn apply_gradients(&mut self, grads: &Gradients) -> Result<()> {
        grads.check_shape(&self.params)?;

        let lr = self.config.learning_rate;
        let step = |b: &[f64], g: &[f64]| -> Vec<f64> {
            b.iter().zip(g).map(|(b, g)| b - lr * g).collect()
        };

        let w1 = self.params.w1.sub(&grads.dw1.scale(lr))?;
        let w2 = self.params.w2.sub(&grads.dw2.scale(lr))?;
        self.params = NetworkParameters {
            w1,
            b1: step(&self.params.b1, &grads.db1),
            w2,
            b2: step(&self.params.b2, &grads.db2),
        };
        Ok(())
    }

    /// Mean per-sample loss of the current parameters on `(x, y)`.
    pub fn loss(&self, x: &Matrix, y: &Matrix) -> Result<f64> {
        self.check_targets(x, y, "Engine::loss")?;
        let cache = forward_pass(&self.params, self.config.activation, x)?;
        batch_loss(self.config.loss_function, y, &cache.output)
    }

    /// δ2 for one sample: ∂L/∂z2.
    fn output_delta(&self, expected: &[f64], predicted: &[f64], z2: &[f64]) -> Result<Vec<f64>> {
        match self.config.loss_function {
            LossFunction::Mse => {
                let dl_dy = MseLoss::derivative(expected, predicted)?;
                Ok(dl_dy.iter().zip(z2).map(|(g, &z)| g * sigmoid_derivative(z)).collect())
            }
            LossFunction::BinaryCrossEntropy => BceLoss::sigmoid_output_delta(expected, predicted),
        }
    }

    pub(crate) fn check_input(&self, x: &Matrix, op: &'static str) -> Result<()> {
        if x.is_empty() {
            return Err(EngineError::shape(op, "empty batch"));
        }
        if x.cols() != self.config.input_size {
            return Err(EngineError::shape(
                op,
                format!("input has {} features, network expects {}", x.cols(), self.config.input_size),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_targets(&self, x: &Matrix, y: &Matrix, op: &'static str) -> Result<()> {
        self.check_input(x, op)?;
        if y.rows() != x.rows() {
            return Err(EngineError::shape(
                op,
                format!("{} input rows but {} target rows", x.rows(), y.rows()),
            ));
        }
        if y.cols() != self.config.output_size {
            return Err(EngineError::shape(
                op,
                format!("targets have {} columns, network has {} outputs", y.cols(), self.config.output_size),
            ));
        }
        Ok(())
    }

    fn check_cache(&self, x: &Matrix, cache: &ForwardCache) -> Result<()> {
        let m = x.rows();
        let hidden = (m, self.config.hidden_size);
        let output = (m, self.config.output_size);
        let entries = [
            ("z1", cache.z1.shape(), hidden),
            ("h", cache.h.shape(), hidden),
            ("z2", cache.z2.shape(), output),
            ("output", cache.output.shape(), output),
        ];
        for (name, got, want) in entries {
            if got != want {
                return Err(EngineError::shape(
                    "Engine::backward",
                    format!("cache.{name} is {got:?}, expected {want:?} for a batch of {m}"),
                ));
            }
        }
        Ok(())
    }
}

/// Forward pass over explicit parameters, independent of any engine.
///
/// Per row x: z1 = W1·x + b1, h = f(z1), z2 = W2·h + b2, ŷ = σ(z2).
/// The output activation is always sigmoid.
pub fn forward_pass(params: &NetworkParameters, activation: Activation, x: &Matrix) -> Result<ForwardCache> {
    let m = x.rows();
    let mut z1_rows = Vec::with_capacity(m);
    let mut h_rows = Vec::with_capacity(m);
    let mut z2_rows = Vec::with_capacity(m);
    let mut out_rows = Vec::with_capacity(m);

    for row in x.iter_rows() {
        let z1 = ops::affine(&params.w1, row, &params.b1)?;
        let h = activation.apply(&z1);
        let z2 = ops::affine(&params.w2, &h, &params.b2)?;
        let out = ops::map(&z2, sigmoid);
        z1_rows.push(z1);
        h_rows.push(h);
        z2_rows.push(z2);
        out_rows.push(out);
    }

    Ok(ForwardCache {
        z1: Matrix::from_rows(z1_rows)?,
        h: Matrix::from_rows(h_rows)?,
        z2: Matrix::from_rows(z2_rows)?,
        output: Matrix::from_rows(out_rows)?,
    })
}

/// Mean of the per-sample losses over a batch.
pub fn batch_loss(loss: LossFunction, expected: &Matrix, predicted: &Matrix) -> Result<f64> {
    if expected.shape() != predicted.shape() {
        return Err(EngineError::shape(
            "batch_loss",
            format!("targets {:?} vs predictions {:?}", expected.shape(), predicted.shape()),
        ));
    }
    if expected.is_empty() {
        return Err(EngineError::shape("batch_loss", "empty batch"));
    }
    let mut total = 0.0;
    for (y, p) in expected.iter_rows().zip(predicted.iter_rows()) {
        total += loss.loss(y, p)?;
    }
    Ok(total / expected.rows() as f64)
}
