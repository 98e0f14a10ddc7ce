use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

/// The four parameter tensors of a single-hidden-layer network.
///
/// - `w1`: hidden × input
/// - `b1`: hidden
/// - `w2`: output × hidden
/// - `b2`: output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub w1: Matrix,
    pub b1: Vec<f64>,
    pub w2: Matrix,
    pub b2: Vec<f64>,
}

impl NetworkParameters {
    pub fn zeros(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        NetworkParameters {
            w1: Matrix::zeros(hidden_size, input_size),
            b1: vec![0.0; hidden_size],
            w2: Matrix::zeros(output_size, hidden_size),
            b2: vec![0.0; output_size],
        }
    }

    pub fn input_size(&self) -> usize {
        self.w1.cols()
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.rows()
    }

    pub fn output_size(&self) -> usize {
        self.w2.rows()
    }

    /// Total number of scalar parameters.
    pub fn len(&self) -> usize {
        self.w1.rows() * self.w1.cols() + self.b1.len() + self.w2.rows() * self.w2.cols() + self.b2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that the tensors describe an `input → hidden → output` network.
    pub fn check_shape(&self, input_size: usize, hidden_size: usize, output_size: usize) -> Result<()> {
        compare_shapes(
            "NetworkParameters::check_shape",
            [
                ("w1", self.w1.shape(), (hidden_size, input_size)),
                ("b1", (self.b1.len(), 1), (hidden_size, 1)),
                ("w2", self.w2.shape(), (output_size, hidden_size)),
                ("b2", (self.b2.len(), 1), (output_size, 1)),
            ],
        )
    }
}

fn compare_shapes(op: &'static str, entries: [(&str, (usize, usize), (usize, usize)); 4]) -> Result<()> {
    for (name, got, want) in entries {
        if got != want {
            return Err(EngineError::shape(op, format!("{name} is {got:?}, expected {want:?}")));
        }
    }
    Ok(())
}

/// Gradients of the batch loss, laid out exactly like [`NetworkParameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub dw1: Matrix,
    pub db1: Vec<f64>,
    pub dw2: Matrix,
    pub db2: Vec<f64>,
}

impl Gradients {
    /// Checks that every gradient tensor matches the tensor it updates.
    pub fn check_shape(&self, params: &NetworkParameters) -> Result<()> {
        compare_shapes(
            "Gradients::check_shape",
            [
                ("dw1", self.dw1.shape(), params.w1.shape()),
                ("db1", (self.db1.len(), 1), (params.b1.len(), 1)),
                ("dw2", self.dw2.shape(), params.w2.shape()),
                ("db2", (self.db2.len(), 1), (params.b2.len(), 1)),
            ],
        )
    }
}

/// Every intermediate tensor of one forward pass, rows indexed by sample.
///
/// Produced by `Engine::forward` and consumed by the matching `Engine::backward`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCache {
    /// Hidden pre-activation, batch × hidden.
    pub z1: Matrix,
    /// Hidden activation, batch × hidden.
    pub h: Matrix,
    /// Output pre-activation, batch × output.
    pub z2: Matrix,
    /// Sigmoid output, batch × output.
    pub output: Matrix,
}

impl ForwardCache {
    pub fn batch_size(&self) -> usize {
        self.output.rows()
    }
}
