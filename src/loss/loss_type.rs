use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::bce::BceLoss;
use crate::loss::mse::MseLoss;

/// Selects which loss function the engine trains against.
///
/// - `Mse`                — Mean-squared error over the sigmoid output.
/// - `BinaryCrossEntropy` — Binary cross-entropy; the backward pass uses the
///   combined sigmoid+BCE gradient `(ŷ - y) / n` rather than chaining the two
///   derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossFunction {
    #[serde(rename = "mse")]
    Mse,
    #[serde(rename = "binary_crossentropy")]
    BinaryCrossEntropy,
}

impl LossFunction {
    /// Loss of a single sample.
    pub fn loss(&self, expected: &[f64], predicted: &[f64]) -> Result<f64> {
        match self {
            LossFunction::Mse => MseLoss::loss(expected, predicted),
            LossFunction::BinaryCrossEntropy => BceLoss::loss(expected, predicted),
        }
    }

    /// ∂L/∂ŷ for a single sample.
    pub fn derivative(&self, expected: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
        match self {
            LossFunction::Mse => MseLoss::derivative(expected, predicted),
            LossFunction::BinaryCrossEntropy => BceLoss::derivative(expected, predicted),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LossFunction::Mse => "mse",
            LossFunction::BinaryCrossEntropy => "binary_crossentropy",
        }
    }
}
