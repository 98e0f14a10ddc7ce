use crate::error::{EngineError, Result};

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²)
    pub fn loss(expected: &[f64], predicted: &[f64]) -> Result<f64> {
        check_lengths("MseLoss::loss", expected, predicted)?;
        let n = predicted.len() as f64;
        Ok(expected.iter().zip(predicted)
            .map(|(y, p)| (y - p).powi(2))
            .sum::<f64>() / n)
    }

    /// Per-output gradient w.r.t. the prediction: 2·(predicted - expected) / n
    pub fn derivative(expected: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
        check_lengths("MseLoss::derivative", expected, predicted)?;
        let scale = 2.0 / predicted.len() as f64;
        Ok(expected.iter().zip(predicted)
            .map(|(y, p)| scale * (p - y))
            .collect())
    }
}

pub(crate) fn check_lengths(op: &'static str, expected: &[f64], predicted: &[f64]) -> Result<()> {
    if expected.len() != predicted.len() {
        return Err(EngineError::shape(
            op,
            format!("{} targets vs {} predictions", expected.len(), predicted.len()),
        ));
    }
    if predicted.is_empty() {
        return Err(EngineError::shape(op, "empty prediction vector"));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    MseLoss::loss(y_true, y_pred)
}

pub fn mean_squared_error_derivative(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<f64>> {
    MseLoss::derivative(y_true, y_pred)
}
