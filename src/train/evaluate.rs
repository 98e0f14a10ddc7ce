use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::math::ops::argmax;
use crate::network::engine::Engine;

/// Decision threshold for single-output (binary) networks.
pub const BINARY_THRESHOLD: f64 = 0.5;

impl Engine {
    /// Sigmoid outputs for every sample, batch × output.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward(x)?.output)
    }

    /// Class labels: `0`/`1` by thresholding at 0.5 when there is a single
    /// output unit, otherwise the index of the largest output unit.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.iter_rows().map(classify).collect())
    }

    /// Fraction of samples whose predicted class matches `y`.
    pub fn accuracy(&self, x: &Matrix, y: &Matrix) -> Result<f64> {
        self.check_targets(x, y, "Engine::accuracy")?;
        Ok(accuracy_of(&self.predict_proba(x)?, y))
    }
}

fn classify(output: &[f64]) -> usize {
    if output.len() == 1 {
        usize::from(output[0] >= BINARY_THRESHOLD)
    } else {
        argmax(output)
    }
}

/// Accuracy of raw outputs against targets of the same shape.
///
/// Binary targets count as class 1 when `>= 0.5`; multi-output targets are
/// compared by arg-max (one-hot rows).
pub(crate) fn accuracy_of(output: &Matrix, y: &Matrix) -> f64 {
    if output.is_empty() {
        return 0.0;
    }
    let correct = output
        .iter_rows()
        .zip(y.iter_rows())
        .filter(|(out, target)| classify(out) == classify(target))
        .count();
    correct as f64 / output.rows() as f64
}
