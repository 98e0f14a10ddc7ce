use crate::error::Result;
use crate::loss::mse::check_lengths;

pub struct BceLoss;

/// Predictions are clamped to [EPS, 1 - EPS] so that ln() never sees 0.
pub const EPS: f64 = 1e-15;

fn clamp(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

impl BceLoss {
    /// Scalar BCE: -mean(y·ln(p) + (1-y)·ln(1-p))
    pub fn loss(expected: &[f64], predicted: &[f64]) -> Result<f64> {
        check_lengths("BceLoss::loss", expected, predicted)?;
        let n = predicted.len() as f64;
        Ok(expected.iter().zip(predicted)
            .map(|(y, &p)| {
                let p = clamp(p);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>() / n)
    }

    /// Per-output gradient w.r.t. the prediction: (p - y) / (p·(1 - p))
    ///
    /// Numerically fragile near 0 and 1. The engine never calls this on the
    /// sigmoid output; it uses `sigmoid_output_delta` instead.
    pub fn derivative(expected: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
        check_lengths("BceLoss::derivative", expected, predicted)?;
        Ok(expected.iter().zip(predicted)
            .map(|(y, &p)| {
                let p = clamp(p);
                (p - y) / (p * (1.0 - p))
            })
            .collect())
    }

    /// Gradient of the mean BCE w.r.t. the pre-sigmoid logits:
    ///   ∂L/∂z_j = (ŷ_j - y_j) / n
    pub fn sigmoid_output_delta(expected: &[f64], predicted: &[f64]) -> Result<Vec<f64>> {
        check_lengths("BceLoss::sigmoid_output_delta", expected, predicted)?;
        let n = predicted.len() as f64;
        Ok(expected.iter().zip(predicted)
            .map(|(y, p)| (p - y) / n)
            .collect())
    }
}

pub fn binary_cross_entropy(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    BceLoss::loss(y_true, y_pred)
}

pub fn binary_cross_entropy_derivative(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<f64>> {
    BceLoss::derivative(y_true, y_pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplified_delta_matches_chain_rule_away_from_the_clamp() {
        let y = [1.0, 0.0];
        let p = [0.7, 0.2];
        let dl_dp = BceLoss::derivative(&y, &p).unwrap();
        let delta = BceLoss::sigmoid_output_delta(&y, &p).unwrap();
        for j in 0..2 {
            // σ'(z) expressed through σ(z) = p
            let chained = dl_dp[j] * p[j] * (1.0 - p[j]) / 2.0;
            assert!((chained - delta[j]).abs() < 1e-12);
        }
    }
}
