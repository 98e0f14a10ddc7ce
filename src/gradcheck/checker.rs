use std::fmt;

use tracing::{debug, warn};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::engine::{batch_loss, forward_pass, Engine};
use crate::network::params::{Gradients, NetworkParameters};

pub const DEFAULT_EPSILON: f64 = 1e-7;

/// Central difference `(f(w+ε) - f(w-ε)) / 2ε`; error is O(ε²).
pub fn numerical_gradient<F>(mut f: F, w: f64, epsilon: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    (f(w + epsilon) - f(w - epsilon)) / (2.0 * epsilon)
}

/// [`numerical_gradient`] for a loss that can fail.
pub fn try_numerical_gradient<F, E>(mut f: F, w: f64, epsilon: f64) -> std::result::Result<f64, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
{
    let plus = f(w + epsilon)?;
    let minus = f(w - epsilon)?;
    Ok((plus - minus) / (2.0 * epsilon))
}

/// How far an analytic gradient is from its finite-difference estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientVerdict {
    /// Difference below 1e-7.
    Excellent,
    /// Difference below 1e-5.
    Correct,
    /// Between 1e-5 and 1e-3: usually a kink (relu at 0) or a clamped output.
    Questionable,
    /// Above 1e-3: backpropagation is wrong.
    Defect,
}

impl GradientVerdict {
    pub fn from_difference(difference: f64) -> GradientVerdict {
        if difference < 1e-7 {
            GradientVerdict::Excellent
        } else if difference < 1e-5 {
            GradientVerdict::Correct
        } else if difference <= 1e-3 {
            GradientVerdict::Questionable
        } else {
            // Also catches NaN.
            GradientVerdict::Defect
        }
    }

    pub fn is_acceptable(&self) -> bool {
        matches!(self, GradientVerdict::Excellent | GradientVerdict::Correct)
    }
}

/// Location of a single scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterId {
    W1 { row: usize, col: usize },
    B1(usize),
    W2 { row: usize, col: usize },
    B2(usize),
}

impl ParameterId {
    /// Every parameter of `params`, in W1, b1, W2, b2 order.
    pub fn all(params: &NetworkParameters) -> Vec<ParameterId> {
        let mut ids = Vec::with_capacity(params.len());
        ids.extend(matrix_ids(&params.w1).map(|(row, col)| ParameterId::W1 { row, col }));
        ids.extend((0..params.b1.len()).map(ParameterId::B1));
        ids.extend(matrix_ids(&params.w2).map(|(row, col)| ParameterId::W2 { row, col }));
        ids.extend((0..params.b2.len()).map(ParameterId::B2));
        ids
    }

    fn slot<'a>(&self, params: &'a mut NetworkParameters) -> &'a mut f64 {
        match *self {
            ParameterId::W1 { row, col } => params.w1.get_mut(row, col),
            ParameterId::B1(k) => &mut params.b1[k],
            ParameterId::W2 { row, col } => params.w2.get_mut(row, col),
            ParameterId::B2(k) => &mut params.b2[k],
        }
    }

    fn gradient(&self, grads: &Gradients) -> f64 {
        match *self {
            ParameterId::W1 { row, col } => grads.dw1.get(row, col),
            ParameterId::B1(k) => grads.db1[k],
            ParameterId::W2 { row, col } => grads.dw2.get(row, col),
            ParameterId::B2(k) => grads.db2[k],
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterId::W1 { row, col } => write!(f, "W1[{row}][{col}]"),
            ParameterId::B1(k) => write!(f, "b1[{k}]"),
            ParameterId::W2 { row, col } => write!(f, "W2[{row}][{col}]"),
            ParameterId::B2(k) => write!(f, "b2[{k}]"),
        }
    }
}

fn matrix_ids(m: &Matrix) -> impl Iterator<Item = (usize, usize)> {
    let cols = m.cols();
    (0..m.rows()).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}

/// Outcome of [`check_gradients`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheckReport {
    pub max_difference: f64,
    pub mean_difference: f64,
    pub checked: usize,
    /// Parameter with the largest difference.
    pub worst: Option<ParameterId>,
    pub verdict: GradientVerdict,
}

/// Gaps at or below this are finite-difference rounding noise and count as agreement.
const NOISE_FLOOR: f64 = 1e-10;

/// Relative difference `|a - n| / (|a| + |n|)`.
///
/// A sign error scores 1.0 whatever the magnitude of the gradient.
pub fn gradient_difference(analytic: f64, numerical: f64) -> f64 {
    let gap = (analytic - numerical).abs();
    if gap <= NOISE_FLOOR {
        return 0.0;
    }
    gap / (analytic.abs() + numerical.abs())
}

/// Compares `engine.compute_gradients` against central differences for
/// every weight and bias, using the engine's current parameters.
///
/// Each parameter is perturbed by ±ε on a private copy of the parameters and
/// restored before the next one, so the engine itself is never modified.
pub fn check_gradients(engine: &Engine, x: &Matrix, y: &Matrix, epsilon: f64) -> Result<GradientCheckReport> {
    let cache = engine.forward(x)?;
    let analytic = engine.compute_gradients(x, y, &cache)?;

    let config = engine.config();
    let (activation, loss) = (config.activation, config.loss_function);
    let mut probe = engine.parameters();
    let ids = ParameterId::all(&probe);

    let mut max_difference = 0.0_f64;
    let mut total = 0.0;
    let mut worst = None;

    for id in &ids {
        let original = *id.slot(&mut probe);
        let numerical = try_numerical_gradient(
            |w| -> Result<f64> {
                *id.slot(&mut probe) = w;
                let out = forward_pass(&probe, activation, x)?.output;
                batch_loss(loss, y, &out)
            },
            original,
            epsilon,
        )?;
        *id.slot(&mut probe) = original;

        let difference = gradient_difference(id.gradient(&analytic), numerical);
        total += difference;
        if worst.is_none() || difference > max_difference || difference.is_nan() {
            max_difference = difference;
            worst = Some(*id);
        }
    }

    let mean_difference = if ids.is_empty() { 0.0 } else { total / ids.len() as f64 };
    let verdict = GradientVerdict::from_difference(max_difference);

    match verdict {
        GradientVerdict::Defect => warn!(
            max_difference,
            worst = %worst.map(|id| id.to_string()).unwrap_or_default(),
            "analytic gradients disagree with finite differences"
        ),
        _ => debug!(max_difference, mean_difference, ?verdict, "gradient check complete"),
    }

    Ok(GradientCheckReport {
        max_difference,
        mean_difference,
        checked: ids.len(),
        worst,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_difference_of_a_cubic() {
        let g = numerical_gradient(|w| w.powi(3), 2.0, 1e-5);
        assert!((g - 12.0).abs() < 1e-6);
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(GradientVerdict::from_difference(1e-9), GradientVerdict::Excellent);
        assert_eq!(GradientVerdict::from_difference(1e-6), GradientVerdict::Correct);
        assert_eq!(GradientVerdict::from_difference(1e-4), GradientVerdict::Questionable);
        assert_eq!(GradientVerdict::from_difference(1e-2), GradientVerdict::Defect);
        assert_eq!(GradientVerdict::from_difference(f64::NAN), GradientVerdict::Defect);
    }

    #[test]
    fn difference_is_relative_to_the_gradient_size() {
        assert_eq!(gradient_difference(0.0, 0.0), 0.0);
        assert_eq!(gradient_difference(3e-4, -3e-4), 1.0);
        assert!((gradient_difference(2e-3, 1e-3) - 1.0 / 3.0).abs() < 1e-12);
        assert!(gradient_difference(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn parameter_ids_cover_every_scalar() {
        let params = NetworkParameters::zeros(3, 4, 2);
        let ids = ParameterId::all(&params);
        assert_eq!(ids.len(), params.len());
        assert_eq!(ids[0].to_string(), "W1[0][0]");
        assert_eq!(ids.last().copied(), Some(ParameterId::B2(1)));
    }
}
