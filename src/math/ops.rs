//! Free-standing vector helpers used by the forward and backward passes.

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

/// Inner product of two equal-length vectors.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(EngineError::shape(
            "dot",
            format!("lengths {} and {}", a.len(), b.len()),
        ));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// `m · v`, see [`Matrix::mat_vec`].
pub fn mat_vec(m: &Matrix, v: &[f64]) -> Result<Vec<f64>> {
    m.mat_vec(v)
}

/// `m · v + bias`: one affine layer applied to a single sample.
pub fn affine(m: &Matrix, v: &[f64], bias: &[f64]) -> Result<Vec<f64>> {
    let z = m.mat_vec(v)?;
    add_bias(&z, bias)
}

/// Element-wise `v + bias`.
pub fn add_bias(v: &[f64], bias: &[f64]) -> Result<Vec<f64>> {
    if v.len() != bias.len() {
        return Err(EngineError::shape(
            "add_bias",
            format!("vector of length {}, bias of length {}", v.len(), bias.len()),
        ));
    }
    Ok(v.iter().zip(bias).map(|(x, b)| x + b).collect())
}

/// Outer product `a ⊗ b`, shape `a.len() × b.len()`.
pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
    Matrix::from_fn(a.len(), b.len(), |i, j| a[i] * b[j])
}

pub fn map<F>(v: &[f64], f: F) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    v.iter().map(|&x| f(x)).collect()
}

/// Index of the maximum element in a slice (first one on ties, 0 when empty).
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_rejects_length_mismatch() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn outer_product_shape() {
        let m = outer(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2), 10.0);
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
