use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};

/// Dense row-major matrix of `f64`.
///
/// Always rectangular: every constructor checks that all rows have the same
/// length, and every binary operation checks dimensions before computing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from raw rows, rejecting ragged input.
    /// An empty `Vec` yields a 0×0 matrix.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(EngineError::shape(
                "Matrix::from_rows",
                format!("row {i} has {} columns, row 0 has {cols}", row.len()),
            ));
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Fills a `rows`×`cols` matrix by calling `f(i, j)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| f(i, j)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.iter().map(|row| row.as_slice())
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i][j]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.data[i][j]
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.data
    }

    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.data[j][i])
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(EngineError::shape(
                "Matrix::matmul",
                format!("{:?} · {:?}", self.shape(), rhs.shape()),
            ));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }
                res.data[i][j] = sum;
            }
        }
        Ok(res)
    }

    /// Matrix-vector product `self · v`.
    pub fn mat_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        if self.cols != v.len() {
            return Err(EngineError::shape(
                "Matrix::mat_vec",
                format!("{:?} · vector of length {}", self.shape(), v.len()),
            ));
        }
        Ok(self
            .data
            .iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "Matrix::add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "Matrix::sub", |a, b| a - b)
    }

    /// Adds `bias` to every row (broadcast over the batch dimension).
    pub fn add_row_vector(&self, bias: &[f64]) -> Result<Matrix> {
        if self.cols != bias.len() {
            return Err(EngineError::shape(
                "Matrix::add_row_vector",
                format!("{} columns, bias of length {}", self.cols, bias.len()),
            ));
        }
        Ok(self.map_rows(|row| row.iter().zip(bias).map(|(x, b)| x + b).collect()))
    }

    /// Appends a constant-1 column, so that `[X | 1] · [W | b]ᵀ` folds the bias
    /// into a single product.
    pub fn augment_bias(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols + 1,
            data: self
                .data
                .iter()
                .map(|row| row.iter().copied().chain(std::iter::once(1.0)).collect())
                .collect(),
        }
    }

    fn map_rows<F>(&self, f: F) -> Matrix
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|row| f(row)).collect(),
        }
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(EngineError::shape(
                op,
                format!("{:?} vs {:?}", self.shape(), rhs.shape()),
            ));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(row_a, row_b)| row_a.iter().zip(row_b).map(|(&a, &b)| f(a, b)).collect())
                .collect(),
        })
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = EngineError;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Matrix> {
        Matrix::from_rows(data)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.data
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
