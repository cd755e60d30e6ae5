//! Immutable dense matrices of semiring elements.

use std::fmt;
use std::ops::Index;

use crate::error::{Result, TropicalError};
use crate::types::Semiring;

/// A dense `rows × cols` matrix of `f64` semiring elements.
///
/// Data is stored in row-major order. A matrix never changes after it is
/// built: every operation, including [`with_element`](Matrix::with_element),
/// returns a new value. Both dimensions are at least 1.
///
/// Equality follows the order of the extended reals: two matrices are equal
/// iff they have the same shape and no cell of one is strictly less or
/// strictly greater than the matching cell of the other.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(TropicalError::Shape(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(TropicalError::Shape(format!(
                "expected {} elements for a {}x{} matrix, got {}",
                rows * cols,
                rows,
                cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from a list of equally long rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(TropicalError::Shape(format!(
                    "row {} has {} elements, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, data)
    }

    /// Create an `n×1` column vector.
    pub fn column_vector(values: &[f64]) -> Result<Self> {
        Self::new(values.len(), 1, values.to_vec())
    }

    /// Create a `1×n` row vector.
    pub fn row_vector(values: &[f64]) -> Result<Self> {
        Self::new(1, values.len(), values.to_vec())
    }

    /// Create a `1×1` matrix.
    pub fn scalar(value: f64) -> Self {
        Self {
            rows: 1,
            cols: 1,
            data: vec![value],
        }
    }

    /// Create a matrix with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    /// Build a matrix cell by cell.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self::new(rows, cols, data)
    }

    /// Fallible variant of [`from_fn`](Matrix::from_fn).
    pub fn try_from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<f64>,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j)?);
            }
        }
        Self::new(rows, cols, data)
    }

    /// Internal constructor for shapes already known to be valid.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && data.len() == rows * cols);
        Self { rows, cols, data }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(i, j)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Copy of this matrix with cell `(i, j)` replaced by `value`.
    pub fn with_element(&self, i: usize, j: usize, value: f64) -> Result<Self> {
        if i >= self.rows || j >= self.cols {
            return Err(TropicalError::Shape(format!(
                "index ({}, {}) out of bounds for a {}x{} matrix",
                i, j, self.rows, self.cols
            )));
        }
        let mut data = self.data.clone();
        data[i * self.cols + j] = value;
        Ok(Self::from_parts(self.rows, self.cols, data))
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Column `j` as a new vector.
    ///
    /// # Panics
    /// Panics if `j >= cols`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.cols, "column {} out of bounds", j);
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self::from_parts(self.cols, self.rows, data)
    }

    /// A `1×1` matrix.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// A single row or a single column.
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Check that every cell lies in the domain of `s`.
    pub fn validate<S: Semiring + ?Sized>(&self, s: &S) -> Result<()> {
        match self.data.iter().find(|v| !s.contains(**v)) {
            Some(&bad) => Err(s.domain_error(bad)),
            None => Ok(()),
        }
    }

    /// Cell-wise comparison where finite values may differ by `tolerance`.
    ///
    /// Infinite cells must match exactly. With `tolerance == 0.0` this is
    /// the same relation as `==`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| cells_equal(a, b, tolerance))
    }
}

/// Order-based cell equality with an optional tolerance on finite values.
pub(crate) fn cells_equal(a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_finite() && b.is_finite() {
        (a - b).abs() <= tolerance
    } else {
        !(a < b) && !(a > b)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| !(a < b) && !(a > b))
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for a {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            f.write_str(if i == 0 { "[" } else { " " })?;
            f.write_str("[")?;
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                if *v == f64::NEG_INFINITY {
                    f.write_str("-∞")?;
                } else if *v == f64::INFINITY {
                    f.write_str("+∞")?;
                } else {
                    write!(f, "{}", v)?;
                }
            }
            f.write_str("]")?;
            if i + 1 == self.rows {
                f.write_str("]")?;
            } else {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
