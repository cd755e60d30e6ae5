//! Elementary tropical matrix operations.
//!
//! Every function takes the semiring explicitly. Results are new matrices;
//! inputs are never modified.

use crate::error::{shape_mismatch, Result, TropicalError};
use crate::matrix::Matrix;
use crate::types::{sum, Semiring};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tropical matrix multiplication: C = A ⊗ B
///
/// Computes `C[i,j] = ⊕_c (A[i,c] ⊗ B[c,j])`. Terms with a zero factor are
/// skipped, so `zero ⊗ x` is never evaluated; a cell without any remaining
/// term is zero.
///
/// If either operand is `1×1` it is treated as a scalar and the call is
/// forwarded to [`scalar_multiply`].
///
/// # Errors
/// [`TropicalError::Shape`] when `A.cols != B.rows`,
/// [`TropicalError::Domain`] when a product leaves the domain of `s`.
///
/// # Example
///
/// ```
/// use tropical_approx::{multiply, Matrix, MaxPlus};
///
/// let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap(); // 2x3
/// let b = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap(); // 3x2
///
/// let c = multiply(&a, &b, &MaxPlus).unwrap();
/// // C[0,0] = max(1+1, 2+3, 3+5) = 8
/// assert_eq!(c[(0, 0)], 8.0);
/// ```
pub fn multiply<S: Semiring + ?Sized>(a: &Matrix, b: &Matrix, s: &S) -> Result<Matrix> {
    if a.is_scalar() {
        return scalar_multiply(b, a[(0, 0)], s);
    }
    if b.is_scalar() {
        return scalar_multiply(a, b[(0, 0)], s);
    }
    if a.cols() != b.rows() {
        return Err(shape_mismatch("A.cols != B.rows", a.shape(), b.shape()));
    }

    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    let lhs = a.as_slice();
    let rhs = b.as_slice();

    let data = fill_rows(m, n, |i, row| {
        let a_row = &lhs[i * k..(i + 1) * k];
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = sum(
                s,
                a_row.iter().enumerate().filter_map(|(c, &x)| {
                    let y = rhs[c * n + j];
                    if s.is_zero(x) || s.is_zero(y) {
                        None
                    } else {
                        Some(s.mul(x, y))
                    }
                }),
            );
        }
    });

    checked(m, n, data, s)
}

/// Multiply every cell of `matrix` by `scalar`.
///
/// Zero cells stay zero whatever the scalar; a zero scalar yields the zero
/// matrix of the same shape.
///
/// # Errors
/// [`TropicalError::Domain`] when `scalar` is not an element of `s` or a
/// product leaves the domain.
pub fn scalar_multiply<S: Semiring + ?Sized>(matrix: &Matrix, scalar: f64, s: &S) -> Result<Matrix> {
    let scalar = s.element(scalar)?;
    let (rows, cols) = matrix.shape();
    if s.is_zero(scalar) {
        return Ok(Matrix::from_parts(rows, cols, vec![s.zero(); rows * cols]));
    }
    let data = matrix
        .as_slice()
        .iter()
        .map(|&v| if s.is_zero(v) { v } else { s.mul(v, scalar) })
        .collect();
    checked(rows, cols, data, s)
}

/// Tropical matrix addition: C = A ⊕ B, cell by cell.
///
/// # Errors
/// [`TropicalError::Shape`] when the shapes differ,
/// [`TropicalError::Domain`] when a cell lies outside the domain of `s`.
pub fn add<S: Semiring + ?Sized>(a: &Matrix, b: &Matrix, s: &S) -> Result<Matrix> {
    if a.shape() != b.shape() {
        return Err(shape_mismatch("A and B must have the same shape", a.shape(), b.shape()));
    }
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| match (s.is_zero(x), s.is_zero(y)) {
            (false, false) => s.add(x, y),
            (true, _) => y,
            (false, true) => x,
        })
        .collect();
    checked(a.rows(), a.cols(), data, s)
}

/// Tropical pseudo-inverse: the transpose with every non-zero entry
/// replaced by its multiplicative inverse.
pub fn pseudo_inverse<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> Matrix {
    let t = matrix.transpose();
    let data = t.as_slice().iter().map(|&v| s.invert(v)).collect();
    Matrix::from_parts(t.rows(), t.cols(), data)
}

/// `size×size` matrix with `one` on the diagonal and `zero` elsewhere.
pub fn identity_matrix<S: Semiring + ?Sized>(size: usize, s: &S) -> Result<Matrix> {
    Matrix::from_fn(size, size, |i, j| if i == j { s.one() } else { s.zero() })
}

/// `rows×cols` matrix of `zero`.
pub fn zero_matrix<S: Semiring + ?Sized>(rows: usize, cols: usize, s: &S) -> Result<Matrix> {
    Matrix::filled(rows, cols, s.zero())
}

/// `size×1` column of `one`.
pub fn vector_of_ones<S: Semiring + ?Sized>(size: usize, s: &S) -> Result<Matrix> {
    Matrix::filled(size, 1, s.one())
}

/// Successive powers `M¹, …, Mⁿ` of a square matrix, optionally prefixed
/// by the identity `M⁰`.
#[derive(Debug, Clone)]
pub struct MatrixPowers {
    base: Matrix,
    /// `powers[k]` holds `M^k`; index 0 is the identity.
    powers: Vec<Matrix>,
    with_identity: bool,
}

impl MatrixPowers {
    /// Highest exponent computed so far.
    pub fn highest(&self) -> usize {
        self.powers.len() - 1
    }

    /// `M^k`, if it has been computed (and `k == 0` only when the identity
    /// was requested).
    pub fn power(&self, k: usize) -> Option<&Matrix> {
        if k == 0 && !self.with_identity {
            return None;
        }
        self.powers.get(k)
    }

    /// The matrix being raised to powers.
    pub fn base(&self) -> &Matrix {
        &self.base
    }

    /// Number of matrices in the sequence.
    pub fn len(&self) -> usize {
        if self.with_identity {
            self.powers.len()
        } else {
            self.powers.len() - 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the sequence in increasing exponent order.
    pub fn iter(&self) -> std::slice::Iter<'_, Matrix> {
        let start = if self.with_identity { 0 } else { 1 };
        self.powers[start..].iter()
    }

    /// A longer sequence reaching at least `M^n`; reuses what is computed.
    pub fn extended<S: Semiring + ?Sized>(mut self, n: usize, s: &S) -> Result<Self> {
        while self.highest() < n {
            let next = multiply(&self.powers[self.powers.len() - 1], &self.base, s)?;
            self.powers.push(next);
        }
        Ok(self)
    }

    pub fn into_vec(self) -> Vec<Matrix> {
        let start = if self.with_identity { 0 } else { 1 };
        self.powers.into_iter().skip(start).collect()
    }
}

impl<'a> IntoIterator for &'a MatrixPowers {
    type Item = &'a Matrix;
    type IntoIter = std::slice::Iter<'a, Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compute `[M¹, …, Mⁿ]`, prefixed with `I` when `with_identity` is set.
///
/// Each power is obtained by one multiplication from the previous one.
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix,
/// [`TropicalError::Configuration`] when `n == 0`.
pub fn matrix_powers<S: Semiring + ?Sized>(
    matrix: &Matrix,
    n: usize,
    s: &S,
    with_identity: bool,
) -> Result<MatrixPowers> {
    require_square(matrix)?;
    if n == 0 {
        return Err(TropicalError::Configuration(
            "number of matrix powers must be at least 1".to_string(),
        ));
    }
    let identity = identity_matrix(matrix.rows(), s)?;
    let powers = MatrixPowers {
        base: matrix.clone(),
        powers: vec![identity, matrix.clone()],
        with_identity,
    };
    powers.extended(n, s)
}

pub(crate) fn require_square(matrix: &Matrix) -> Result<()> {
    if matrix.is_square() {
        Ok(())
    } else {
        Err(TropicalError::Shape(format!(
            "square matrix required, got {}x{}",
            matrix.rows(),
            matrix.cols()
        )))
    }
}

/// Wrap computed cells, rejecting any that left the domain of `s`
/// (overflow to `+∞` in max-times, underflow to `0` in min-times).
fn checked<S: Semiring + ?Sized>(
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    s: &S,
) -> Result<Matrix> {
    match data.iter().find(|v| !s.contains(**v)) {
        Some(&bad) => Err(s.domain_error(bad)),
        None => Ok(Matrix::from_parts(rows, cols, data)),
    }
}

/// Fill a row-major `rows×cols` buffer one row at a time.
fn fill_rows<F>(rows: usize, cols: usize, f: F) -> Vec<f64>
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    let mut data = vec![0.0; rows * cols];

    #[cfg(feature = "parallel")]
    {
        data.par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, row)| f(i, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (i, row) in data.chunks_mut(cols).enumerate() {
            f(i, row);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MaxPlus, MaxTimes, MinPlus, MinTimes};

    const Z: f64 = f64::NEG_INFINITY;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_multiply_maxplus() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);

        let c = multiply(&a, &b, &MaxPlus).unwrap();

        // C[0,0] = max(1+1, 2+3, 3+5) = 8
        // C[0,1] = max(1+2, 2+4, 3+6) = 9
        // C[1,0] = max(4+1, 5+3, 6+5) = 11
        // C[1,1] = max(4+2, 5+4, 6+6) = 12
        assert_eq!(c, m(&[&[8.0, 9.0], &[11.0, 12.0]]));
    }

    #[test]
    fn test_multiply_minplus() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);

        let c = multiply(&a, &b, &MinPlus).unwrap();

        // C[0,0] = min(1+1, 2+3, 3+5) = 2
        // C[1,1] = min(4+2, 5+4, 6+6) = 6
        assert_eq!(c, m(&[&[2.0, 3.0], &[5.0, 6.0]]));
    }

    #[test]
    fn test_multiply_maxtimes() {
        let a = m(&[&[2.0, 3.0], &[4.0, 5.0]]);
        let b = m(&[&[1.0, 2.0], &[3.0, 4.0]]);

        let c = multiply(&a, &b, &MaxTimes).unwrap();

        // C[0,0] = max(2*1, 3*3) = 9
        // C[1,1] = max(4*2, 5*4) = 20
        assert_eq!(c, m(&[&[9.0, 12.0], &[15.0, 20.0]]));
    }

    #[test]
    fn test_multiply_mintimes_skips_zero() {
        let inf = f64::INFINITY;
        let a = m(&[&[2.0, inf], &[inf, inf]]);
        let b = m(&[&[3.0, inf], &[0.5, 4.0]]);

        let c = multiply(&a, &b, &MinTimes).unwrap();

        // row 1 of A is all zero (+∞), so row 1 of C is zero
        assert_eq!(c, m(&[&[6.0, inf], &[inf, inf]]));
    }

    #[test]
    fn test_multiply_skips_absorbing_terms() {
        // -∞ + +∞ would be NaN if the term were evaluated
        let a = m(&[&[Z, 1.0]]);
        let b = Matrix::column_vector(&[f64::INFINITY, 2.0]).unwrap();
        let c = multiply(&a, &b, &MaxPlus).unwrap();
        assert_eq!(c[(0, 0)], 3.0);

        let all_zero = m(&[&[Z, Z]]);
        let c = multiply(&all_zero, &b, &MaxPlus).unwrap();
        assert_eq!(c[(0, 0)], Z);
    }

    #[test]
    fn test_multiply_maxtimes_overflow_is_domain_error() {
        // 1e200 * 1e200 overflows to +∞
        let a = m(&[&[1e200, 1.0], &[1.0, 1.0]]);
        assert!(matches!(
            multiply(&a, &a, &MaxTimes),
            Err(TropicalError::Domain { semiring: "max-times", .. })
        ));

        let huge = m(&[&[1e200, 1.0]]);
        assert!(matches!(
            scalar_multiply(&huge, 1e200, &MaxTimes),
            Err(TropicalError::Domain { .. })
        ));
    }

    #[test]
    fn test_multiply_mintimes_underflow_is_domain_error() {
        // 1e-200 * 1e-200 underflows to 0, which min-times excludes
        let a = m(&[&[1e-200, 1.0], &[1.0, 1.0]]);
        let err = multiply(&a, &a, &MinTimes).unwrap_err();
        assert_eq!(
            err,
            TropicalError::Domain {
                semiring: "min-times",
                value: 0.0
            }
        );
    }

    #[test]
    fn test_multiply_shape_mismatch() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        assert!(matches!(
            multiply(&a, &b, &MaxPlus),
            Err(TropicalError::Shape(_))
        ));
    }

    #[test]
    fn test_multiply_scalar_redirect() {
        let a = m(&[&[1.0, 2.0], &[Z, 4.0]]);
        let scalar = Matrix::scalar(3.0);

        let left = multiply(&scalar, &a, &MaxPlus).unwrap();
        let right = multiply(&a, &scalar, &MaxPlus).unwrap();

        assert_eq!(left, m(&[&[4.0, 5.0], &[Z, 7.0]]));
        assert_eq!(left, right);
    }

    #[test]
    fn test_scalar_multiply() {
        let a = m(&[&[1.0, Z], &[0.0, -2.0]]);

        let c = scalar_multiply(&a, 2.0, &MaxPlus).unwrap();
        assert_eq!(c, m(&[&[3.0, Z], &[2.0, 0.0]]));

        // zero scalar short-circuits to the zero matrix
        let c = scalar_multiply(&a, Z, &MaxPlus).unwrap();
        assert_eq!(c, zero_matrix(2, 2, &MaxPlus).unwrap());

        assert!(scalar_multiply(&a, -1.0, &MaxTimes).is_err());
    }

    #[test]
    fn test_add() {
        let a = m(&[&[1.0, Z], &[Z, 4.0]]);
        let b = m(&[&[3.0, 2.0], &[Z, 0.0]]);

        let c = add(&a, &b, &MaxPlus).unwrap();
        assert_eq!(c, m(&[&[3.0, 2.0], &[Z, 4.0]]));

        // -∞ is not a min-plus element
        assert!(matches!(add(&a, &b, &MinPlus), Err(TropicalError::Domain { .. })));

        let inf = f64::INFINITY;
        let a = m(&[&[1.0, inf], &[inf, 4.0]]);
        let b = m(&[&[3.0, 2.0], &[inf, 0.0]]);
        let c = add(&a, &b, &MinPlus).unwrap();
        assert_eq!(c, m(&[&[1.0, 2.0], &[inf, 0.0]]));

        let wrong = m(&[&[1.0, 2.0]]);
        assert!(matches!(add(&a, &wrong, &MaxPlus), Err(TropicalError::Shape(_))));
    }

    #[test]
    fn test_pseudo_inverse() {
        let v = Matrix::column_vector(&[1.0, Z, -3.0]).unwrap();
        let pi = pseudo_inverse(&v, &MaxPlus);
        assert_eq!(pi, Matrix::row_vector(&[-1.0, Z, 3.0]).unwrap());
        assert_eq!(pseudo_inverse(&pi, &MaxPlus), v);

        let w = m(&[&[2.0, 4.0], &[0.5, 1.0]]);
        let pi = pseudo_inverse(&w, &MaxTimes);
        assert_eq!(pi, m(&[&[0.5, 2.0], &[0.25, 1.0]]));
    }

    #[test]
    fn test_identity_and_zero() {
        let i = identity_matrix(3, &MaxPlus).unwrap();
        assert_eq!(i, m(&[&[0.0, Z, Z], &[Z, 0.0, Z], &[Z, Z, 0.0]]));

        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(multiply(&i, &a, &MaxPlus).unwrap(), a);
        assert_eq!(multiply(&a, &i, &MaxPlus).unwrap(), a);

        let i = identity_matrix(2, &MaxTimes).unwrap();
        assert_eq!(i, m(&[&[1.0, 0.0], &[0.0, 1.0]]));

        let z = zero_matrix(2, 3, &MinPlus).unwrap();
        assert!(z.as_slice().iter().all(|v| *v == f64::INFINITY));
        assert_eq!(z.shape(), (2, 3));

        assert!(identity_matrix(0, &MaxPlus).is_err());
    }

    #[test]
    fn test_vector_of_ones() {
        let v = vector_of_ones(5, &MinPlus).unwrap();
        assert_eq!(v, Matrix::column_vector(&[0.0; 5]).unwrap());
        let v = vector_of_ones(2, &MaxTimes).unwrap();
        assert_eq!(v, Matrix::column_vector(&[1.0, 1.0]).unwrap());
    }

    #[test]
    fn test_matrix_powers() {
        let a = m(&[&[2.0, 1.0, Z], &[5.0, 2.0, -1.0], &[3.0, 0.0, 1.0]]);

        let powers = matrix_powers(&a, 3, &MaxPlus, false).unwrap();
        assert_eq!(powers.len(), 3);
        assert_eq!(powers.power(1), Some(&a));
        assert!(powers.power(0).is_none());
        // A² = [[6,3,0],[7,6,1],[5,4,2]]
        assert_eq!(
            powers.power(2).unwrap(),
            &m(&[&[6.0, 3.0, 0.0], &[7.0, 6.0, 1.0], &[5.0, 4.0, 2.0]])
        );
        // A³ = [[8,7,2],[11,8,5],[9,6,3]]
        assert_eq!(
            powers.power(3).unwrap(),
            &m(&[&[8.0, 7.0, 2.0], &[11.0, 8.0, 5.0], &[9.0, 6.0, 3.0]])
        );

        let with_identity = matrix_powers(&a, 2, &MaxPlus, true).unwrap();
        assert_eq!(with_identity.len(), 3);
        assert_eq!(with_identity.iter().next(), Some(&identity_matrix(3, &MaxPlus).unwrap()));

        let extended = with_identity.extended(3, &MaxPlus).unwrap();
        assert_eq!(extended.highest(), 3);
        assert_eq!(extended.power(3), powers.power(3));
    }

    #[test]
    fn test_matrix_powers_errors() {
        let a = m(&[&[1.0, 2.0]]);
        assert!(matches!(
            matrix_powers(&a, 2, &MaxPlus, false),
            Err(TropicalError::Shape(_))
        ));
        let b = m(&[&[1.0]]);
        assert!(matches!(
            matrix_powers(&b, 0, &MaxPlus, false),
            Err(TropicalError::Configuration(_))
        ));
    }
}
