//! Banded and dense square linear systems
use crate::{EPSILON, Scalar};
use std::{
    fmt,
    ops::{Index, IndexMut},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Error {
    /// Elimination hit a zero pivot at the given row
    SingularMatrix { pivot: usize },
    /// Right hand side (or band layout) does not match the matrix size
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}

impl std::error::Error for Error {}

/// Pivots at or below this magnitude (relative to the largest entry) are treated as zero
fn pivot_tolerance(entries: &[Scalar]) -> Scalar {
    let scale = entries.iter().fold(0.0, |acc: Scalar, v| acc.max(v.abs()));
    EPSILON * scale
}

/// Dense square matrix stored in row-major order
#[derive(Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<Scalar>,
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in 0..self.size {
            list.entry(&self.row(row));
        }
        list.finish()
    }
}

impl Matrix {
    /// Create `size x size` matrix filled with zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, row: usize) -> &[Scalar] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [Scalar] {
        &mut self.data[row * self.size..(row + 1) * self.size]
    }

    /// Solve `self * x = rhs` for `x` with gaussian elimination and partial pivoting
    pub fn solve(&self, rhs: &[Scalar]) -> Result<Vec<Scalar>, Error> {
        let n = self.size;
        if rhs.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: rhs.len(),
            });
        }
        let tolerance = pivot_tolerance(&self.data);
        let mut a = self.data.clone();
        let mut b = rhs.to_vec();

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|i, j| a[i * n + k].abs().total_cmp(&a[j * n + k].abs()))
                .unwrap_or(k);
            let pivot = a[pivot_row * n + k];
            if !(pivot.abs() > tolerance) {
                tracing::debug!("[solve:singular] dense pivot {}", k);
                return Err(Error::SingularMatrix { pivot: k });
            }
            if pivot_row != k {
                for j in k..n {
                    a.swap(k * n + j, pivot_row * n + j);
                }
                b.swap(k, pivot_row);
            }
            for i in k + 1..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                b[i] -= factor * b[k];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let sum: Scalar = (i + 1..n).map(|j| a[i * n + j] * x[j]).sum();
            x[i] = (b[i] - sum) / a[i * n + i];
        }
        Ok(x)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Scalar;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.size + col]
    }
}

/// Square matrix with `lower` sub-diagonals and `upper` super-diagonals
///
/// Stored in compact diagonal form with `lower + upper + 1` rows and `size` columns,
/// element `a[i, j]` of the matrix lives at `diag[upper + i - j][j]`:
/// ```text
///  *   a01 a12 a23     <- upper diagonal
///  a00 a11 a22 a33     <- main diagonal
///  a10 a21 a32 *       <- lower diagonals
///  a20 a31 *   *
/// ```
/// Entries marked with `*` fall outside of the matrix and are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedMatrix {
    lower: usize,
    upper: usize,
    size: usize,
    diag: Vec<Vec<Scalar>>,
}

impl BandedMatrix {
    /// Create banded matrix filled with zeros
    pub fn new(lower: usize, upper: usize, size: usize) -> Self {
        Self {
            lower,
            upper,
            size,
            diag: vec![vec![0.0; size]; lower + upper + 1],
        }
    }

    /// Create banded matrix from its compact diagonal form
    pub fn from_diag(lower: usize, upper: usize, diag: Vec<Vec<Scalar>>) -> Result<Self, Error> {
        if diag.len() != lower + upper + 1 {
            return Err(Error::DimensionMismatch {
                expected: lower + upper + 1,
                actual: diag.len(),
            });
        }
        let size = diag[0].len();
        if let Some(row) = diag.iter().find(|row| row.len() != size) {
            return Err(Error::DimensionMismatch {
                expected: size,
                actual: row.len(),
            });
        }
        Ok(Self {
            lower,
            upper,
            size,
            diag,
        })
    }

    pub fn lower(&self) -> usize {
        self.lower
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row of the compact form, `0` is the top-most super-diagonal
    pub fn band(&self, row: usize) -> &[Scalar] {
        &self.diag[row]
    }

    pub fn band_mut(&mut self, row: usize) -> &mut [Scalar] {
        &mut self.diag[row]
    }

    /// Element `a[row, col]` of the matrix, zero outside of the band
    pub fn get(&self, row: usize, col: usize) -> Scalar {
        if col > row + self.upper || row > col + self.lower {
            0.0
        } else {
            self.diag[self.upper + row - col][col]
        }
    }

    /// Expand into a dense matrix
    pub fn to_dense(&self) -> Matrix {
        diag_to_matrix((self.lower, self.upper), &self.diag)
    }

    /// Solve `self * x = rhs` for `x` in `O(size * lower * (lower + upper))`
    ///
    /// Gaussian elimination with partial pivoting restricted to the band. Row swaps
    /// can only move a row up by at most `lower` positions, so the upper band of the
    /// factorization grows to `lower + upper` diagonals.
    pub fn solve(&self, rhs: &[Scalar]) -> Result<Vec<Scalar>, Error> {
        let n = self.size;
        if rhs.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: rhs.len(),
            });
        }
        let (l, u) = (self.lower, self.upper);
        // row `i` keeps columns `i - l ..= i + l + u`
        let width = 2 * l + u + 1;
        let at = |row: usize, col: usize| row * width + col + l - row;

        let mut a = vec![0.0; n * width];
        for row in 0..n {
            for col in row.saturating_sub(l)..n.min(row + u + 1) {
                a[at(row, col)] = self.get(row, col);
            }
        }
        let tolerance = pivot_tolerance(&a);
        let mut b = rhs.to_vec();

        for k in 0..n {
            let last_row = (k + l).min(n - 1);
            let last_col = (k + l + u).min(n - 1);
            let pivot_row = (k..=last_row)
                .max_by(|i, j| a[at(*i, k)].abs().total_cmp(&a[at(*j, k)].abs()))
                .unwrap_or(k);
            let pivot = a[at(pivot_row, k)];
            if !(pivot.abs() > tolerance) {
                tracing::debug!("[solve:singular] banded pivot {}", k);
                return Err(Error::SingularMatrix { pivot: k });
            }
            if pivot_row != k {
                for col in k..=last_col {
                    a.swap(at(k, col), at(pivot_row, col));
                }
                b.swap(k, pivot_row);
            }
            for row in k + 1..=last_row {
                let factor = a[at(row, k)] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for col in k..=last_col {
                    a[at(row, col)] -= factor * a[at(k, col)];
                }
                b[row] -= factor * b[k];
            }
        }

        let mut x = vec![0.0; n];
        for row in (0..n).rev() {
            let last_col = (row + l + u).min(n - 1);
            let sum: Scalar = (row + 1..=last_col).map(|col| a[at(row, col)] * x[col]).sum();
            x[row] = (b[row] - sum) / a[at(row, row)];
        }
        Ok(x)
    }
}

/// Convert compact diagonal form of a banded matrix into a dense matrix
///
/// `diag` has `lower + upper + 1` rows with one entry per matrix column, row `r` holds
/// diagonal with offset `upper - r` (positive offsets are above the main diagonal).
pub fn diag_to_matrix((lower, upper): (usize, usize), diag: &[Vec<Scalar>]) -> Matrix {
    let size = diag.first().map_or(0, |row| row.len());
    let mut matrix = Matrix::zeros(size);
    for (r, band) in diag.iter().take(lower + upper + 1).enumerate() {
        for (col, value) in band.iter().enumerate().take(size) {
            // row index is `r + col - upper`, skip entries outside of the matrix
            if r + col < upper || r + col - upper >= size {
                continue;
            }
            matrix[(r + col - upper, col)] = *value;
        }
    }
    matrix
}
