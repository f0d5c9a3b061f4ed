//! A small dense row-major matrix.
//!
//! Only what the planner needs: element access, column slices for path
//! effects, and matrix-vector products. Out-of-range reads return zero and
//! out-of-range writes are ignored, so callers never index-panic.

/// Dense `rows x cols` matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    /// Row-major storage, `rows * cols` long.
    data: Vec<f64>,
}

impl Matrix {
    /// A matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows.saturating_mul(cols)],
        }
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row.saturating_mul(self.cols).saturating_add(col))
    }

    /// Element at `(row, col)`, zero when out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.offset(row, col)
            .and_then(|i| self.data.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Add `value` to the element at `(row, col)`.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if let Some(slot) = self.offset(row, col).and_then(|i| self.data.get_mut(i)) {
            *slot += value;
        }
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row.saturating_mul(self.cols);
        self.data
            .get(start..start.saturating_add(self.cols))
            .unwrap_or(&[])
    }

    /// One column, copied out.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// `self @ x`; missing entries of `x` count as zero.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        (0..self.rows)
            .map(|row| dot(self.row(row), x))
            .collect()
    }

    /// `self @ x` with every element passed through `f` first.
    pub fn mul_vec_with(&self, x: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
        (0..self.rows)
            .map(|row| self.row(row).iter().zip(x).map(|(a, b)| f(*a) * b).sum())
            .collect()
    }
}

/// Inner product over the shorter of the two slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_read_back() {
        let mut m = Matrix::zeros(2, 3);
        m.add(0, 1, 2.5);
        m.add(0, 1, -1.0);
        m.add(1, 2, 4.0);
        assert!((m.get(0, 1) - 1.5).abs() < 1e-12);
        assert_eq!(m.row(1), &[0.0, 0.0, 4.0]);
        assert_eq!(m.column(2), vec![0.0, 4.0]);
    }

    #[test]
    fn out_of_range_is_harmless() {
        let mut m = Matrix::zeros(1, 1);
        m.add(5, 5, 1.0);
        assert!(m.get(5, 5).abs() < f64::EPSILON);
        assert!(m.row(3).is_empty());
    }

    #[test]
    fn matrix_vector_product() {
        let mut m = Matrix::zeros(2, 2);
        m.add(0, 0, 1.0);
        m.add(0, 1, -2.0);
        m.add(1, 1, 3.0);
        assert_eq!(m.mul_vec(&[4.0, 1.0]), vec![2.0, 3.0]);
        assert_eq!(m.mul_vec_with(&[4.0, 1.0], |v| v.max(0.0)), vec![4.0, 3.0]);
    }
}
