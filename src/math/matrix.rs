use std::ops::{Index, IndexMut};

/// Dense `f64` matrix stored as one flat row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer. Returns `None` when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Matrix> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Matrix { rows, cols, data })
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

    /// Row-major view of every entry.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Overwrites every entry, in row-major order, with successive values of `source`.
    pub fn fill_with<F>(&mut self, mut source: F)
    where
        F: FnMut() -> f64,
    {
        for x in self.data.iter_mut() {
            *x = source();
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for x in self.data.iter_mut() {
            *x *= factor;
        }
    }

    /// Square root of the sum of squared entries.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Row vector times matrix: `vᵀ · self`, giving a vector of length `cols`.
    ///
    /// # Panics
    /// Panics if `v.len() != rows`.
    pub fn pre_multiply(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.rows, "vector length must match row count");
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in v.iter().enumerate() {
            for (acc, &w) in res.iter_mut().zip(self.row(row)) {
                *acc += scale * w;
            }
        }
        res
    }

    /// Matrix times column vector: `self · v`, giving a vector of length `rows`.
    ///
    /// # Panics
    /// Panics if `v.len() != cols`.
    pub fn multiply(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.cols, "vector length must match column count");
        (0..self.rows)
            .map(|row| self.row(row).iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// In-place `self -= rate * (u ⊗ v)` where `u ⊗ v` is the outer product.
    ///
    /// # Panics
    /// Panics if `u.len() != rows` or `v.len() != cols`.
    pub fn sub_scaled_outer(&mut self, u: &[f64], v: &[f64], rate: f64) {
        assert_eq!(u.len(), self.rows, "outer product rows mismatch");
        assert_eq!(v.len(), self.cols, "outer product cols mismatch");
        for (row, &ui) in self.data.chunks_exact_mut(self.cols).zip(u) {
            for (w, &vj) in row.iter_mut().zip(v) {
                *w -= rate * ui * vj;
            }
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &mut self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Matrix {
        // 2x3
        Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn zeros_has_requested_shape() {
        let m = Matrix::zeros(3, 4);
        assert_eq!(m.shape(), (3, 4));
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn indexing_is_row_major() {
        let m = sample();
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn pre_multiply_is_row_vector_product() {
        let m = sample();
        assert_eq!(m.pre_multiply(&[1.0, 1.0]), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn multiply_is_column_vector_product() {
        let m = sample();
        assert_eq!(m.multiply(&[1.0, 0.0, 1.0]), vec![4.0, 10.0]);
    }

    #[test]
    fn frobenius_norm_of_known_matrix() {
        let m = Matrix::from_vec(2, 2, vec![3.0, 0.0, 0.0, 4.0]).unwrap();
        assert_relative_eq!(m.frobenius_norm(), 5.0);
    }

    #[test]
    fn sub_scaled_outer_updates_in_place() {
        let mut m = Matrix::zeros(2, 2);
        m.sub_scaled_outer(&[1.0, 2.0], &[3.0, 4.0], 0.5);
        assert_eq!(m.as_slice(), &[-1.5, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn fill_with_walks_row_major() {
        let mut m = Matrix::zeros(2, 2);
        let mut next = 0.0;
        m.fill_with(|| {
            next += 1.0;
            next
        });
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
    }
}
