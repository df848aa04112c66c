use nalgebra::{DMatrix, DVector};

/// Moves every zero entry to the tail while keeping the relative order of the
/// non-zero entries (a stable partition). `-0.0` counts as zero.
pub fn compact_zeros(values: Vec<f64>) -> Vec<f64> {
    let (mut non_zero, zeros): (Vec<f64>, Vec<f64>) =
        values.into_iter().partition(|v| *v != 0.0);
    non_zero.extend(zeros.into_iter().map(|_| 0.0));
    non_zero
}

/// Eigenvalue spectrum of a padded matrix, of length `matrix.nrows()`.
///
/// Only the leading `count`×`count` block is decomposed: the zero padding contributes
/// exact zero eigenvalues, which are appended instead of being recovered numerically.
/// The values are sorted descending and then zero-compacted, so negative eigenvalues sit
/// in front of the padding.
///
/// The block is symmetrized first; for already symmetric input this is a no-op.
pub fn sorted_eigenvalues(matrix: &DMatrix<f64>, count: usize) -> DVector<f64> {
    let size = matrix.nrows();
    let count = count.min(size);

    let mut values: Vec<f64> = if count == 0 {
        Vec::new()
    } else {
        let block = matrix.view((0, 0), (count, count)).into_owned();
        let symmetric = (&block + block.transpose()) * 0.5;
        symmetric.symmetric_eigenvalues().iter().copied().collect()
    };
    values.resize(size, 0.0);
    values.sort_by(|a, b| b.total_cmp(a));

    DVector::from_vec(compact_zeros(values))
}

/// Reorders rows and columns by descending row L2 norm. Ties keep their original order.
pub fn sort_by_row_norm(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let norms: Vec<f64> = matrix.row_iter().map(|row| row.norm()).collect();
    let mut order: Vec<usize> = (0..matrix.nrows()).collect();
    order.sort_by(|&a, &b| norms[b].total_cmp(&norms[a]));

    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        matrix[(order[i], order[j])]
    })
}

pub fn flatten_row_major(matrix: &DMatrix<f64>) -> DVector<f64> {
    let cols = matrix.ncols();
    DVector::from_fn(matrix.len(), |idx, _| matrix[(idx / cols, idx % cols)])
}
