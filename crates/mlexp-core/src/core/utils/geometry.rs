use nalgebra::{DMatrix, Point3};

/// Atoms closer than this (Å) are treated as sitting on the same point.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-12;

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Symmetric matrix of all pairwise distances, zero on the diagonal.
pub fn distance_matrix(positions: &[Point3<f64>]) -> DMatrix<f64> {
    let n = positions.len();
    let mut distances = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance(&positions[i], &positions[j]);
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }
    distances
}

/// First index pair (i < j) of points that coincide within `tolerance`.
pub fn find_coincident(positions: &[Point3<f64>], tolerance: f64) -> Option<(usize, usize)> {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if distance(&positions[i], &positions[j]) <= tolerance {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn distance_is_euclidean_norm() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 2.0, 2.0);
        assert!((distance(&a, &b) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 4.0),
        ];
        let d = distance_matrix(&positions);
        assert_eq!(d.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(d[(i, i)], 0.0);
            for j in 0..3 {
                assert_eq!(d[(i, j)], d[(j, i)]);
            }
        }
        assert!((d[(0, 2)] - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn find_coincident_reports_first_overlapping_pair() {
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        assert_eq!(find_coincident(&positions, 1e-8), Some((1, 2)));
        assert_eq!(find_coincident(&positions[..2], 1e-8), None);
    }

    #[test]
    fn coincidence_tolerance_only_catches_overlapping_atoms() {
        let overlapping = [Point3::new(0.0, 0.0, 0.0), Point3::new(1e-13, 0.0, 0.0)];
        assert_eq!(
            find_coincident(&overlapping, COINCIDENCE_TOLERANCE),
            Some((0, 1))
        );
        let close = [Point3::new(0.0, 0.0, 0.0), Point3::new(1e-9, 0.0, 0.0)];
        assert_eq!(find_coincident(&close, COINCIDENCE_TOLERANCE), None);
    }
}
