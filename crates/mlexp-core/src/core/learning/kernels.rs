use crate::core::descriptors::{Descriptor, ParseOptionError};
use nalgebra::DMatrix;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    #[error("Kernel input set '{set}' is empty")]
    EmptySet { set: &'static str },

    #[error("Kernel width must be positive and finite, got {sigma}")]
    InvalidSigma { sigma: f64 },

    #[error("Descriptor {index} of set '{set}' has {found} values, expected {expected}")]
    ShapeMismatch {
        set: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelKind {
    #[default]
    Gaussian,
    Laplacian,
    Wasserstein,
}

impl KernelKind {
    /// Similarity of two equally long value slices.
    #[inline]
    pub fn evaluate(&self, a: &[f64], b: &[f64], sigma: f64) -> f64 {
        match self {
            KernelKind::Gaussian => gaussian_kernel(a, b, sigma),
            KernelKind::Laplacian => laplacian_kernel(a, b, sigma),
            KernelKind::Wasserstein => wasserstein_kernel(a, b, sigma),
        }
    }
}

impl FromStr for KernelKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(KernelKind::Gaussian),
            "laplacian" => Ok(KernelKind::Laplacian),
            "wasserstein" => Ok(KernelKind::Wasserstein),
            _ => Err(ParseOptionError {
                kind: "kernel",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelKind::Gaussian => "gaussian",
            KernelKind::Laplacian => "laplacian",
            KernelKind::Wasserstein => "wasserstein",
        };
        f.write_str(name)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// `exp(-‖a − b‖² / (2σ²))`
pub fn gaussian_kernel(a: &[f64], b: &[f64], sigma: f64) -> f64 {
    (-squared_distance(a, b) / (2.0 * sigma * sigma)).exp()
}

/// `exp(-‖a − b‖ / (2σ))`
pub fn laplacian_kernel(a: &[f64], b: &[f64], sigma: f64) -> f64 {
    (-squared_distance(a, b).sqrt() / (2.0 * sigma)).exp()
}

/// `exp(-W₁(a, b) / σ)`, with W₁ the 1-D earth mover's distance between the two value
/// distributions: the mean absolute difference of the sorted values.
pub fn wasserstein_kernel(a: &[f64], b: &[f64], sigma: f64) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let mut sorted_a = a.to_vec();
    let mut sorted_b = b.to_vec();
    sorted_a.sort_by(f64::total_cmp);
    sorted_b.sort_by(f64::total_cmp);
    let w1 = sorted_a
        .iter()
        .zip(&sorted_b)
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64;
    (-w1 / sigma).exp()
}

fn check_set(set: &'static str, descriptors: &[Descriptor], expected: usize) -> Result<(), KernelError> {
    if descriptors.is_empty() {
        return Err(KernelError::EmptySet { set });
    }
    match descriptors.iter().position(|d| d.len() != expected) {
        Some(index) => Err(KernelError::ShapeMismatch {
            set,
            index,
            expected,
            found: descriptors[index].len(),
        }),
        None => Ok(()),
    }
}

/// `K[i, j] = kernel(x1[i], x2[j])`, an `|x1|`×`|x2|` matrix.
///
/// All descriptors of both sets must have the same number of values. Rows are computed
/// in parallel with the `parallel` feature.
pub fn kernel_matrix(
    kind: KernelKind,
    x1: &[Descriptor],
    x2: &[Descriptor],
    sigma: f64,
) -> Result<DMatrix<f64>, KernelError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(KernelError::InvalidSigma { sigma });
    }
    let expected = x1.first().map(Descriptor::len).unwrap_or(0);
    check_set("x1", x1, expected)?;
    check_set("x2", x2, expected)?;

    #[cfg(not(feature = "parallel"))]
    let iterator = x1.iter();

    #[cfg(feature = "parallel")]
    let iterator = x1.par_iter();

    let rows: Vec<Vec<f64>> = iterator
        .map(|a| {
            x2.iter()
                .map(|b| kind.evaluate(a.values(), b.values(), sigma))
                .collect()
        })
        .collect();

    Ok(DMatrix::from_row_iterator(
        x1.len(),
        x2.len(),
        rows.into_iter().flatten(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    const TOLERANCE: f64 = 1e-12;

    fn vector(values: &[f64]) -> Descriptor {
        Descriptor::Vector(DVector::from_row_slice(values))
    }

    fn samples() -> Vec<Descriptor> {
        vec![
            vector(&[1.0, 2.0, 3.0]),
            vector(&[0.5, -1.0, 4.0]),
            vector(&[3.0, 3.0, 0.0]),
            vector(&[-2.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn gaussian_matches_closed_form() {
        // ‖a − b‖² = 9 + 16 = 25
        let value = gaussian_kernel(&[0.0, 0.0], &[3.0, 4.0], 2.0);
        assert!((value - (-25.0f64 / 8.0).exp()).abs() < TOLERANCE);
    }

    #[test]
    fn laplacian_uses_unsquared_norm() {
        let value = laplacian_kernel(&[0.0, 0.0], &[3.0, 4.0], 2.0);
        assert!((value - (-5.0f64 / 4.0).exp()).abs() < TOLERANCE);
    }

    #[test]
    fn wasserstein_compares_sorted_value_distributions() {
        // Same values in a different order are at distance zero.
        assert_eq!(wasserstein_kernel(&[3.0, 1.0, 2.0], &[1.0, 2.0, 3.0], 1.0), 1.0);
        // Sorted: [0, 1] vs [2, 3] -> W1 = 2.
        let value = wasserstein_kernel(&[1.0, 0.0], &[2.0, 3.0], 4.0);
        assert!((value - (-0.5f64).exp()).abs() < TOLERANCE);
    }

    #[test]
    fn gaussian_kernel_matrix_is_symmetric_with_unit_diagonal() {
        let x = samples();
        let k = kernel_matrix(KernelKind::Gaussian, &x, &x, 2.5).unwrap();
        assert_eq!(k.shape(), (4, 4));
        for i in 0..4 {
            assert!((k[(i, i)] - 1.0).abs() < TOLERANCE);
            for j in 0..4 {
                assert!((k[(i, j)] - k[(j, i)]).abs() < TOLERANCE);
                assert!(k[(i, j)] > 0.0 && k[(i, j)] <= 1.0);
            }
        }
    }

    #[test]
    fn every_kernel_has_unit_diagonal() {
        let x = samples();
        for kind in [KernelKind::Laplacian, KernelKind::Wasserstein] {
            let k = kernel_matrix(kind, &x, &x, 1.0).unwrap();
            for i in 0..4 {
                assert_eq!(k[(i, i)], 1.0);
            }
        }
    }

    #[test]
    fn rectangular_matrix_pairs_rows_of_x1_with_columns_of_x2() {
        let x = samples();
        let k = kernel_matrix(KernelKind::Laplacian, &x[..1], &x[1..], 3.0).unwrap();
        assert_eq!(k.shape(), (1, 3));
        let expected = laplacian_kernel(x[0].values(), x[3].values(), 3.0);
        assert_eq!(k[(0, 2)], expected);
    }

    #[test]
    fn matrix_and_vector_descriptors_mix_through_their_values() {
        let matrix = Descriptor::Matrix(nalgebra::DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]));
        let k = kernel_matrix(KernelKind::Gaussian, &[matrix], &samples()[..1], 1.0).unwrap();
        assert_eq!(k[(0, 0)], 1.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let x = samples();
        assert_eq!(
            kernel_matrix(KernelKind::Gaussian, &x, &x, 0.0),
            Err(KernelError::InvalidSigma { sigma: 0.0 })
        );
        assert!(matches!(
            kernel_matrix(KernelKind::Gaussian, &x, &x, f64::NAN),
            Err(KernelError::InvalidSigma { .. })
        ));
        assert_eq!(
            kernel_matrix(KernelKind::Gaussian, &[], &x, 1.0),
            Err(KernelError::EmptySet { set: "x1" })
        );
        assert_eq!(
            kernel_matrix(KernelKind::Gaussian, &x, &[], 1.0),
            Err(KernelError::EmptySet { set: "x2" })
        );

        let mut uneven = samples();
        uneven.push(vector(&[1.0, 2.0]));
        assert_eq!(
            kernel_matrix(KernelKind::Gaussian, &x, &uneven, 1.0),
            Err(KernelError::ShapeMismatch {
                set: "x2",
                index: 4,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn kernel_kind_parses_names() {
        assert_eq!("Gaussian".parse::<KernelKind>().unwrap(), KernelKind::Gaussian);
        assert_eq!("laplacian".parse::<KernelKind>().unwrap(), KernelKind::Laplacian);
        assert_eq!(
            "wasserstein".parse::<KernelKind>().unwrap(),
            KernelKind::Wasserstein
        );
        assert!("polynomial".parse::<KernelKind>().is_err());
        assert_eq!(KernelKind::Laplacian.to_string(), "laplacian");
    }
}
