//! Linear solves of `(K + λI)α = y` for symmetric positive-definite kernel matrices.

use crate::core::descriptors::ParseOptionError;
use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ridge added to the diagonal before factorization.
pub const DEFAULT_RIDGE: f64 = 1e-8;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Right-hand side has {found} entries, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Matrix is not positive definite (Cholesky factorization failed)")]
    NotPositiveDefinite,
}

/// Strategy for solving the regularized kernel system.
pub trait LinearSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, k: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolverError>;
}

/// Cholesky factorization followed by explicit forward and back substitution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CholeskySubstitution {
    pub ridge: f64,
}

impl Default for CholeskySubstitution {
    fn default() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
        }
    }
}

impl LinearSolver for CholeskySubstitution {
    fn name(&self) -> &'static str {
        "cholesky-substitution"
    }

    fn solve(&self, k: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        cholesky_solve(k, y, self.ridge)
    }
}

/// Cholesky factorization and solve delegated entirely to nalgebra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NalgebraCholesky {
    pub ridge: f64,
}

impl Default for NalgebraCholesky {
    fn default() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
        }
    }
}

impl LinearSolver for NalgebraCholesky {
    fn name(&self) -> &'static str {
        "nalgebra-cholesky"
    }

    fn solve(&self, k: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        let regularized = regularize(k, y, self.ridge)?;
        let factor = regularized
            .cholesky()
            .ok_or(SolverError::NotPositiveDefinite)?;
        Ok(factor.solve(y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolverKind {
    #[default]
    CholeskySubstitution,
    NalgebraCholesky,
}

impl SolverKind {
    pub fn build(self, ridge: f64) -> Box<dyn LinearSolver> {
        match self {
            SolverKind::CholeskySubstitution => Box::new(CholeskySubstitution { ridge }),
            SolverKind::NalgebraCholesky => Box::new(NalgebraCholesky { ridge }),
        }
    }
}

impl FromStr for SolverKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cholesky" | "cholesky-substitution" => Ok(SolverKind::CholeskySubstitution),
            "nalgebra" | "nalgebra-cholesky" => Ok(SolverKind::NalgebraCholesky),
            _ => Err(ParseOptionError {
                kind: "solver",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverKind::CholeskySubstitution => "cholesky",
            SolverKind::NalgebraCholesky => "nalgebra",
        };
        f.write_str(name)
    }
}

fn regularize(
    k: &DMatrix<f64>,
    y: &DVector<f64>,
    ridge: f64,
) -> Result<DMatrix<f64>, SolverError> {
    let (rows, cols) = k.shape();
    if rows != cols {
        return Err(SolverError::NotSquare { rows, cols });
    }
    if y.len() != rows {
        return Err(SolverError::LengthMismatch {
            expected: rows,
            found: y.len(),
        });
    }
    let mut regularized = k.clone();
    for i in 0..rows {
        regularized[(i, i)] += ridge;
    }
    Ok(regularized)
}

/// Solves `(K + ridge·I)α = y`.
///
/// The lower factor `L` comes from nalgebra; `Lx = y` and then `Lᵀα = x` are solved by
/// substitution. A failed factorization is fatal, there is no retry with a larger ridge.
pub fn cholesky_solve(
    k: &DMatrix<f64>,
    y: &DVector<f64>,
    ridge: f64,
) -> Result<DVector<f64>, SolverError> {
    let regularized = regularize(k, y, ridge)?;
    let l = regularized
        .cholesky()
        .ok_or(SolverError::NotPositiveDefinite)?
        .unpack();

    let x = forward_substitution(&l, y);
    Ok(back_substitution(&l, &x))
}

/// Solves `Lx = y` for lower-triangular `L`, rows `0..n`.
pub fn forward_substitution(l: &DMatrix<f64>, y: &DVector<f64>) -> DVector<f64> {
    let n = y.len();
    let mut x = DVector::zeros(n);
    for i in 0..n {
        let mut acc = 0.0;
        for j in 0..i {
            acc += l[(i, j)] * x[j];
        }
        x[i] = (y[i] - acc) / l[(i, i)];
    }
    x
}

/// Solves `Lᵀα = x` for lower-triangular `L`, rows `n−1` down to `0`.
pub fn back_substitution(l: &DMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = x.len();
    let mut alpha = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut acc = 0.0;
        for j in (i + 1)..n {
            // Lᵀ[i, j] = L[j, i]
            acc += l[(j, i)] * alpha[j];
        }
        alpha[i] = (x[i] - acc) / l[(i, i)];
    }
    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_spd(rng: &mut StdRng, n: usize) -> DMatrix<f64> {
        let a = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
        &a * a.transpose() + DMatrix::identity(n, n) * n as f64
    }

    fn random_vector(rng: &mut StdRng, n: usize) -> DVector<f64> {
        DVector::from_fn(n, |_, _| rng.gen_range(-10.0..10.0))
    }

    #[test]
    fn solves_random_spd_systems() {
        let mut rng = StdRng::seed_from_u64(111);
        for n in 2..=50 {
            let k = random_spd(&mut rng, n);
            let y = random_vector(&mut rng, n);

            let alpha = cholesky_solve(&k, &y, 0.0).unwrap();
            let residual = (&k * &alpha - &y).amax();
            assert!(residual < 1e-8, "n = {n}: residual {residual}");
        }
    }

    #[test]
    fn both_solvers_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let k = random_spd(&mut rng, 12);
        let y = random_vector(&mut rng, 12);

        let explicit = CholeskySubstitution::default().solve(&k, &y).unwrap();
        let library = NalgebraCholesky::default().solve(&k, &y).unwrap();
        assert!((explicit - library).amax() < 1e-10);
    }

    #[test]
    fn substitution_steps_invert_a_known_factor() {
        let l = DMatrix::from_row_slice(3, 3, &[2.0, 0.0, 0.0, 1.0, 3.0, 0.0, -1.0, 2.0, 4.0]);
        let y = DVector::from_vec(vec![4.0, 11.0, 15.0]);

        let x = forward_substitution(&l, &y);
        assert_eq!(x, DVector::from_vec(vec![2.0, 3.0, 2.75]));
        assert!((&l * &x - &y).amax() < 1e-12);

        let alpha = back_substitution(&l, &x);
        assert!((l.transpose() * &alpha - &x).amax() < 1e-12);
    }

    #[test]
    fn ridge_regularizes_a_singular_kernel() {
        let k = DMatrix::from_element(3, 3, 1.0);
        let y = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        assert!(cholesky_solve(&k, &y, DEFAULT_RIDGE).is_ok());
    }

    #[test]
    fn indefinite_matrix_is_rejected() {
        let k = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let y = DVector::from_vec(vec![1.0, 1.0]);
        assert_eq!(
            cholesky_solve(&k, &y, DEFAULT_RIDGE),
            Err(SolverError::NotPositiveDefinite)
        );
        assert_eq!(
            NalgebraCholesky::default().solve(&k, &y),
            Err(SolverError::NotPositiveDefinite)
        );
    }

    #[test]
    fn shape_errors_are_reported() {
        let y = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(
            cholesky_solve(&DMatrix::zeros(2, 3), &y, DEFAULT_RIDGE),
            Err(SolverError::NotSquare { rows: 2, cols: 3 })
        );
        assert_eq!(
            cholesky_solve(&DMatrix::identity(3, 3), &y, DEFAULT_RIDGE),
            Err(SolverError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn solver_kind_parses_and_builds() {
        assert_eq!(
            "cholesky".parse::<SolverKind>().unwrap(),
            SolverKind::CholeskySubstitution
        );
        let solver = "NALGEBRA".parse::<SolverKind>().unwrap().build(1e-6);
        assert_eq!(solver.name(), "nalgebra-cholesky");
        assert!("lu".parse::<SolverKind>().is_err());
    }
}
