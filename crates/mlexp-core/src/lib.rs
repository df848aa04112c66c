//! # mlexp Core Library
//!
//! Fixed-size molecular descriptors and kernel ridge regression for predicting scalar
//! properties (formation energies) of small molecules from their 3D geometry.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`), immutable lookup
//!   tables, XYZ/dataset I/O, the descriptor builders (Coulomb, Lennard-Jones, adjacency,
//!   Bag-of-Bonds) and the numerical kernels and Cholesky solver.
//!
//! - **[`engine`]: The Plumbing.** Configuration and builders, the error taxonomy,
//!   progress reporting, train/test splitting and batch descriptor generation over a dataset.
//!
//! - **[`workflows`]: The Public API.** Complete procedures: a single kernel ridge
//!   regression run and the multi-descriptor benchmark.

pub mod core;
pub mod engine;
pub mod workflows;
