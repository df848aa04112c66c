//! # Core Module
//!
//! Fundamental building blocks: molecular models, lookup tables, file I/O, descriptor
//! construction and the learning primitives (kernels, linear solvers).
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms and molecules
//! - **Lookup Tables** ([`tables`]) - Nuclear charges and bond-distance windows
//! - **File I/O** ([`io`]) - XYZ geometries and labelled datasets
//! - **Descriptors** ([`descriptors`]) - Fixed-size numeric encodings of molecules
//! - **Learning** ([`learning`]) - Kernel functions and Cholesky-based solvers
//! - **Utilities** ([`utils`]) - Geometry helpers
//!
//! Everything in this module is synchronous and free of shared mutable state; the
//! parallel fan-out lives in [`crate::engine`].

pub mod descriptors;
pub mod io;
pub mod learning;
pub mod models;
pub mod tables;
pub mod utils;
