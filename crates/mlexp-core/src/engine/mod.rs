//! # Engine Module
//!
//! Plumbing shared by the workflows: configuration, errors, progress reporting, the
//! train/test split and batch descriptor generation over many molecules.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Descriptor, regression and benchmark settings with builders
//! - **Error Handling** ([`error`]) - The engine error taxonomy wrapping the core errors
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Splitting** ([`split`]) - Training prefix and test suffix of a dataset
//! - **Batch Generation** ([`batch`]) - One descriptor per molecule, in parallel with the
//!   `parallel` feature
//!
//! Batch generation joins every per-molecule result before returning, so a failure is
//! reported together with all other failures of the same batch and never leaves a
//! partially filled descriptor set behind.

pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
pub mod split;
