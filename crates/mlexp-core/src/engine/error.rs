use thiserror::Error;

use super::config::ConfigError;
use crate::core::descriptors::DescriptorError;
use crate::core::io::dataset::DatasetError;
use crate::core::learning::cholesky::SolverError;
use crate::core::learning::kernels::KernelError;

/// A molecule whose descriptor could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeFailure {
    pub molecule: String,
    pub error: DescriptorError,
}

fn summarize(failures: &[MoleculeFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("'{}': {}", f.molecule, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Got {descriptors} descriptors but {labels} labels")]
    SizeMismatch { descriptors: usize, labels: usize },

    #[error(
        "Invalid split: training size {training_size} and test size {test_size:?} do not fit {available} entries"
    )]
    InvalidSplit {
        training_size: usize,
        test_size: Option<usize>,
        available: usize,
    },

    #[error("Descriptor failed for molecule '{molecule}': {source}")]
    Descriptor {
        molecule: String,
        source: DescriptorError,
    },

    #[error("Descriptor generation failed for {} molecule(s): {}", .failures.len(), summarize(.failures))]
    BatchFailed { failures: Vec<MoleculeFailure> },

    #[error("Kernel evaluation failed: {source}")]
    Kernel {
        #[from]
        source: KernelError,
    },

    #[error("Linear solve failed: {source}")]
    Solver {
        #[from]
        source: SolverError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Dataset error: {source}")]
    Dataset {
        #[from]
        source: DatasetError,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write results to '{path}': {source}")]
    Output { path: String, source: csv::Error },
}
