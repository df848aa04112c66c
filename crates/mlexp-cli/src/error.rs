use crate::utils::parser::ParseError;
use mlexp::core::io::xyz::XyzError;
use mlexp::core::tables::TableLoadError;
use mlexp::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to load lookup table: {0}")]
    Table(#[from] TableLoadError),

    #[error("Failed to read molecule: {0}")]
    Molecule(#[from] XyzError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Config(e.to_string())
    }
}
