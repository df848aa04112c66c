use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLennardJonesConfig {
    pub sigma: Option<f64>,
    pub epsilon: Option<f64>,
    /// Fixed value for every diagonal entry.
    pub diagonal: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDescriptorConfig {
    pub size: Option<usize>,
    pub output: Option<String>,
    pub sort: Option<bool>,
    pub bohr_radius_units: Option<bool>,
    pub capacity_policy: Option<String>,
    pub use_forces: Option<bool>,
    pub lennard_jones: Option<FileLennardJonesConfig>,
    /// Atoms per element reserved in the Bag-of-Bonds layout.
    pub bag_counts: Option<BTreeMap<String, usize>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRegressionConfig {
    pub identifiers: Option<Vec<String>>,
    pub training_sizes: Option<Vec<usize>>,
    pub test_size: Option<usize>,
    pub sigma: Option<f64>,
    pub kernel: Option<String>,
    pub label: Option<String>,
    pub ridge: Option<f64>,
    pub solver: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDatasetConfig {
    pub shuffle: Option<bool>,
    pub seed: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTablesConfig {
    pub elements: Option<PathBuf>,
    pub bonds: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub descriptor: Option<FileDescriptorConfig>,
    pub regression: Option<FileRegressionConfig>,
    pub dataset: Option<FileDatasetConfig>,
    pub tables: Option<FileTablesConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
