use mlexp::core::io::dataset::QM7_INDEX_FILE;
use mlexp::engine::config::{BenchmarkConfig, DescriptorConfig};
use std::path::PathBuf;

/// Where the lookup tables come from; `None` selects the built-in table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePaths {
    pub elements: Option<PathBuf>,
    pub bonds: Option<PathBuf>,
}

/// How the dataset is prepared before the benchmark sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSettings {
    pub directory: PathBuf,
    /// Seed for the shuffle; `None` keeps index order.
    pub shuffle_seed: Option<u64>,
    pub limit: Option<usize>,
}

impl DatasetSettings {
    pub fn index_path(&self) -> PathBuf {
        self.directory.join(QM7_INDEX_FILE)
    }
}

pub struct BenchmarkAppConfig {
    pub dataset: DatasetSettings,
    pub tables: TablePaths,
    pub output: Option<PathBuf>,
    pub core_config: BenchmarkConfig,
}

pub struct DescribeAppConfig {
    pub input: PathBuf,
    pub tables: TablePaths,
    pub descriptor: DescriptorConfig,
}
