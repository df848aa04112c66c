use crate::core::descriptors::lennard_jones::LennardJonesParams;
use crate::core::descriptors::{DescriptorOptions, ParseOptionError};
use crate::core::io::dataset::LabelKind;
use crate::core::learning::cholesky::{DEFAULT_RIDGE, SolverKind};
use crate::core::learning::kernels::KernelKind;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_KERNEL_SIGMA: f64 = 1000.0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },
}

/// The descriptor families a benchmark can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKind {
    CoulombMatrix,
    LennardJonesMatrix,
    AdjacencyMatrix,
    BagOfBonds,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 4] = [
        DescriptorKind::CoulombMatrix,
        DescriptorKind::LennardJonesMatrix,
        DescriptorKind::AdjacencyMatrix,
        DescriptorKind::BagOfBonds,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            DescriptorKind::CoulombMatrix => "CM",
            DescriptorKind::LennardJonesMatrix => "LJM",
            DescriptorKind::AdjacencyMatrix => "AM",
            DescriptorKind::BagOfBonds => "BOB",
        }
    }

    /// Gaussian for the matrix descriptors, Laplacian for Bag-of-Bonds.
    pub fn default_kernel(&self) -> KernelKind {
        match self {
            DescriptorKind::BagOfBonds => KernelKind::Laplacian,
            _ => KernelKind::Gaussian,
        }
    }
}

impl FromStr for DescriptorKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CM" => Ok(DescriptorKind::CoulombMatrix),
            "LJM" => Ok(DescriptorKind::LennardJonesMatrix),
            "AM" => Ok(DescriptorKind::AdjacencyMatrix),
            "BOB" => Ok(DescriptorKind::BagOfBonds),
            _ => Err(ParseOptionError {
                kind: "descriptor identifier",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Everything needed to build one kind of descriptor for a set of molecules.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorConfig {
    pub kind: DescriptorKind,
    pub options: DescriptorOptions,
    pub lennard_jones: LennardJonesParams,
    /// Adjacency entries from force dot products instead of bond constants.
    pub use_forces: bool,
    /// Fixed per-element atom counts for the Bag-of-Bonds layout. When unset the layout
    /// follows the largest composition in the molecule set.
    pub bag_counts: Option<BTreeMap<String, usize>>,
}

impl DescriptorConfig {
    pub fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            options: DescriptorOptions::default(),
            lennard_jones: LennardJonesParams::default(),
            use_forces: false,
            bag_counts: None,
        }
    }

    pub fn with_kind(&self, kind: DescriptorKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionConfig {
    pub kernel: KernelKind,
    pub sigma: f64,
    pub training_size: usize,
    /// Explicit test size; `None` uses every remaining entry, capped.
    pub test_size: Option<usize>,
    pub ridge: f64,
    pub solver: SolverKind,
}

#[derive(Default)]
pub struct RegressionConfigBuilder {
    kernel: Option<KernelKind>,
    sigma: Option<f64>,
    training_size: Option<usize>,
    test_size: Option<usize>,
    ridge: Option<f64>,
    solver: Option<SolverKind>,
}

impl RegressionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = Some(kernel);
        self
    }
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
    pub fn training_size(mut self, size: usize) -> Self {
        self.training_size = Some(size);
        self
    }
    pub fn test_size(mut self, size: usize) -> Self {
        self.test_size = Some(size);
        self
    }
    pub fn ridge(mut self, ridge: f64) -> Self {
        self.ridge = Some(ridge);
        self
    }
    pub fn solver(mut self, solver: SolverKind) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn build(self) -> Result<RegressionConfig, ConfigError> {
        let sigma = self.sigma.unwrap_or(DEFAULT_KERNEL_SIGMA);
        validate_sigma(sigma)?;
        let ridge = self.ridge.unwrap_or(DEFAULT_RIDGE);
        validate_ridge(ridge)?;
        Ok(RegressionConfig {
            kernel: self.kernel.ok_or(ConfigError::MissingParameter("kernel"))?,
            sigma,
            training_size: self
                .training_size
                .ok_or(ConfigError::MissingParameter("training_size"))?,
            test_size: self.test_size,
            ridge,
            solver: self.solver.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Shared descriptor settings; the kind is replaced per identifier.
    pub descriptor: DescriptorConfig,
    pub identifiers: Vec<DescriptorKind>,
    pub training_sizes: Vec<usize>,
    pub test_size: Option<usize>,
    pub sigma: f64,
    /// Forces one kernel for every identifier instead of each kind's default.
    pub kernel: Option<KernelKind>,
    pub label: LabelKind,
    pub ridge: f64,
    pub solver: SolverKind,
}

impl BenchmarkConfig {
    pub fn regression_config(
        &self,
        kind: DescriptorKind,
        training_size: usize,
    ) -> RegressionConfig {
        RegressionConfig {
            kernel: self.kernel.unwrap_or_else(|| kind.default_kernel()),
            sigma: self.sigma,
            training_size,
            test_size: self.test_size,
            ridge: self.ridge,
            solver: self.solver,
        }
    }
}

#[derive(Default)]
pub struct BenchmarkConfigBuilder {
    descriptor: Option<DescriptorConfig>,
    identifiers: Option<Vec<DescriptorKind>>,
    training_sizes: Option<Vec<usize>>,
    test_size: Option<usize>,
    sigma: Option<f64>,
    kernel: Option<KernelKind>,
    label: Option<LabelKind>,
    ridge: Option<f64>,
    solver: Option<SolverKind>,
}

impl BenchmarkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(mut self, descriptor: DescriptorConfig) -> Self {
        self.descriptor = Some(descriptor);
        self
    }
    pub fn identifiers(mut self, identifiers: Vec<DescriptorKind>) -> Self {
        self.identifiers = Some(identifiers);
        self
    }
    pub fn training_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.training_sizes = Some(sizes);
        self
    }
    pub fn test_size(mut self, size: Option<usize>) -> Self {
        self.test_size = size;
        self
    }
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
    pub fn kernel(mut self, kernel: Option<KernelKind>) -> Self {
        self.kernel = kernel;
        self
    }
    pub fn label(mut self, label: LabelKind) -> Self {
        self.label = Some(label);
        self
    }
    pub fn ridge(mut self, ridge: f64) -> Self {
        self.ridge = Some(ridge);
        self
    }
    pub fn solver(mut self, solver: SolverKind) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn build(self) -> Result<BenchmarkConfig, ConfigError> {
        let identifiers = self
            .identifiers
            .ok_or(ConfigError::MissingParameter("identifiers"))?;
        if identifiers.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "identifiers",
                message: "at least one descriptor identifier is required".to_string(),
            });
        }
        let training_sizes = self
            .training_sizes
            .ok_or(ConfigError::MissingParameter("training_sizes"))?;
        if training_sizes.is_empty() || training_sizes.contains(&0) {
            return Err(ConfigError::InvalidParameter {
                name: "training_sizes",
                message: "training sizes must be a non-empty list of positive sizes".to_string(),
            });
        }
        let sigma = self.sigma.unwrap_or(DEFAULT_KERNEL_SIGMA);
        validate_sigma(sigma)?;
        let ridge = self.ridge.unwrap_or(DEFAULT_RIDGE);
        validate_ridge(ridge)?;

        Ok(BenchmarkConfig {
            descriptor: self
                .descriptor
                .ok_or(ConfigError::MissingParameter("descriptor"))?,
            identifiers,
            training_sizes,
            test_size: self.test_size,
            sigma,
            kernel: self.kernel,
            label: self.label.unwrap_or_default(),
            ridge,
            solver: self.solver.unwrap_or_default(),
        })
    }
}

fn validate_sigma(sigma: f64) -> Result<(), ConfigError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "sigma",
            message: format!("kernel width must be positive, got {sigma}"),
        })
    }
}

fn validate_ridge(ridge: f64) -> Result<(), ConfigError> {
    if ridge.is_finite() && ridge >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "ridge",
            message: format!("ridge must be non-negative, got {ridge}"),
        })
    }
}
