use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "David Luevano Alvarado",
    version,
    about = "mlexp CLI - Molecular descriptors (Coulomb, Lennard-Jones, adjacency, Bag-of-Bonds) and kernel ridge regression benchmarks on QM7-style datasets.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train and evaluate kernel ridge models for several descriptors and training sizes.
    Benchmark(BenchmarkArgs),
    /// Compute the descriptor of a single molecule from an XYZ file and print it.
    Describe(DescribeArgs),
}

/// Lookup table overrides shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Nuclear charge table in CSV format (atomic number, name, symbol).
    #[arg(long, value_name = "PATH")]
    pub elements: Option<PathBuf>,

    /// Bond window table in TOML format.
    #[arg(long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,
}

/// Arguments for the `benchmark` subcommand.
#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    // --- Core Arguments ---
    /// Directory holding the dataset index (hof_qm7.txt) and the XYZ files it names.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub dataset: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append one CSV row per regression run to this file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Descriptor Overrides ---
    /// Descriptor identifiers to benchmark (CM, LJM, AM, BOB), comma separated.
    #[arg(short, long, value_name = "ID", value_delimiter = ',')]
    pub identifiers: Vec<String>,

    /// Override the descriptor size (maximum number of atoms).
    #[arg(long, value_name = "INT")]
    pub size: Option<usize>,

    // --- Regression Overrides ---
    /// Training set sizes, comma separated.
    #[arg(short, long = "training-sizes", value_name = "INT", value_delimiter = ',')]
    pub training_sizes: Vec<usize>,

    /// Use exactly this many trailing entries as the test set.
    #[arg(long, value_name = "INT")]
    pub test_size: Option<usize>,

    /// Override the kernel width.
    #[arg(short, long, value_name = "FLOAT")]
    pub sigma: Option<f64>,

    /// Force one kernel (gaussian, laplacian, wasserstein) for every descriptor.
    #[arg(short, long, value_name = "NAME")]
    pub kernel: Option<String>,

    /// Regression target: 'pbe0' or 'delta' (pbe0 minus dftb).
    #[arg(long, value_name = "NAME")]
    pub label: Option<String>,

    // --- Dataset Overrides ---
    /// Seed for shuffling the dataset before splitting.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Keep the dataset in index order instead of shuffling it.
    #[arg(long)]
    pub no_shuffle: bool,

    /// Only use the first N molecules after shuffling.
    #[arg(long, value_name = "INT")]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub tables: TableArgs,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S regression.sigma=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Path to the input XYZ file.
    #[arg(required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Descriptor identifier (CM, LJM, AM, BOB).
    #[arg(short, long, default_value = "CM", value_name = "ID")]
    pub kind: String,

    /// Path to a configuration file in TOML format; only its descriptor section is used.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output shape: 'matrix', 'eigenvalues' or 'flattened'.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Override the descriptor size (maximum number of atoms).
    #[arg(long, value_name = "INT")]
    pub size: Option<usize>,

    #[command(flatten)]
    pub tables: TableArgs,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
