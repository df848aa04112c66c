use mlexp::core::descriptors::DEFAULT_DESCRIPTOR_SIZE;
use mlexp::engine::config::DEFAULT_KERNEL_SIGMA;

pub struct DefaultsConfig {
    pub identifiers: Vec<String>,
    pub training_sizes: Vec<usize>,
    pub size: usize,
    pub sigma: f64,
    pub lj_sigma: f64,
    pub lj_epsilon: f64,
    pub label: String,
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            identifiers: vec!["CM".to_string(), "LJM".to_string()],
            training_sizes: vec![1500, 2000],
            size: DEFAULT_DESCRIPTOR_SIZE,
            sigma: DEFAULT_KERNEL_SIGMA,
            lj_sigma: 1.0,
            lj_epsilon: 1.0,
            label: "pbe0".to_string(),
            shuffle: true,
            seed: 111,
        }
    }
}
