use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileDescriptorConfig, FileTablesConfig};
use super::models::{BenchmarkAppConfig, DatasetSettings, DescribeAppConfig, TablePaths};
use crate::cli::{BenchmarkArgs, DescribeArgs, TableArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use mlexp::core::descriptors::lennard_jones::LennardJonesParams;
use mlexp::core::descriptors::{DescriptorOptions, OutputMode};
use mlexp::engine::config::{self as core_config, BenchmarkConfigBuilder, DescriptorKind};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

pub fn build_benchmark_config(args: &BenchmarkArgs) -> Result<BenchmarkAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let regression_file = file_config.regression.take().unwrap_or_default();
    let dataset_file = file_config.dataset.take().unwrap_or_default();

    let identifiers: Vec<DescriptorKind> = if !args.identifiers.is_empty() {
        parse_all(&args.identifiers, "identifiers")?
    } else {
        parse_all(
            regression_file
                .identifiers
                .as_ref()
                .unwrap_or(&defaults.identifiers),
            "regression.identifiers",
        )?
    };
    let first_kind = identifiers
        .first()
        .copied()
        .unwrap_or(DescriptorKind::CoulombMatrix);

    let training_sizes = if !args.training_sizes.is_empty() {
        args.training_sizes.clone()
    } else {
        regression_file
            .training_sizes
            .unwrap_or_else(|| defaults.training_sizes.clone())
    };

    let descriptor = merge_descriptor(
        file_config.descriptor.take().unwrap_or_default(),
        first_kind,
        args.size,
        None,
        &defaults,
    )?;

    let kernel = args
        .kernel
        .as_deref()
        .or(regression_file.kernel.as_deref())
        .map(|k| parse_option(k, "regression.kernel"))
        .transpose()?;
    let label = parse_option(
        args.label
            .as_deref()
            .or(regression_file.label.as_deref())
            .unwrap_or(&defaults.label),
        "regression.label",
    )?;

    let mut builder = BenchmarkConfigBuilder::new()
        .descriptor(descriptor)
        .identifiers(identifiers)
        .training_sizes(training_sizes)
        .test_size(args.test_size.or(regression_file.test_size))
        .sigma(args.sigma.or(regression_file.sigma).unwrap_or(defaults.sigma))
        .kernel(kernel)
        .label(label);
    if let Some(ridge) = regression_file.ridge {
        builder = builder.ridge(ridge);
    }
    if let Some(solver) = regression_file.solver.as_deref() {
        builder = builder.solver(parse_option(solver, "regression.solver")?);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let shuffle = !args.no_shuffle && dataset_file.shuffle.unwrap_or(defaults.shuffle);
    let seed = args.seed.or(dataset_file.seed).unwrap_or(defaults.seed);

    Ok(BenchmarkAppConfig {
        dataset: DatasetSettings {
            directory: args.dataset.clone(),
            shuffle_seed: shuffle.then_some(seed),
            limit: args.limit.or(dataset_file.limit),
        },
        tables: merge_tables(&args.tables, file_config.tables.take()),
        output: args.output.clone(),
        core_config,
    })
}

pub fn build_describe_config(args: &DescribeArgs) -> Result<DescribeAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let kind = parse_option(&args.kind, "kind")?;
    let descriptor = merge_descriptor(
        file_config.descriptor.take().unwrap_or_default(),
        kind,
        args.size,
        args.mode.as_deref(),
        &defaults,
    )?;

    Ok(DescribeAppConfig {
        input: args.input.clone(),
        tables: merge_tables(&args.tables, file_config.tables.take()),
        descriptor,
    })
}

fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn parse_option<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

fn parse_all<T>(values: &[String], key: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    values.iter().map(|v| parse_option(v, key)).collect()
}

fn merge_descriptor(
    file: FileDescriptorConfig,
    kind: DescriptorKind,
    cli_size: Option<usize>,
    cli_mode: Option<&str>,
    defaults: &DefaultsConfig,
) -> Result<core_config::DescriptorConfig> {
    let base = DescriptorOptions::default();
    let output = match cli_mode.or(file.output.as_deref()) {
        Some(mode) => parse_option::<OutputMode>(mode, "descriptor.output")?,
        None => base.output,
    };
    let capacity_policy = match file.capacity_policy.as_deref() {
        Some(policy) => parse_option(policy, "descriptor.capacity-policy")?,
        None => base.capacity_policy,
    };
    let options = DescriptorOptions {
        size: cli_size.or(file.size).unwrap_or(defaults.size),
        output,
        sort: file.sort.unwrap_or(base.sort),
        bohr_radius_units: file.bohr_radius_units.unwrap_or(base.bohr_radius_units),
        capacity_policy,
    };
    if options.size == 0 {
        return Err(CliError::Config(
            "`descriptor.size` must be at least 1".to_string(),
        ));
    }

    let lj_file = file.lennard_jones.unwrap_or_default();
    let lennard_jones = LennardJonesParams {
        sigma: lj_file.sigma.unwrap_or(defaults.lj_sigma),
        epsilon: lj_file.epsilon.unwrap_or(defaults.lj_epsilon),
        diagonal_override: lj_file.diagonal,
    };

    Ok(core_config::DescriptorConfig {
        kind,
        options,
        lennard_jones,
        use_forces: file.use_forces.unwrap_or(false),
        bag_counts: file.bag_counts,
    })
}

fn merge_tables(cli: &TableArgs, file: Option<FileTablesConfig>) -> TablePaths {
    let file = file.unwrap_or_default();
    TablePaths {
        elements: cli.elements.clone().or(file.elements),
        bonds: cli.bonds.clone().or(file.bonds),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_assignment(kv_pair)?;

        match key {
            "descriptor.size" => {
                config.descriptor.get_or_insert_with(Default::default).size =
                    Some(parser::parse_value(key, value, "integer")?);
            }
            "descriptor.output" => {
                config.descriptor.get_or_insert_with(Default::default).output =
                    Some(value.to_string());
            }
            "descriptor.sort" => {
                config.descriptor.get_or_insert_with(Default::default).sort =
                    Some(parser::parse_value(key, value, "boolean")?);
            }
            "descriptor.bohr-radius-units" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .bohr_radius_units = Some(parser::parse_value(key, value, "boolean")?);
            }
            "descriptor.capacity-policy" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .capacity_policy = Some(value.to_string());
            }
            "descriptor.use-forces" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .use_forces = Some(parser::parse_value(key, value, "boolean")?);
            }
            "descriptor.lennard-jones.sigma" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .lennard_jones
                    .get_or_insert_with(Default::default)
                    .sigma = Some(parser::parse_value(key, value, "float")?);
            }
            "descriptor.lennard-jones.epsilon" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .lennard_jones
                    .get_or_insert_with(Default::default)
                    .epsilon = Some(parser::parse_value(key, value, "float")?);
            }
            "descriptor.lennard-jones.diagonal" => {
                config
                    .descriptor
                    .get_or_insert_with(Default::default)
                    .lennard_jones
                    .get_or_insert_with(Default::default)
                    .diagonal = Some(parser::parse_value(key, value, "float")?);
            }
            "regression.identifiers" => {
                config
                    .regression
                    .get_or_insert_with(Default::default)
                    .identifiers = Some(parser::parse_list(key, value, "identifier")?);
            }
            "regression.training-sizes" => {
                config
                    .regression
                    .get_or_insert_with(Default::default)
                    .training_sizes = Some(parser::parse_list(key, value, "integer")?);
            }
            "regression.test-size" => {
                config
                    .regression
                    .get_or_insert_with(Default::default)
                    .test_size = Some(parser::parse_value(key, value, "integer")?);
            }
            "regression.sigma" => {
                config.regression.get_or_insert_with(Default::default).sigma =
                    Some(parser::parse_value(key, value, "float")?);
            }
            "regression.ridge" => {
                config.regression.get_or_insert_with(Default::default).ridge =
                    Some(parser::parse_value(key, value, "float")?);
            }
            "regression.kernel" => {
                config.regression.get_or_insert_with(Default::default).kernel =
                    Some(value.to_string());
            }
            "regression.label" => {
                config.regression.get_or_insert_with(Default::default).label =
                    Some(value.to_string());
            }
            "regression.solver" => {
                config.regression.get_or_insert_with(Default::default).solver =
                    Some(value.to_string());
            }
            "dataset.shuffle" => {
                config.dataset.get_or_insert_with(Default::default).shuffle =
                    Some(parser::parse_value(key, value, "boolean")?);
            }
            "dataset.seed" => {
                config.dataset.get_or_insert_with(Default::default).seed =
                    Some(parser::parse_value(key, value, "integer")?);
            }
            "dataset.limit" => {
                config.dataset.get_or_insert_with(Default::default).limit =
                    Some(parser::parse_value(key, value, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
