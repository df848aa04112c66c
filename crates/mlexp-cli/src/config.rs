//! Configuration for the CLI: a TOML file, built-in defaults and command-line overrides,
//! merged in that order of increasing precedence.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
