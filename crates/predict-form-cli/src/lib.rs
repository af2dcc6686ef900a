//! predict-form CLI — configuration and subcommands for the `predict-form` binary.

pub mod cli;
pub mod config;

pub use config::{load_config, resolve_config_path, resolve_endpoint, Config};
