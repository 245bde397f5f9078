// Configuration loading: environment for secrets and addresses,
// a YAML file for the filter rules.

pub mod app_config;
pub mod filter_file;

pub use app_config::{AppConfig, ConfigError};
pub use filter_file::load_filters;
