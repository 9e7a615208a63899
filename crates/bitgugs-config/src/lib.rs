//! Configuration management for bitgugs.
//!
//! Settings are layered: built-in defaults, then `.bitgugs.yaml` and
//! `.bitgugs.toml` at the repository root, then `BITGUGS_*` environment
//! variables.

pub mod config;

pub use config::{BitgugsConfig, ConfigError, load_config};
