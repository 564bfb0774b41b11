//! Configuration module
//!
//! Handles the user configuration (`config.toml` under the platform config dir)
//! layered with `CONSOLE_*` environment variables and command line overrides.

mod settings;

pub use settings::*;
