//! Configuration module for Heron.
//!
//! Handles the config file, environment variables, and settings.

mod settings;

pub use settings::{
    expand_env_vars, DataSettings, FileSettings, LoggingSettings, ReportSettings, Settings,
    SettingsError,
};
