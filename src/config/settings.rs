//! TOML-based configuration for Heron.
//!
//! Supports a config file (heron.toml) with environment variable expansion
//! in the data directory.
//!
//! Example configuration:
//! ```toml
//! [data]
//! dir = "${NORTHWIND_HOME}/extracts"
//! encoding = "auto"   # auto | utf8 | latin1
//!
//! [data.files]
//! order_lines = "order_details.csv"
//! customers = "customers_2024.csv"
//!
//! [reports]
//! top_n = 5
//! key_customer_threshold = 10000.0
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Relation;
use crate::store::Encoding;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where the source extracts live.
    pub data: DataSettings,

    /// Report parameters.
    pub reports: ReportSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Source data location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory containing the CSV extracts (supports ${ENV_VAR} expansion).
    pub dir: String,

    /// Text encoding of the extracts.
    pub encoding: Encoding,

    /// Per-relation file name overrides.
    pub files: FileSettings,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            encoding: Encoding::Auto,
            files: FileSettings::default(),
        }
    }
}

impl DataSettings {
    /// Settings for a data directory, everything else default.
    pub fn in_dir(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// The data directory with environment variables expanded.
    pub fn resolved_dir(&self) -> Result<PathBuf, SettingsError> {
        Ok(PathBuf::from(expand_env_vars(&self.dir)?))
    }

    /// Full path of a relation's source file.
    pub fn path_for(&self, relation: Relation) -> Result<PathBuf, SettingsError> {
        let file = self
            .files
            .get(relation)
            .map(str::to_string)
            .unwrap_or_else(|| relation.default_file());
        Ok(self.resolved_dir()?.join(file))
    }
}

/// File name overrides, one per relation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FileSettings {
    pub order_lines: Option<String>,
    pub orders: Option<String>,
    pub customers: Option<String>,
    pub products: Option<String>,
    pub shippers: Option<String>,
    pub categories: Option<String>,
    pub employees: Option<String>,
}

impl FileSettings {
    pub fn get(&self, relation: Relation) -> Option<&str> {
        let file = match relation {
            Relation::OrderLines => &self.order_lines,
            Relation::Orders => &self.orders,
            Relation::Customers => &self.customers,
            Relation::Products => &self.products,
            Relation::Shippers => &self.shippers,
            Relation::Categories => &self.categories,
            Relation::Employees => &self.employees,
        };
        file.as_deref()
    }
}

/// Report parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Rows kept by top-N rankings.
    pub top_n: usize,

    /// Revenue a customer must exceed to count as a key customer.
    pub key_customer_threshold: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            key_customer_threshold: 10_000.0,
        }
    }
}

impl ReportSettings {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.key_customer_threshold = threshold;
        self
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `HERON_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `HERON_CONFIG`
    /// 2. `./heron.toml`
    /// 3. `~/.config/heron/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("HERON_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("heron.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("heron").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject values no report can run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.data.resolved_dir()?;
        if self.reports.top_n == 0 {
            return Err(SettingsError::InvalidConfig(
                "reports.top_n must be at least 1".to_string(),
            ));
        }
        if !self.reports.key_customer_threshold.is_finite() {
            return Err(SettingsError::InvalidConfig(
                "reports.key_customer_threshold must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric, non-underscore char
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
