use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a relation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Config(#[from] crate::config::SettingsError),

    #[error("Unknown source '{0}'")]
    UnknownSource(String),

    #[error("Source '{source_name}' is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    #[error("Source '{source_name}' has duplicate key {key}")]
    DuplicateKey { source_name: String, key: String },

    #[error("Source '{source_name}' is not valid UTF-8")]
    Encoding { source_name: String },
}

pub type LoadResult<T> = Result<T, LoadError>;
