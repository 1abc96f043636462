//! CSV ingestion for the source relations.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::store::error::{LoadError, LoadResult};

/// Text encoding of a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// UTF-8, falling back to ISO-8859-1 when the bytes are not valid UTF-8.
    #[default]
    Auto,
    Utf8,
    Latin1,
}

/// Decode raw file bytes.
///
/// ISO-8859-1 maps every byte to the code point of the same value, so the
/// Latin-1 path cannot fail.
pub fn decode(bytes: Vec<u8>, encoding: Encoding, source_name: &str) -> LoadResult<String> {
    let latin1 = |bytes: &[u8]| bytes.iter().map(|&b| b as char).collect::<String>();
    let text = match encoding {
        Encoding::Latin1 => latin1(&bytes),
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
            source_name: source_name.to_string(),
        })?,
        Encoding::Auto => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(source = source_name, "not UTF-8, decoding as ISO-8859-1");
                latin1(err.as_bytes())
            }
        },
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Load one relation from a CSV file.
pub fn load_source<T: Record>(path: &Path, encoding: Encoding) -> LoadResult<Vec<T>> {
    let source_name = T::RELATION.table_name();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(bytes, encoding, source_name)?;
    let records = parse_records::<T>(&text, path)?;
    tracing::info!(
        source = source_name,
        path = %path.display(),
        rows = records.len(),
        "loaded relation"
    );
    Ok(records)
}

/// Parse CSV text into records of one relation.
///
/// The header must contain every column of the relation's schema; other
/// columns are ignored. `origin` is only used in error messages.
pub fn parse_records<T: Record>(text: &str, origin: &Path) -> LoadResult<Vec<T>> {
    let relation = T::RELATION;
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: PathBuf::from(origin),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    let present: HashSet<&str> = headers.iter().collect();
    for column in relation.schema().names() {
        if !present.contains(column) {
            return Err(LoadError::MissingColumn {
                source_name: relation.table_name().to_string(),
                column: column.to_string(),
            });
        }
    }

    let records = reader
        .deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    if relation.primary_key().is_some() {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if let Some(key) = record.key() {
                if !seen.insert(key.clone()) {
                    return Err(LoadError::DuplicateKey {
                        source_name: relation.table_name().to_string(),
                        key: key.to_string(),
                    });
                }
            }
        }
    }

    Ok(records)
}
