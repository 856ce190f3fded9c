use std::path::PathBuf;

use thiserror::Error;

/// Failures that make the whole dataset unavailable for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{table} source not found: expected {path} (or a .zip/.gz archive of it)")]
    MissingSource { table: &'static str, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("failed to parse {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{table} is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("ranking has an invalid SEASON_ID '{value}'")]
    InvalidSeasonId { value: String },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(table: &'static str, source: csv::Error) -> Self {
        Self::Csv { table, source }
    }
}
