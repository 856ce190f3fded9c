use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::config::DataConfig;
use crate::error::LoadError;

use super::{load_dataset, prepare_sources, Dataset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Identity of the plain source files a snapshot was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub files: Vec<FileStamp>,
}

impl SourceFingerprint {
    pub fn of(config: &DataConfig) -> Result<Self, LoadError> {
        let paths = [
            config.games_path(),
            config.teams_path(),
            config.ranking_path(),
            config.details_path(),
        ];

        let files = paths
            .into_iter()
            .map(|path| -> Result<FileStamp, LoadError> {
                let meta = fs::metadata(&path).map_err(|e| LoadError::io(&path, e))?;
                Ok(FileStamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                    path,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { files })
    }
}

/// Session-scoped memo of the cleaned tables. Reloads only when the
/// fingerprint of the sources changes.
pub struct DatasetCache {
    config: DataConfig,
    current: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(config: DataConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn get_or_load(&self) -> Result<Arc<Dataset>, LoadError> {
        // Held across extraction and load so concurrent callers wait for one load.
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let fingerprint = prepare_sources(&self.config)?;
        if let Some(dataset) = current.as_ref() {
            if dataset.fingerprint == fingerprint {
                tracing::debug!("Dataset cache hit ({} games)", dataset.games.len());
                return Ok(Arc::clone(dataset));
            }
            tracing::debug!("Source files changed, reloading dataset");
        }

        let dataset = Arc::new(load_dataset(&self.config)?);
        *current = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
}
