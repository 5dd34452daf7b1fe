use crate::weather_data::error::WeatherDataError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

const CACHE_FILE_PREFIX: &str = "archive-";
const CACHE_FILE_EXTENSION: &str = "bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// A raw archive response as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

/// Never-expiring store of raw responses, one file per request key.
#[derive(Debug, Clone)]
pub(crate) struct ResponseCache {
    cache_dir: PathBuf,
}

impl ResponseCache {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{CACHE_FILE_PREFIX}{key}.{CACHE_FILE_EXTENSION}"))
    }

    pub async fn get(&self, key: &str) -> Result<Option<CachedResponse>, WeatherDataError> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WeatherDataError::CacheRead(path, e)),
        };

        let response = task::spawn_blocking(move || {
            bincode::serde::decode_from_slice::<CachedResponse, _>(&bytes, BINCODE_CONFIG)
                .map(|(response, _)| response)
                .map_err(|e| WeatherDataError::CacheDecode(path, Box::new(e)))
        })
        .await??;
        Ok(Some(response))
    }

    /// Stores `response` under `key`. The entry is written to a temporary file
    /// first and renamed into place.
    pub async fn put(&self, key: &str, response: CachedResponse) -> Result<(), WeatherDataError> {
        let path = self.entry_path(key);
        let cache_dir = self.cache_dir.clone();

        task::spawn_blocking(move || {
            let encoded = bincode::serde::encode_to_vec(&response, BINCODE_CONFIG)
                .map_err(|e| WeatherDataError::CacheEncode(Box::new(e)))?;

            std::fs::create_dir_all(&cache_dir)
                .map_err(|e| WeatherDataError::CacheWrite(cache_dir.clone(), e))?;
            let mut temp_file = NamedTempFile::new_in(&cache_dir)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e))?;
            temp_file
                .write_all(&encoded)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e.error))?;
            debug!("Wrote {} bytes to {}", encoded.len(), path.display());
            Ok::<(), WeatherDataError>(())
        })
        .await??;
        Ok(())
    }

    /// Deletes every cached archive response, returning how many were removed.
    pub async fn clear(&self) -> Result<usize, WeatherDataError> {
        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(WeatherDataError::CacheRead(self.cache_dir.clone(), e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WeatherDataError::CacheRead(self.cache_dir.clone(), e))?
        {
            let path = entry.path();
            let is_archive_entry = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with(CACHE_FILE_PREFIX)
                        && name.ends_with(&format!(".{CACHE_FILE_EXTENSION}"))
                });
            if is_archive_entry {
                fs::remove_file(&path)
                    .await
                    .map_err(|e| WeatherDataError::CacheDeletion(path.clone(), e))?;
                removed += 1;
            }
        }
        info!(
            "Removed {} cached archive responses from {}",
            removed,
            self.cache_dir.display()
        );
        Ok(removed)
    }
}
