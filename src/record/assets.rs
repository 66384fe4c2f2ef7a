//! Record asset resolution
//!
//! Looks up records and the files that belong to them. Existence checks are
//! point-in-time only: a file can disappear between the check and the read,
//! so every reader here treats a vanished file as "absent" rather than as a
//! failure.

use super::schema::Record;
use super::store::RecordStore;
use crate::utils::paths::{base_name, replace_extension};
use crate::utils::AppResult;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;

/// Extension of the metadata side-file written by the recorder
pub const EXTRA_DATA_EXTENSION: &str = ".json";

/// Extension of generated subtitle side-files
pub const SUBTITLE_EXTENSION: &str = ".srt";

/// An opened primary media file, ready to be streamed
#[derive(Debug)]
pub struct PrimaryAsset {
    /// Bare file name, for the download's Content-Disposition
    pub file_name: String,
    /// Size in bytes at the time it was opened
    pub len: u64,
    pub file: File,
}

/// Resolves records and their on-disk artifacts
#[derive(Clone)]
pub struct RecordAssetResolver {
    store: Arc<dyn RecordStore>,
}

impl RecordAssetResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Look up a record. An unknown id is `Ok(None)`, not an error.
    pub async fn resolve(&self, id: &str) -> AppResult<Option<Record>> {
        let record = self.store.get_record(id).await?;
        if record.is_none() {
            tracing::debug!("Record {} not in store", id);
        }
        Ok(record)
    }

    /// Path of the side-file with extension `ext` next to the primary asset
    pub fn derived_path(record: &Record, ext: &str) -> PathBuf {
        replace_extension(&record.save_path, ext)
    }

    /// Whether the primary media file is currently on disk
    pub async fn has_primary_asset(&self, record: &Record) -> bool {
        file_exists(Path::new(&record.save_path)).await
    }

    /// Whether the side-file with extension `ext` is currently on disk
    pub async fn has_side_file(&self, record: &Record, ext: &str) -> bool {
        file_exists(&Self::derived_path(record, ext)).await
    }

    /// Open the primary media file without reading it.
    ///
    /// `None` when the file is missing, including when it disappears after
    /// the existence check.
    pub async fn open_primary_asset(&self, record: &Record) -> AppResult<Option<PrimaryAsset>> {
        if !self.has_primary_asset(record).await {
            return Ok(None);
        }

        let path = Path::new(&record.save_path);
        let Some(file_name) = base_name(path) else {
            return Ok(None);
        };

        let Some(file) = open_if_present(path).await? else {
            return Ok(None);
        };
        let len = file.metadata().await?.len();

        Ok(Some(PrimaryAsset {
            file_name,
            len,
            file,
        }))
    }

    /// Read and parse the JSON side-file with extension `ext`.
    ///
    /// Malformed JSON is an error; a missing file is `None`.
    pub async fn read_side_file_json(
        &self,
        record: &Record,
        ext: &str,
    ) -> AppResult<Option<serde_json::Value>> {
        if !self.has_side_file(record, ext).await {
            return Ok(None);
        }

        let path = Self::derived_path(record, ext);
        match read_to_string_if_present(&path).await? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }
}

async fn file_exists(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

/// Open `path`, mapping a file that vanished since it was checked to `None`
async fn open_if_present(path: &Path) -> AppResult<Option<File>> {
    match File::open(path).await {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("{:?} vanished before it could be opened", path);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read `path` to a string, mapping a file that vanished since it was
/// checked to `None`
async fn read_to_string_if_present(path: &Path) -> AppResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("{:?} vanished before it could be read", path);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
