//! Record store
//!
//! `RecordStore` is the port the rest of the server reads records through.
//! `JsonRecordStore` backs it with a JSON array file that the recorder
//! process keeps rewriting; records are served in file order. Every read
//! first checks the file's modification stamp and re-parses it when it
//! changed, so records added after startup become visible without a restart.

use super::schema::{Paged, Record, RecordQuery};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Read access to persisted records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup. `None` when no record has this id.
    async fn get_record(&self, id: &str) -> AppResult<Option<Record>>;

    /// Window of records matching `query.recorder_id`, with the size of the
    /// whole matching population.
    async fn get_records(&self, query: RecordQuery) -> AppResult<Paged<Record>>;
}

/// What the backing file looked like when it was last parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(metadata: &fs::Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    /// `None` when the file did not exist at the last check
    stamp: Option<FileStamp>,
    records: Vec<Record>,
}

/// Record store backed by a JSON file, cached in memory between changes
pub struct JsonRecordStore {
    path: Option<PathBuf>,
    snapshot: RwLock<Snapshot>,
}

impl JsonRecordStore {
    /// Load records from `path`. A missing file yields an empty store that
    /// fills up once the file appears. A malformed file is an error here,
    /// since there is no earlier snapshot to fall back to.
    pub fn load(path: &Path) -> AppResult<Self> {
        let stamp = match fs::metadata(path) {
            Ok(metadata) => Some(FileStamp::of(&metadata)),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(AppError::Io(e)),
        };

        let records = match fs::read_to_string(path) {
            Ok(content) => parse_records(path, &content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Records file {:?} does not exist, starting empty", path);
                Vec::new()
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        tracing::debug!("Loaded {} records from {:?}", records.len(), path);

        Ok(Self {
            path: Some(path.to_path_buf()),
            snapshot: RwLock::new(Snapshot { stamp, records }),
        })
    }

    /// Build a store that is not backed by any file
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            path: None,
            snapshot: RwLock::new(Snapshot {
                stamp: None,
                records,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.read().records.is_empty()
    }

    /// Re-parse the backing file if its stamp moved since the last parse.
    ///
    /// A file that fails to parse (for example one caught mid-write) keeps
    /// the previous snapshot in place and is retried on the next read.
    async fn refresh(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let stamp = match tokio::fs::metadata(path).await {
            Ok(metadata) => Some(FileStamp::of(&metadata)),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(AppError::Io(e)),
        };

        if self.snapshot.read().stamp == stamp {
            return Ok(());
        }

        let records = match tokio::fs::read_to_string(path).await {
            Ok(content) => match parse_records(path, &content) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Keeping previous records: {}", e);
                    return Ok(());
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Records file {:?} disappeared", path);
                Vec::new()
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        tracing::debug!("Reloaded {} records from {:?}", records.len(), path);

        *self.snapshot.write() = Snapshot { stamp, records };
        Ok(())
    }
}

fn parse_records(path: &Path, content: &str) -> AppResult<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(content)
        .map_err(|e| AppError::Store(format!("Invalid records file {:?}: {}", path, e)))
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn get_record(&self, id: &str) -> AppResult<Option<Record>> {
        self.refresh().await?;

        let snapshot = self.snapshot.read();
        Ok(snapshot.records.iter().find(|r| r.id == id).cloned())
    }

    async fn get_records(&self, query: RecordQuery) -> AppResult<Paged<Record>> {
        self.refresh().await?;

        let snapshot = self.snapshot.read();
        let matching: Vec<&Record> = snapshot
            .records
            .iter()
            .filter(|r| match &query.recorder_id {
                Some(recorder_id) => r.recorder_id.as_deref() == Some(recorder_id.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(query.start)
            .take(query.count)
            .cloned()
            .collect();

        Ok(Paged { items, total })
    }
}
