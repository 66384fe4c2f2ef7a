//! Metadata to SRT encoding
//!
//! The recorder writes a JSON side-file next to every recording with the
//! live-chat messages received while it was running. `DanmakuSrtEncoder`
//! turns the chat comments in that file into subtitle cues so they can be
//! replayed over the video.

use super::srt::{self, Cue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How long each comment stays on screen unless configured otherwise
pub const DEFAULT_CUE_DURATION_MS: u64 = 3000;

/// Encoding errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Failed to write subtitle file: {0}")]
    Persist(String),
}

/// Produces a subtitle file from a metadata side-file
#[async_trait]
pub trait SubtitleEncoder: Send + Sync {
    /// Read `metadata` and write a complete subtitle document to `target`,
    /// replacing anything already there.
    async fn encode(&self, metadata: &Path, target: &Path) -> Result<(), EncodeError>;
}

// =============================================================================
// Metadata Types
// =============================================================================

/// Contents of a record's JSON side-file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordExtraData {
    #[serde(default)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(default)]
    pub title: Option<String>,
    /// Unix milliseconds at which the recording started
    #[serde(default)]
    pub record_start_timestamp: Option<i64>,
    #[serde(default)]
    pub record_stop_timestamp: Option<i64>,
}

/// A live-chat event. Only `type == "comment"` carries subtitle text; gifts,
/// untyped events and other events still parse but produce no cues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Unix milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    pub const COMMENT: &'static str = "comment";

    fn as_comment(&self) -> Option<(i64, &str)> {
        if self.kind != Self::COMMENT {
            return None;
        }
        let text = self.text.as_deref()?;
        if text.trim().is_empty() {
            return None;
        }
        Some((self.timestamp?, text))
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Encodes chat comments as SRT cues of a fixed duration
#[derive(Debug, Clone)]
pub struct DanmakuSrtEncoder {
    cue_duration_ms: u64,
}

impl Default for DanmakuSrtEncoder {
    fn default() -> Self {
        Self {
            cue_duration_ms: DEFAULT_CUE_DURATION_MS,
        }
    }
}

impl DanmakuSrtEncoder {
    pub fn new(cue_duration_ms: u64) -> Self {
        Self { cue_duration_ms }
    }

    /// Build cues ordered by start time.
    ///
    /// Offsets are measured from `recordStartTimestamp`, or from the earliest
    /// comment when the recording start is unknown. Comments sent before the
    /// recording started are pinned to 0.
    pub fn build_cues(&self, extra: &RecordExtraData) -> Vec<Cue> {
        let comments: Vec<(i64, &str)> = extra
            .messages
            .iter()
            .filter_map(Message::as_comment)
            .collect();

        let origin = match extra.meta.record_start_timestamp {
            Some(start) => start,
            None => match comments.iter().map(|(ts, _)| *ts).min() {
                Some(first) => first,
                None => return Vec::new(),
            },
        };

        let mut cues: Vec<Cue> = comments
            .into_iter()
            .map(|(ts, text)| {
                let offset = ts.saturating_sub(origin).max(0) as u64;
                Cue::new(offset, self.cue_duration_ms, text)
            })
            .collect();

        cues.sort_by_key(|cue| cue.start_ms);
        cues
    }

    /// Render the SRT document for already-parsed metadata
    pub fn render(&self, extra: &RecordExtraData) -> String {
        srt::render(&self.build_cues(extra))
    }
}

#[async_trait]
impl SubtitleEncoder for DanmakuSrtEncoder {
    async fn encode(&self, metadata: &Path, target: &Path) -> Result<(), EncodeError> {
        let content = tokio::fs::read_to_string(metadata).await?;
        let extra: RecordExtraData = serde_json::from_str(&content)?;
        let document = self.render(&extra);

        let target_path = target.to_path_buf();
        tokio::task::spawn_blocking(move || write_replacing(&target_path, document.as_bytes()))
            .await
            .map_err(|e| EncodeError::Persist(format!("write task failed: {}", e)))??;

        tracing::debug!(
            "Encoded {} messages from {:?} into {:?}",
            extra.messages.len(),
            metadata,
            target
        );

        Ok(())
    }
}

/// Write `contents` to a temporary file beside `target`, then rename it over
/// `target`. Readers see either the old file or the new one, never a mix.
fn write_replacing(target: &Path, contents: &[u8]) -> Result<(), EncodeError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(contents)?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    file.persist(target)
        .map_err(|e| EncodeError::Persist(format!("{:?}: {}", target, e.error)))?;

    Ok(())
}
