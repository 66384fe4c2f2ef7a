//! Subtitle generation orchestration
//!
//! Regenerates `<stem>.srt` from `<stem>.json` next to a record's media file.
//! Generation always overwrites: subtitles are fully derivable from the
//! metadata, so the newest write wins. Two concurrent requests for the same
//! record are not serialized; each write is an atomic replace, so the file
//! left behind is always one complete document.

use super::encoder::SubtitleEncoder;
use crate::record::{RecordAssetResolver, EXTRA_DATA_EXTENSION, SUBTITLE_EXTENSION};
use crate::utils::paths::base_name;
use crate::utils::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reference to a generated subtitle file. Only the bare file name is kept
/// so the server's directory layout never reaches a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSubtitle {
    pub file_name: String,
}

/// Resolves a record's metadata and drives the encoder
#[derive(Clone)]
pub struct SubtitleGenerator {
    resolver: RecordAssetResolver,
    encoder: Arc<dyn SubtitleEncoder>,
}

impl SubtitleGenerator {
    pub fn new(resolver: RecordAssetResolver, encoder: Arc<dyn SubtitleEncoder>) -> Self {
        Self { resolver, encoder }
    }

    /// Generate the subtitle file for record `id`.
    ///
    /// Returns `Ok(None)` when the record is unknown or has no metadata
    /// side-file; the encoder is not invoked in either case. Encoder failures
    /// are returned as `AppError::Encoding`.
    pub async fn generate(&self, id: &str) -> AppResult<Option<GeneratedSubtitle>> {
        let Some(record) = self.resolver.resolve(id).await? else {
            return Ok(None);
        };

        if !self.resolver.has_side_file(&record, EXTRA_DATA_EXTENSION).await {
            tracing::debug!("Record {} has no metadata to build subtitles from", id);
            return Ok(None);
        }

        let metadata_path = RecordAssetResolver::derived_path(&record, EXTRA_DATA_EXTENSION);
        let subtitle_path = RecordAssetResolver::derived_path(&record, SUBTITLE_EXTENSION);

        let file_name = base_name(&subtitle_path).ok_or_else(|| {
            AppError::Store(format!("Record {} has an unusable save path", id))
        })?;

        self.encoder.encode(&metadata_path, &subtitle_path).await?;

        tracing::info!("Generated subtitles for record {}: {}", id, file_name);

        Ok(Some(GeneratedSubtitle { file_name }))
    }
}
