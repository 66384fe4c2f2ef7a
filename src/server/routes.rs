//! HTTP handlers for `/records`
//!
//! Every JSON response is wrapped as `{ "payload": ... }`. Absent records
//! and files answer 404 with a null payload.

use super::query::ListRecordsParams;
use super::state::AppState;
use crate::paging::PagedResultGetter;
use crate::record::{Paged, Record, RecordQuery, EXTRA_DATA_EXTENSION};
use crate::utils::{AppError, AppResult};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Read size for streamed downloads
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Response envelope shared by all JSON endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub payload: T,
}

impl<T> ApiResponse<T> {
    pub fn new(payload: T) -> Json<Self> {
        Json(Self { payload })
    }
}

/// `GET /records?recorderId=&page=&pageSize=`
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<Paged<Record>>>> {
    let params = ListRecordsParams::from_query(&params)?;

    let store = state.store.clone();
    let recorder_id = params.recorder_id.clone();
    let getter = PagedResultGetter::<Record, _>::new(move |start: usize, count: usize| {
        let store = store.clone();
        let query = RecordQuery {
            recorder_id: recorder_id.clone(),
            start,
            count,
        };
        async move { store.get_records(query).await }
    });

    let page = getter.get_request(params.page).await?;

    tracing::debug!(
        "Listed {} of {} records (page {}, size {}, recorder {:?})",
        page.items.len(),
        page.total,
        params.page.page,
        params.page.page_size,
        params.recorder_id
    );

    Ok(ApiResponse::new(page))
}

/// `GET /records/:id/video` - download the primary media file
pub async fn get_record_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let record = state
        .assets
        .resolve(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("record {}", id)))?;

    let asset = state
        .assets
        .open_primary_asset(&record)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("video of record {}", id)))?;

    tracing::debug!("Streaming {} ({} bytes)", asset.file_name, asset.len);

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&asset.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, asset.len.to_string()),
        ],
        file_body(asset.file),
    )
        .into_response())
}

/// Stream a file in fixed-size chunks so large recordings never sit in memory
fn file_body(file: File) -> Body {
    let chunks = futures_util::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        buf.truncate(read);
        Ok(Some((buf, file)))
    });

    Body::from_stream(chunks)
}

/// `GET /records/:id/extra_data` - the parsed metadata side-file
pub async fn get_record_extra_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let record = state
        .assets
        .resolve(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("record {}", id)))?;

    let extra = state
        .assets
        .read_side_file_json(&record, EXTRA_DATA_EXTENSION)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("extra data of record {}", id)))?;

    Ok(ApiResponse::new(extra))
}

/// `POST /records/:id/srt` - regenerate the subtitle file, returning its
/// bare file name
pub async fn generate_record_srt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<String>>> {
    let generated = state
        .subtitles
        .generate(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("record {} or its extra data", id)))?;

    Ok(ApiResponse::new(generated.file_name))
}
