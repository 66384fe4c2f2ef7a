//! Shared handler state

use crate::record::{RecordAssetResolver, RecordStore};
use crate::subtitle::{SubtitleEncoder, SubtitleGenerator};
use std::sync::Arc;

/// Services every request handler can reach. Cloned per request; all
/// fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub assets: RecordAssetResolver,
    pub subtitles: SubtitleGenerator,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, encoder: Arc<dyn SubtitleEncoder>) -> Self {
        let assets = RecordAssetResolver::new(Arc::clone(&store));
        let subtitles = SubtitleGenerator::new(assets.clone(), encoder);

        Self {
            store,
            assets,
            subtitles,
        }
    }
}
