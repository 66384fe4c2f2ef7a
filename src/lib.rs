//! Record Server - browse captured recordings over HTTP.
//!
//! Lists records page by page, serves their media and metadata side-files,
//! and regenerates SRT subtitles from the recorded chat metadata on demand.

pub mod config;
pub mod paging;
pub mod record;
pub mod server;
pub mod subtitle;
pub mod utils;

use config::ServerConfig;
use record::JsonRecordStore;
use server::AppState;
use std::sync::Arc;
use subtitle::DanmakuSrtEncoder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::AppResult;

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "record_server=debug,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the server until shutdown
pub async fn run(config: ServerConfig) -> AppResult<()> {
    tracing::info!("Starting Record Server v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonRecordStore::load(&config.records_path)?;
    tracing::info!(
        "Serving {} records from {:?}",
        store.len(),
        config.records_path
    );

    let state = AppState::new(Arc::new(store), Arc::new(DanmakuSrtEncoder::default()));

    server::serve(config.bind_addr, state).await
}
