//! Composition root - wires the data source, cache, session and token service.

use std::sync::Arc;

use anyhow::Context;

use reviewhub_core::ports::{ReviewSource, Transport};
use reviewhub_core::service::{ReviewClient, SessionStore};
use reviewhub_infra::{
    DirSnapshotLoader, FileSessionStorage, HttpConfig, HttpSnapshotLoader, InMemoryCache,
    OpaqueTokenService, RemoteSource, ReqwestTransport, SnapshotLoader, SnapshotSource,
};

use crate::config::{AppConfig, Mode, SnapshotLocation};

/// Everything a command needs.
pub struct AppState {
    pub client: ReviewClient,
}

impl AppState {
    /// Build the client. The source is selected here, once.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(FileSessionStorage::new(&config.session_dir));
        let session = Arc::new(SessionStore::restore(storage).await);

        let source: Arc<dyn ReviewSource> = match config.mode {
            Mode::Live => {
                let transport = http_transport(&config.api_url, config)?;
                tracing::info!(api_url = %config.api_url, "Using live endpoint");
                Arc::new(RemoteSource::new(transport, session.clone()))
            }
            Mode::Snapshot => {
                let loader: Arc<dyn SnapshotLoader> = match &config.snapshot {
                    SnapshotLocation::Url(url) => {
                        tracing::info!(snapshot_url = %url, "Using read-only snapshot");
                        Arc::new(HttpSnapshotLoader::new(http_transport(url, config)?))
                    }
                    SnapshotLocation::Dir(dir) => {
                        tracing::info!(snapshot_dir = %dir.display(), "Using read-only snapshot");
                        Arc::new(DirSnapshotLoader::new(dir))
                    }
                };
                Arc::new(SnapshotSource::new(loader))
            }
        };

        let client = ReviewClient::new(
            source,
            Arc::new(InMemoryCache::new()),
            session,
            Arc::new(OpaqueTokenService::new()),
        )
        .with_cache_ttl(config.cache_ttl);

        Ok(Self { client })
    }
}

fn http_transport(base_url: &str, config: &AppConfig) -> anyhow::Result<Arc<dyn Transport>> {
    let transport = ReqwestTransport::new(&HttpConfig {
        base_url: base_url.to_string(),
        timeout: config.timeout,
    })
    .context("failed to build HTTP client")?;
    Ok(Arc::new(transport))
}
