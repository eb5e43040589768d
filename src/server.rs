//! HTTP server initialization and runtime setup.
//!
//! Handles cache backend selection, upstream client setup, the optional
//! file cache sweeper, and the Axum server lifecycle.

use crate::application::services::{CacheAside, TmdbService};
use crate::config::{CacheBackendConfig, Config};
use crate::infrastructure::cache::{CacheBackend, FileCache, RedisCache, run_sweeper};
use crate::infrastructure::tmdb::TmdbClient;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Builds the cache backend chosen by configuration.
///
/// The choice is made once; there is no fallback between backends.
///
/// # Errors
///
/// Returns an error if Redis is configured but unreachable, or the cache
/// directory cannot be created.
pub async fn build_cache_backend(config: &Config) -> Result<Arc<dyn CacheBackend>> {
    match config.cache_backend() {
        CacheBackendConfig::Redis { url, op_timeout } => {
            let redis = RedisCache::connect(&url, op_timeout)
                .await
                .context("Failed to initialize Redis cache")?;
            tracing::info!("Cache enabled (Redis)");
            Ok(Arc::new(redis))
        }
        CacheBackendConfig::File { dir } => {
            let files = FileCache::open(&dir, config.cache_ttl())
                .await
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
            tracing::info!("No Redis configured, using local file cache");

            let files = Arc::new(files);
            if let Some(every) = config.sweep_interval() {
                tokio::spawn(run_sweeper(files.clone(), every));
                tracing::info!("File cache sweeper started (every {}s)", every.as_secs());
            }
            Ok(files)
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Cache backend (Redis or local files)
/// - TMDB client
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The cache backend cannot be initialized
/// - The upstream client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let backend = build_cache_backend(&config).await?;
    let cache = CacheAside::new(backend, config.cache_ttl());

    let upstream = TmdbClient::new(
        config.tmdb_base_url.clone(),
        config.tmdb_api_key.clone(),
        config.upstream_timeout(),
    )
    .context("Failed to build TMDB client")?;

    let tmdb_service = TmdbService::new(cache, Arc::new(upstream))?;
    let state = AppState::new(Arc::new(tmdb_service));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
