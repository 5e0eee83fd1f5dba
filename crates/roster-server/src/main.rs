//! # Roster Server
//!
//! Main entry point: user CRUD over HTTP with read-through caching of the
//! listing and per-user routes.

use roster_config::{AppConfig, ConfigLoader};
use roster_core::{telemetry, RosterError, RosterResult};
use roster_rest::{create_router, AppState};
use roster_server::di::{build_cache_module, build_user_service, CacheResolver};
use roster_server::startup::{print_banner, print_startup_info};
use roster_service::{cache::cache_metrics, CacheMediator};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_tracing(&config.observability) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    info!("Starting Roster Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let result = run(config).await;
    telemetry::shutdown_telemetry();

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> RosterResult<()> {
    print_banner();
    info!("Environment: {}", config.app.environment);

    cache_metrics::register_metrics();

    let persistence = build_user_service(&config.database).await?;
    let cache_module = build_cache_module(&config.redis)?;
    let cache = CacheMediator::new(cache_module.cache_store());

    let state = AppState::new(persistence.user_service, cache);
    let router = create_router(state, &config.server, &config.cache);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RosterError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&config);
    info!("REST server listening on {}", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RosterError::Internal(format!("Server error: {}", e)));

    if let Some(pool) = persistence.pool {
        pool.close().await;
    }

    info!("Server shutdown complete");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
