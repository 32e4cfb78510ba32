//! `webshot-api` server.
//!
//! Loads the configuration from the environment (and `app.env`), then serves
//! the capture API until Ctrl+C or SIGTERM.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! curl -X POST http://localhost:3000/api/web-screenshot \
//!   -H "Content-Type: application/json" \
//!   -d '{"url":"https://example.com","viewportWidth":1280,"viewportHeight":1024,"fullPage":true,"waitStrategy":"load-complete","fileName":"shot1.jpg"}'
//! ```

use std::sync::Arc;

use tokio::signal;
use webshot_api::ChromeBrowserFactory;
use webshot_api::integrations::axum::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("🚀 Starting webshot-api...");

    let config = webshot_api::from_env()?;
    let bind_addr = config.bind_addr;

    let factory = Arc::new(ChromeBrowserFactory::from_path(config.chrome_path.clone()));
    let state = AppState::from_config(factory, config);
    let stats_state = state.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("✅ Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("📊 Final stats: {}", stats_state.pipeline().stats());
    log::info!("👋 Shutdown complete");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
///
/// In-flight captures finish (and tear down their sessions) before the
/// server returns.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
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

    log::info!("🛑 Shutdown signal received, waiting for in-flight captures...");
}
