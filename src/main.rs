use tower_http::{cors::CorsLayer, trace::TraceLayer};

use mufradat_backend::config::Config;
use mufradat_backend::db::{self, DictionaryStore};
use mufradat_backend::logging;
use mufradat_backend::processor::{RunnerOptions, WordProcessor};
use mufradat_backend::routes;
use mufradat_backend::services::enrichment::DictionaryEnricher;
use mufradat_backend::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let pool = match db::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, url = %config.database_url, "failed to open dictionary database");
            return;
        }
    };

    let store = match DictionaryStore::init(pool).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize dictionary store");
            return;
        }
    };

    let enricher = DictionaryEnricher::from_env();
    if !enricher.is_available() {
        tracing::warn!("LLM not configured, enrichment calls will fail until LLM_API_KEY is set");
    }

    let processor = WordProcessor::new(
        enricher,
        store.clone(),
        RunnerOptions {
            pause_poll: config.pause_poll,
            item_delay: config.item_delay,
        },
    );

    let state = AppState::new(processor.clone(), store);
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(%addr, "mufradat-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped, stopping batch processor");
    processor.stop();
    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
