use std::{net::SocketAddr, sync::Arc};

use tokio::signal;
use tracing::{error, info};

use tablestack_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);
    api::metrics::register_metrics();
    api::handlers::health::init_start_time();

    let db_pool =
        api::db::establish_connection_with_config(&api::db::DbConfig::from(&cfg)).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }
    let db = Arc::new(db_pool);

    let (event_sender, event_rx) = api::events::create_event_channel(cfg.event_channel_capacity);
    tokio::spawn(api::events::process_events(event_rx));

    let state = api::AppState::new(db, cfg.clone(), event_sender);
    let app = api::app_router(state);

    let addr: SocketAddr = cfg.server_addr().parse()?;
    info!("tablestack-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
