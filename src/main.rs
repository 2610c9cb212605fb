use tokio::net::TcpListener;
use tracing::{info, warn};
use trip_store::config::AppConfig;
use trip_store::db::{ensure_schema, init_pool};
use trip_store::error::AppError;
use trip_store::routes::create_router;
use trip_store::services::store::RecordStore;
use trip_store::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    info!("database {} ready", config.database_url);

    let state = AppState::new(config.clone(), RecordStore::new(db.clone()));
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    info!(
        "serving {} at http://{addr}",
        config.static_root.display()
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trip_store=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
