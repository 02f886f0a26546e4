use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use ticketing_server::config::Config;
use ticketing_server::db;
use ticketing_server::routes::create_routes;
use ticketing_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ticketing_server=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let pool = db::connect(&config)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let addr = config.socket_addr();
    let state = AppState::postgres(pool.clone(), config);
    state
        .uploads
        .ensure_dir()
        .await
        .expect("Failed to create upload directory");

    tracing::info!(dir = %state.uploads.dir().display(), "Serving uploads");

    let app = create_routes(state);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    pool.close().await;
    tracing::info!("Database pool closed, shutting down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
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
