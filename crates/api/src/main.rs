use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidpod_api::config::ServerConfig;
use vidpod_api::router::build_app_router;
use vidpod_api::state::AppState;
use vidpod_federation::queue::FederationQueue;
use vidpod_federation::sender::FederationSender;
use vidpod_pipeline::VideoLifecycle;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidpod_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = vidpod_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    vidpod_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    vidpod_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    // Outbound federation runs as a single background task draining the
    // queue; lifecycle operations only ever enqueue.
    let (queue, receiver) = FederationQueue::new();
    let sender = FederationSender::new(pool.clone(), config.pod.web.scheme.clone());
    let sender_handle = tokio::spawn(sender.run(receiver));
    tracing::info!("Federation sender task started");

    let lifecycle = Arc::new(VideoLifecycle::new(
        pool.clone(),
        config.pod.clone(),
        queue.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        lifecycle,
        queue,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped, shutting down federation sender");

    // axum has returned, so the state (and with it the last queue
    // producer) is gone; the drain loop would end on its own, but an
    // in-flight retry sleep can hold it open. Cut it off.
    sender_handle.abort();
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
