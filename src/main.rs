use std::time::Duration;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use linktrack_auth::config::server::ServerConfig;
use linktrack_auth::modules::auth::repository::TokenRepository;
use linktrack_auth::router::init_router;
use linktrack_auth::state::init_app_state;

/// How often expired refresh tokens are swept. Advisory: expired tokens are
/// already rejected at redemption time.
const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await;

    tokio::spawn(sweep_expired_tokens(state.db.clone()));

    let app = init_router(state);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("auth-service listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    info!("Server exited");
}

async fn sweep_expired_tokens(db: sqlx::PgPool) {
    let mut interval = tokio::time::interval(TOKEN_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        match TokenRepository::delete_expired(&db).await {
            Ok(0) => {}
            Ok(purged) => info!(purged, "Purged expired refresh tokens"),
            Err(e) => warn!(error = %e, "Failed to purge expired refresh tokens"),
        }
    }
}

/// Resolves on SIGINT or SIGTERM; the server then stops accepting new
/// connections and awaits in-flight requests.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install SIGINT handler");
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
