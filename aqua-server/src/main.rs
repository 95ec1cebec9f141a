//! aqua-server binary
//!
//! Loads configuration, opens the database, optionally bootstraps the first
//! admin and serves the HTTP API until Ctrl+C or SIGTERM.

use aqua_server::{AppState, Config, accounts, api, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "Starting aqua-server"
    );

    let state = AppState::new(&config).await?;

    if let Some((username, password)) = &config.bootstrap_admin {
        match accounts::bootstrap_admin(&state.pool, username, password).await {
            Ok(Some(admin)) => tracing::info!(user_id = admin.id, "Bootstrap admin created"),
            Ok(None) => tracing::debug!("Admin already present, bootstrap skipped"),
            Err(e) => tracing::error!(error = %e, "Failed to bootstrap admin"),
        }
    }

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("aqua-server listening on {addr}");

    axum::serve(listener, api::build_app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pool.close().await;
    tracing::info!("aqua-server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
