//! TrainHub Console — session/authorization core
//!
//! Entry point that wires the session stack together, establishes the
//! session against the backend, and keeps it alive (proactive refresh
//! included) until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use trainhub_core::config::AppConfig;
use trainhub_core::error::AppError;

use trainhub_auth::permission::RouteGuard;
use trainhub_auth::session::SessionService;
use trainhub_auth::token::TokenDecoder;
use trainhub_client::{
    ApiClient, AuthApi, AuthContext, HttpRefreshTransport, NavParams, bootstrap_session,
    build_http_client,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TRAINHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main console run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TrainHub console v{}", env!("CARGO_PKG_VERSION"));

    // Launch parameters (workspace_id, timeZone) are read once and
    // preserved across every generated link.
    let nav = NavParams::from_query(&std::env::var("TRAINHUB_BOOT_QUERY").unwrap_or_default());

    // ── Step 1: HTTP client + refresh transport ──────────────────
    let http = build_http_client(&config.api)?;
    let transport = Arc::new(HttpRefreshTransport::new(http.clone(), &config.api));

    // ── Step 2: Session service ──────────────────────────────────
    let session = Arc::new(SessionService::new(
        TokenDecoder::new(),
        transport,
        Duration::from_secs(config.auth.refresh_lead_seconds),
    ));

    // ── Step 3: Establish the session ────────────────────────────
    tracing::info!("Establishing session...");
    bootstrap_session(&session, &config.auth, nav.workspace_id.clone()).await?;

    let api = ApiClient::new(http.clone(), &config.api, Arc::clone(&session));
    let auth_api = AuthApi::new(http, &config.api, Arc::clone(&session));
    let context = AuthContext::new(Arc::clone(&session), auth_api, nav);

    if let Some(user) = context.user() {
        tracing::info!(
            user_id = %user.id,
            name = %user.name,
            role = %user.role,
            workspace_id = %user.workspace_id,
            permission_flags = user.permissions.len(),
            "Session established"
        );

        let guard = RouteGuard::new();
        tracing::debug!(
            training_plans = guard.allows_path(&user.permissions, "/training-plans"),
            simulations = guard.allows_path(&user.permissions, "/simulations"),
            users = guard.allows_path(&user.permissions, "/users"),
            "Route access resolved"
        );
    }

    // ── Step 4: Probe the API through the pipeline ───────────────
    match api.get("/api/assignments").await {
        Ok(response) => {
            tracing::info!(status = %response.status(), "Assignment feed reachable");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Assignment feed probe failed");
        }
    }

    // ── Step 5: Keep the session alive until shutdown ────────────
    tracing::info!("Session active; press Ctrl+C to exit");
    shutdown_signal().await;

    tracing::info!("Shutdown signal received; clearing session");
    context.logout();

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
}
