//! VoteHub session runner
//!
//! Joins the live vote as one voter, keeps presence fresh, and logs every
//! change to the shared view until interrupted.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, fmt};

use votehub_core::config::AppConfig;
use votehub_core::error::AppError;
use votehub_core::traits::store::SyncStore;
use votehub_entity::Catalog;
use votehub_realtime::{SessionUpdate, VotingSession};
use votehub_security::DefaultGuard;
use votehub_store::StoreManager;

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
        tracing::error!("Session error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/default.toml`, the environment overlay and `VOTEHUB__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("VOTEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Voter identity from the first argument or `VOTEHUB_VOTER`
fn voter_name() -> Result<String, AppError> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VOTEHUB_VOTER").ok())
        .ok_or_else(|| {
            AppError::validation("Pass a voter name as the first argument or set VOTEHUB_VOTER")
        })
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting VoteHub v{}", env!("CARGO_PKG_VERSION"));

    let voter = voter_name()?;

    // ── Store ────────────────────────────────────────────────────
    tracing::info!(backend = %config.store.backend, "Connecting to shared store...");
    let store: Arc<dyn SyncStore> = Arc::new(StoreManager::new(&config.store)?);
    if !store.health_check().await? {
        tracing::warn!("Store health check failed; continuing with live subscriptions");
    }

    // ── Session ──────────────────────────────────────────────────
    let session = VotingSession::open(
        store,
        Arc::new(DefaultGuard::new(&config)),
        Arc::new(Catalog::seeded()),
        &config,
        &voter,
    )
    .await?;
    tracing::info!(voter = %session.voter(), "Joined the vote");

    let mut updates = session.updates();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, leaving the vote...");
                break;
            }
            update = updates.recv() => match update {
                Ok(SessionUpdate::Celebrate { notification }) => {
                    tracing::info!(message = %notification.message, "Celebrate");
                }
                Ok(update) => log_update(&session, &update),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session updates lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    session.close().await;
    tracing::info!("VoteHub session closed");
    Ok(())
}

fn log_update(session: &VotingSession, update: &SessionUpdate) {
    match update {
        SessionUpdate::LedgerChanged { .. } | SessionUpdate::SubmissionsChanged { .. } => {
            let standings = session.standings();
            tracing::info!(
                voters = standings.voters,
                live = standings.live_users,
                submissions = standings.total_submissions,
                "Standings updated"
            );
        }
        SessionUpdate::ActivityChanged { recent } => {
            if let Some(latest) = session.recent_activity().first() {
                tracing::info!(recent, kind = %latest.kind, "{}", latest.message);
            }
        }
        other => tracing::debug!(update = ?other, "Session update"),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
