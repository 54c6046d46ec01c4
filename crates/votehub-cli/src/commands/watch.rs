//! Live activity.

use clap::Args;
use tokio::sync::broadcast::error::RecvError;

use crate::output;
use votehub_core::error::AppError;
use votehub_realtime::SessionUpdate;

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Voter name
    #[arg(short, long)]
    pub voter: String,
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::connect(&config)?;
    let session = super::open_session(store, &config, &args.voter).await?;
    let mut updates = session.updates();

    output::print_success(&format!("Watching as {} (Ctrl-C to stop)", session.voter()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => match update {
                Ok(SessionUpdate::ActivityChanged { .. }) => {
                    if let Some(latest) = session.recent_activity().first() {
                        println!("  [{}] {}", latest.kind, latest.message);
                    }
                }
                Ok(SessionUpdate::Celebrate { notification }) => {
                    println!("  🎉 {}", notification.message);
                }
                Ok(SessionUpdate::PresenceChanged { live }) => {
                    output::print_kv("Live users", &live.to_string());
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    output::print_warning(&format!("Skipped {skipped} updates"));
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    session.close().await;
    Ok(())
}
