//! In-process maintenance scheduler.
//!
//! Runs the orchestrator on a fixed interval. The first run fires
//! immediately at startup so reminders and rollovers missed while the
//! server was down are caught up without waiting a full interval.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use paddock_notify::Orchestrator;

/// Run maintenance periodically until cancelled.
///
/// The orchestrator logs each run's summary itself; this loop only
/// surfaces failures and runs that finished with partial errors.
pub async fn run(orchestrator: Orchestrator, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Maintenance scheduler started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Maintenance scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                match orchestrator.run_maintenance().await {
                    Ok(summary) => {
                        if summary.errors_count > 0 {
                            tracing::warn!(
                                errors = summary.errors_count,
                                "Scheduled maintenance finished with errors"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled maintenance failed");
                    }
                }
            }
        }
    }
}
