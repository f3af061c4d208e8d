//! One-shot maintenance runner.
//!
//! Executes the same sequence the API's in-process scheduler runs (recurring
//! rollover, reminder/overdue/invitation scans, retention cleanup), then
//! exits. Intended for cron or a container scheduler when the API is
//! deployed with `MAINTENANCE_ENABLED=false`.
//!
//! Exits non-zero only when the store itself is unreachable; sub-task
//! errors are logged and reported in the summary instead.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paddock_db::{PgStore, Store};
use paddock_events::NotificationHub;
use paddock_notify::{
    DeliveryDispatcher, EngineConfig, NotificationService, Orchestrator, Triggers,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddock_worker=debug,paddock_notify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = paddock_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    paddock_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

    let engine_config = EngineConfig::from_env();
    let hub = Arc::new(NotificationHub::default());

    // Scan-produced notifications still reach push and email: the
    // dispatcher consumes this process's feed until the run is drained.
    let delivery_cancel = tokio_util::sync::CancellationToken::new();
    let dispatcher = DeliveryDispatcher::from_env(Arc::clone(&store));
    let delivery_handle = tokio::spawn(dispatcher.run(hub.subscribe(), delivery_cancel.clone()));

    let service = NotificationService::new(Arc::clone(&store), Arc::clone(&hub), &engine_config);
    let triggers = Triggers::new(Arc::clone(&store), service, engine_config);
    let orchestrator = Orchestrator::new(Arc::clone(&store), triggers);

    let summary = match orchestrator.run_maintenance().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Maintenance aborted, store unreachable");
            std::process::exit(1);
        }
    };

    for error in &summary.errors {
        tracing::warn!(%error, "Maintenance sub-task error");
    }

    delivery_cancel.cancel();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(60), delivery_handle).await;

    tracing::info!(
        duration_ms = summary.duration_ms,
        recurring = summary.recurring_schedules_processed,
        sent = summary.notifications_sent,
        notifications_cleaned = summary.notifications_cleaned_up,
        invitations_cleaned = summary.invitations_cleaned_up,
        errors = summary.errors_count,
        "Maintenance run complete"
    );
}
