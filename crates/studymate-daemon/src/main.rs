mod actors;
mod server;

use std::sync::Arc;

use actors::{NotifierActor, SessionRecorderBridge, TimerActor, TimerSettings};
use anyhow::Result;
use server::Server;
use studymate_adapters::SqliteStudySessionRepository;
use studymate_core::{
    CompletionNotifier, Config, FailureObserver, StorageConfig, StudySessionRepository,
};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("studymate_daemon=debug".parse()?),
        )
        .init();

    info!("studymate daemon starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        shutdown_sender.send(()).ok();
    });

    let (notifier_actor, notifier_handle) = NotifierActor::new(
        config.notifications.urgency,
        config.notifications.sound_enabled,
    );
    tokio::spawn(notifier_actor.run());

    let (timer_actor, timer_handle) = TimerActor::new(TimerSettings::from(&config.timer));

    let notifier = Arc::new(notifier_handle);
    let bridge = SessionRecorderBridge::new(
        timer_handle.completions(),
        create_session_repository(&config.storage),
        Some(notifier.clone() as Arc<dyn CompletionNotifier>),
        Some(notifier as Arc<dyn FailureObserver>),
    );

    tokio::spawn(timer_actor.run());
    tokio::spawn(bridge.run());

    let server = Server::new(timer_handle);
    server.run(shutdown_receiver).await?;

    info!("studymate daemon stopped");
    Ok(())
}

fn create_session_repository(storage: &StorageConfig) -> Option<Arc<dyn StudySessionRepository>> {
    let database_path = storage.resolved_database_path();

    if let Some(parent) = database_path.parent() {
        if let Err(error) = std::fs::create_dir_all(parent) {
            warn!(%error, "failed to create data directory, sessions will not be persisted");
            return None;
        }
    }

    match SqliteStudySessionRepository::new(&database_path) {
        Ok(repository) => {
            info!(?database_path, "session persistence enabled");
            Some(Arc::new(repository))
        }
        Err(error) => {
            warn!(%error, "failed to initialize session repository, sessions will not be persisted");
            None
        }
    }
}
