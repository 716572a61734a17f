use std::time::Duration;

use anyhow::Result;

use crate::client::DaemonClient;
use crate::daemon_launcher::ensure_daemon_running;

pub async fn execute() -> Result<()> {
    let client = DaemonClient::new().with_timeout(Duration::from_secs(1));

    if client.is_daemon_running().await {
        println!("🟢 The daemon is already running");
        return Ok(());
    }

    ensure_daemon_running().await?;
    println!("🟢 Daemon started");

    Ok(())
}
