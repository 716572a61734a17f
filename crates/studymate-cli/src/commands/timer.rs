use crate::client::{ClientError, DaemonClient};
use anyhow::{bail, Context, Result};
use studymate_protocol::{Request, Response, SessionMode};

use super::status::format_duration;

pub async fn set(minutes: u64) -> Result<()> {
    let status = send(Request::Configure {
        duration_seconds: session_seconds(minutes)?,
    })
    .await?;

    println!(
        "Timer set to {} ({})",
        format_duration(status.total_seconds),
        mode_label(status.mode)
    );
    Ok(())
}

pub async fn start() -> Result<()> {
    let status = send(Request::Start).await?;

    if status.completed {
        println!("Session already finished. Run 'studymate reset' to go again.");
    } else {
        println!("▶ {} running", mode_label(status.mode));
        println!("   Remaining: {}", format_duration(status.remaining_seconds));
    }
    Ok(())
}

pub async fn pause() -> Result<()> {
    let status = send(Request::Pause).await?;

    println!("⏸  Paused");
    println!("   Remaining: {}", format_duration(status.remaining_seconds));
    Ok(())
}

pub async fn reset() -> Result<()> {
    let status = send(Request::Reset).await?;

    println!(
        "Timer reset to {} ({})",
        format_duration(status.total_seconds),
        mode_label(status.mode)
    );
    Ok(())
}

pub async fn toggle() -> Result<()> {
    let status = send(Request::Toggle).await?;

    println!(
        "Switched to {} ({})",
        mode_label(status.mode),
        format_duration(status.total_seconds)
    );
    Ok(())
}

fn session_seconds(minutes: u64) -> Result<u64> {
    if minutes == 0 {
        bail!("session length must be at least one minute");
    }

    minutes
        .checked_mul(60)
        .context("session length is too large")
}

pub(crate) struct TimerSummary {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub completed: bool,
    pub mode: SessionMode,
}

pub(crate) async fn send(request: Request) -> Result<TimerSummary> {
    let client = DaemonClient::new();

    match client.send(request).await {
        Ok(Response::TimerStatus {
            total_seconds,
            remaining_seconds,
            completed,
            mode,
            ..
        }) => Ok(TimerSummary {
            total_seconds,
            remaining_seconds,
            completed,
            mode,
        }),
        Ok(Response::Error { message }) => {
            bail!("{}", message);
        }
        Ok(_) => {
            bail!("unexpected response from the daemon");
        }
        Err(ClientError::DaemonNotRunning) => {
            eprintln!("⚫ The daemon is not running");
            eprintln!("   Start it first with: studymate daemon");
            std::process::exit(1);
        }
        Err(ClientError::Timeout) => {
            bail!("timed out connecting to the daemon");
        }
        Err(error) => {
            bail!("{}", error);
        }
    }
}

pub(crate) fn mode_label(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Focus => "study",
        SessionMode::Break => "break",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels_are_user_facing() {
        assert_eq!(mode_label(SessionMode::Focus), "study");
        assert_eq!(mode_label(SessionMode::Break), "break");
    }

    #[tokio::test]
    async fn set_rejects_zero_minutes_before_contacting_daemon() {
        let result = set(0).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn set_rejects_overflowing_minutes_before_contacting_daemon() {
        let result = set(u64::MAX / 30).await;

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("session length is too large"));
    }

    #[test]
    fn session_seconds_converts_minutes() {
        assert_eq!(session_seconds(25).unwrap(), 1500);
        assert_eq!(session_seconds(u64::MAX / 60).unwrap(), (u64::MAX / 60) * 60);
        assert!(session_seconds(u64::MAX / 60 + 1).is_err());
    }
}
