//! StudyMate protocol definitions for CLI-daemon communication
//!
//! This crate defines the IPC protocol between the studymate CLI and daemon.
//! Every message is a little-endian `u32` length prefix followed by a bincode
//! payload; a connection carries exactly one request and one response.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use studymate_core::{SessionMode, SubjectId, TimerState};

/// Requests sent from CLI to daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Replace the current countdown with a fresh one of this length
    Configure {
        /// Session length in seconds, must be positive
        duration_seconds: u64,
    },
    /// Start or resume the countdown
    Start,
    /// Pause the countdown, keeping the remaining time
    Pause,
    /// Stop the countdown and restore the configured duration
    Reset,
    /// Switch between focus and break
    Toggle,
    /// Attach future recorded sessions to a subject
    SelectSubject { subject_id: SubjectId },
    /// Get current timer status
    GetStatus,
    /// Ping the daemon to check if it's alive
    Ping,
}

/// Responses sent from daemon to CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Snapshot of the timer
    TimerStatus {
        total_seconds: u64,
        remaining_seconds: u64,
        /// Fraction of the session already elapsed, between 0 and 1
        progress: f32,
        running: bool,
        completed: bool,
        mode: SessionMode,
        subject_id: SubjectId,
    },
    /// Generic success acknowledgment
    Ok,
    /// Error response with message
    Error { message: String },
    /// Pong response to ping
    Pong,
}

impl Response {
    pub fn timer_status(state: &TimerState, mode: SessionMode, subject_id: SubjectId) -> Self {
        Response::TimerStatus {
            total_seconds: state.total_duration().as_secs(),
            remaining_seconds: state.remaining_duration().as_secs(),
            progress: state.progress(),
            running: state.is_running(),
            completed: state.is_completed(),
            mode,
            subject_id,
        }
    }
}

#[cfg(unix)]
pub fn socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}/studymate.sock", uid))
}

#[cfg(windows)]
pub fn socket_path() -> PathBuf {
    let local_app_data = std::env::var("LOCALAPPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!(r"{}\studymate\studymate.sock", local_app_data))
}
