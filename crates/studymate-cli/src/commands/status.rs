use crate::client::{ClientError, DaemonClient};
use anyhow::Result;
use serde::Serialize;
use studymate_protocol::{Request, Response, SessionMode, SubjectId};

use super::timer::mode_label;

#[derive(Serialize)]
struct StatusOutput {
    mode: SessionMode,
    running: bool,
    completed: bool,
    total_seconds: u64,
    remaining_seconds: u64,
    remaining_formatted: String,
    progress: f32,
    subject_id: SubjectId,
}

pub async fn execute(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    match client.send(Request::GetStatus).await {
        Ok(Response::TimerStatus {
            total_seconds,
            remaining_seconds,
            progress,
            running,
            completed,
            mode,
            subject_id,
        }) => {
            let output = StatusOutput {
                mode,
                running,
                completed,
                total_seconds,
                remaining_seconds,
                remaining_formatted: format_duration(remaining_seconds),
                progress,
                subject_id,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_formatted(&output);
            }
        }
        Ok(Response::Error { message }) => {
            if json {
                println!("{}", serde_json::json!({ "error": message }));
            } else {
                eprintln!("Error: {}", message);
            }
            std::process::exit(1);
        }
        Ok(_) => {
            if json {
                println!(r#"{{"error": "unexpected response"}}"#);
            } else {
                eprintln!("Error: unexpected response from the daemon");
            }
            std::process::exit(1);
        }
        Err(ClientError::DaemonNotRunning) => {
            if json {
                println!(r#"{{"error": "daemon not running", "running": false}}"#);
            } else {
                println!("⚫ Daemon not running");
            }
        }
        Err(ClientError::Timeout) => {
            if json {
                println!(r#"{{"error": "timeout"}}"#);
            } else {
                eprintln!("Error: timed out connecting to the daemon");
            }
            std::process::exit(1);
        }
        Err(error) => {
            if json {
                println!("{}", serde_json::json!({ "error": error.to_string() }));
            } else {
                eprintln!("Error: {}", error);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_formatted(output: &StatusOutput) {
    let mode = mode_label(output.mode);

    if output.completed {
        println!("✅ {} session complete", capitalize(mode));
    } else if output.running {
        println!("🟢 {} session running", capitalize(mode));
    } else {
        println!("⏸  {} session paused", capitalize(mode));
    }

    println!(
        "   Remaining: {} of {}",
        format_duration(output.remaining_seconds),
        format_duration(output.total_seconds)
    );
    println!("   Progress: {}", progress_bar(output.progress, 20));

    if output.subject_id != studymate_core::UNASSIGNED_SUBJECT {
        println!("   Subject: #{}", output.subject_id);
    }
}

fn capitalize(value: &str) -> String {
    let mut characters = value.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

fn progress_bar(progress: f32, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        (progress.clamp(0.0, 1.0) * 100.0).round() as u32
    )
}

pub(crate) fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;

    if minutes > 0 {
        format!("{} min {} sec", minutes, remaining_seconds)
    } else {
        format!("{} sec", remaining_seconds)
    }
}
