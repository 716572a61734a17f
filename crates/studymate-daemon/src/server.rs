use crate::actors::{TimerError, TimerHandle, TimerStatus};
use anyhow::{bail, Context, Result};
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, ListenerOptions,
};
use std::path::PathBuf;
use std::time::Duration;
use studymate_protocol::{Request, Response};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info, instrument, warn};

/// Requests are a few bytes; anything larger is a misbehaving peer.
const MAX_REQUEST_BYTES: usize = 4096;

pub struct Server {
    socket_path: PathBuf,
    timer_handle: TimerHandle,
}

impl Server {
    pub fn new(timer_handle: TimerHandle) -> Self {
        Self {
            socket_path: studymate_protocol::socket_path(),
            timer_handle,
        }
    }

    fn cleanup_stale_socket(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).context("failed to remove stale socket")?;
            debug!("removed stale socket file");
        }
        Ok(())
    }

    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: tokio::sync::broadcast::Receiver<()>) -> Result<()> {
        self.cleanup_stale_socket()?;

        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        let listener = ListenerOptions::new()
            .name(self.socket_path.as_os_str().to_fs_name::<GenericFilePath>()?)
            .create_tokio()
            .context("failed to bind local socket")?;

        info!(path = %self.socket_path.display(), "server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok(stream) => {
                            let timer_handle = self.timer_handle.clone();
                            tokio::spawn(async move {
                                if let Err(error) = handle_connection(stream, timer_handle).await {
                                    error!(%error, "connection handler failed");
                                }
                            });
                        }
                        Err(error) => {
                            error!(%error, "failed to accept connection");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        self.cleanup_socket();
        Ok(())
    }

    fn cleanup_socket(&self) {
        if let Err(error) = std::fs::remove_file(&self.socket_path) {
            debug!(%error, "socket file already removed");
        } else {
            debug!("socket file cleaned up");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.cleanup_socket();
    }
}

async fn handle_connection(mut stream: Stream, timer_handle: TimerHandle) -> Result<()> {
    debug!("new connection accepted");

    let request = read_request(&mut stream).await?;

    debug!(?request, "received request");

    let response = handle_request(request, &timer_handle).await;

    debug!(?response, "sending response");

    let response_bytes = bincode::serialize(&response)?;
    let response_length = (response_bytes.len() as u32).to_le_bytes();

    stream.write_all(&response_length).await?;
    stream.write_all(&response_bytes).await?;
    stream.flush().await?;

    Ok(())
}

async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request> {
    let mut length_buffer = [0u8; 4];
    reader.read_exact(&mut length_buffer).await?;
    let length = u32::from_le_bytes(length_buffer) as usize;

    if length > MAX_REQUEST_BYTES {
        bail!(
            "request of {} bytes exceeds the {} byte limit",
            length,
            MAX_REQUEST_BYTES
        );
    }

    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload).await?;

    bincode::deserialize(&payload).context("failed to deserialize request")
}

async fn handle_request(request: Request, timer_handle: &TimerHandle) -> Response {
    let result = match request {
        Request::Ping => return Response::Pong,
        Request::GetStatus => timer_handle.status().await,
        Request::Configure { duration_seconds } => {
            timer_handle
                .configure(Duration::from_secs(duration_seconds))
                .await
        }
        Request::Start => timer_handle.start().await,
        Request::Pause => timer_handle.pause().await,
        Request::Reset => timer_handle.reset().await,
        Request::Toggle => timer_handle.toggle().await,
        Request::SelectSubject { subject_id } => timer_handle.select_subject(subject_id).await,
    };

    into_response(result)
}

fn into_response(result: Result<TimerStatus, TimerError>) -> Response {
    match result {
        Ok(status) => Response::timer_status(&status.state, status.mode, status.subject_id),
        Err(error) => {
            warn!(%error, "request rejected");
            Response::Error {
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{TimerActor, TimerSettings};
    use studymate_protocol::SessionMode;

    fn spawn_timer() -> TimerHandle {
        let (actor, handle) = TimerActor::new(TimerSettings::default());
        tokio::spawn(actor.run());
        handle
    }

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut bytes = (payload.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[tokio::test]
    async fn reads_framed_request() {
        let bytes = frame(&bincode::serialize(&Request::Toggle).unwrap());

        let request = read_request(&mut bytes.as_slice()).await.unwrap();

        assert_eq!(request, Request::Toggle);
    }

    #[tokio::test]
    async fn rejects_oversized_length_prefix() {
        let bytes = u32::MAX.to_le_bytes();

        let error = read_request(&mut bytes.as_slice()).await.unwrap_err();

        assert!(error.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn rejects_garbage_payload() {
        let bytes = frame(&[0xff; 8]);

        assert!(read_request(&mut bytes.as_slice()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ping_returns_pong() {
        let handle = spawn_timer();

        assert_eq!(handle_request(Request::Ping, &handle).await, Response::Pong);
    }

    #[tokio::test(start_paused = true)]
    async fn configure_and_start_report_status() {
        let handle = spawn_timer();

        handle_request(
            Request::Configure {
                duration_seconds: 90,
            },
            &handle,
        )
        .await;
        let response = handle_request(Request::Start, &handle).await;

        assert!(matches!(
            response,
            Response::TimerStatus {
                total_seconds: 90,
                remaining_seconds: 90,
                running: true,
                completed: false,
                mode: SessionMode::Focus,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_is_an_error_response() {
        let handle = spawn_timer();

        let response = handle_request(
            Request::Configure {
                duration_seconds: 0,
            },
            &handle,
        )
        .await;

        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_and_subject_are_reflected_in_status() {
        let handle = spawn_timer();

        handle_request(Request::SelectSubject { subject_id: 5 }, &handle).await;
        handle_request(Request::Toggle, &handle).await;
        let response = handle_request(Request::GetStatus, &handle).await;

        assert!(matches!(
            response,
            Response::TimerStatus {
                total_seconds: 300,
                mode: SessionMode::Break,
                subject_id: 5,
                ..
            }
        ));
    }
}
