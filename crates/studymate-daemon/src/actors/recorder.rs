use std::sync::Arc;

use studymate_core::{CompletionNotifier, FailureObserver, StudySession, StudySessionRepository};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use super::timer::SessionCompleted;

/// Turns each completed countdown into a stored study session and a user
/// notification. Runs on its own task so a slow or broken store never holds
/// up the timer.
pub struct SessionRecorderBridge {
    completions: broadcast::Receiver<SessionCompleted>,
    session_repository: Option<Arc<dyn StudySessionRepository>>,
    notifier: Option<Arc<dyn CompletionNotifier>>,
    failure_observer: Option<Arc<dyn FailureObserver>>,
}

impl SessionRecorderBridge {
    pub fn new(
        completions: broadcast::Receiver<SessionCompleted>,
        session_repository: Option<Arc<dyn StudySessionRepository>>,
        notifier: Option<Arc<dyn CompletionNotifier>>,
        failure_observer: Option<Arc<dyn FailureObserver>>,
    ) -> Self {
        Self {
            completions,
            session_repository,
            notifier,
            failure_observer,
        }
    }

    pub async fn run(mut self) {
        info!("session recorder started");

        loop {
            match self.completions.recv().await {
                Ok(event) => self.handle_completion(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session recorder lagged behind completions");
                }
                Err(RecvError::Closed) => break,
            }
        }

        debug!("session recorder stopped");
    }

    fn handle_completion(&self, event: SessionCompleted) {
        let mut session = StudySession::completed(
            event.subject_id,
            event.started_at,
            event.ended_at,
            event.total_duration,
            event.mode,
        );

        self.record(&mut session);

        if let Some(notifier) = &self.notifier {
            notifier.notify_session_complete(event.mode);
        }
    }

    fn record(&self, session: &mut StudySession) {
        let Some(repository) = &self.session_repository else {
            debug!("no session repository configured, session not recorded");
            return;
        };

        match repository.record(session) {
            Ok(id) => {
                info!(
                    session_id = id,
                    subject_id = session.subject_id,
                    mode = %session.mode,
                    duration_minutes = session.duration_minutes,
                    "study session recorded"
                );
            }
            Err(error) => {
                error!(%error, mode = %session.mode, "failed to record study session");

                if let Some(observer) = &self.failure_observer {
                    observer.report_failure("StudyMate - Session not saved", &error.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use studymate_adapters::{
        FailingStudySessionRepository, InMemoryStudySessionRepository, RecordingNotifier,
    };
    use studymate_core::{SessionMode, UNASSIGNED_SUBJECT};

    use crate::actors::{TimerActor, TimerSettings};

    fn completion(mode: SessionMode, total_duration: Duration) -> SessionCompleted {
        let ended_at = Utc::now();
        SessionCompleted {
            subject_id: 3,
            started_at: ended_at - chrono::Duration::minutes(40),
            ended_at,
            total_duration,
            mode,
        }
    }

    #[tokio::test]
    async fn records_session_then_notifies() {
        let (sender, receiver) = broadcast::channel(4);
        let repository = Arc::new(InMemoryStudySessionRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let bridge = SessionRecorderBridge::new(
            receiver,
            Some(repository.clone()),
            Some(notifier.clone()),
            Some(notifier.clone()),
        );
        let task = tokio::spawn(bridge.run());

        let event = completion(SessionMode::Focus, Duration::from_secs(25 * 60));
        sender.send(event.clone()).unwrap();
        drop(sender);
        task.await.unwrap();

        let sessions = repository.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].subject_id, 3);
        assert_eq!(sessions[0].started_at, event.started_at);
        assert_eq!(sessions[0].ended_at, event.ended_at);
        assert_eq!(sessions[0].duration_minutes, 25);
        assert_eq!(sessions[0].mode, SessionMode::Focus);

        assert_eq!(notifier.completions(), vec![SessionMode::Focus]);
        assert!(notifier.failures().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_reported_and_notification_still_sent() {
        let (sender, receiver) = broadcast::channel(4);
        let notifier = Arc::new(RecordingNotifier::new());

        let bridge = SessionRecorderBridge::new(
            receiver,
            Some(Arc::new(FailingStudySessionRepository::unavailable())),
            Some(notifier.clone()),
            Some(notifier.clone()),
        );
        let task = tokio::spawn(bridge.run());

        sender
            .send(completion(SessionMode::Break, Duration::from_secs(300)))
            .unwrap();
        drop(sender);
        task.await.unwrap();

        let failures = notifier.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].1.contains("database is locked"));
        assert_eq!(notifier.completions(), vec![SessionMode::Break]);
    }

    #[tokio::test]
    async fn runs_without_collaborators() {
        let (sender, receiver) = broadcast::channel(4);
        let bridge = SessionRecorderBridge::new(receiver, None, None, None);
        let task = tokio::spawn(bridge.run());

        sender
            .send(completion(SessionMode::Focus, Duration::from_secs(60)))
            .unwrap();
        drop(sender);

        assert!(task.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_store_leaves_timer_untouched() {
        let (actor, handle) = TimerActor::new(TimerSettings {
            auto_advance: false,
            ..TimerSettings::default()
        });
        let notifier = Arc::new(RecordingNotifier::new());
        let bridge = SessionRecorderBridge::new(
            handle.completions(),
            Some(Arc::new(FailingStudySessionRepository::unavailable())),
            Some(notifier.clone()),
            Some(notifier.clone()),
        );
        tokio::spawn(actor.run());
        tokio::spawn(bridge.run());

        handle.configure(Duration::from_secs(2)).await.unwrap();
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        let status = handle.status().await.unwrap();
        assert!(status.state.is_completed());
        assert_eq!(status.state.remaining_duration(), Duration::ZERO);
        assert_eq!(status.mode, SessionMode::Focus);
        assert_eq!(status.subject_id, UNASSIGNED_SUBJECT);

        assert_eq!(notifier.failures().len(), 1);
        assert_eq!(notifier.completions(), vec![SessionMode::Focus]);

        let state = handle.reset().await.unwrap().state;
        assert!(!state.is_completed());
        assert_eq!(state.remaining_duration(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_completion_is_recorded_with_selected_subject() {
        let (actor, handle) = TimerActor::new(TimerSettings::default());
        let repository = Arc::new(InMemoryStudySessionRepository::new());
        let bridge = SessionRecorderBridge::new(
            handle.completions(),
            Some(repository.clone()),
            None,
            None,
        );
        tokio::spawn(actor.run());
        tokio::spawn(bridge.run());

        handle.select_subject(9).await.unwrap();
        handle.configure(Duration::from_secs(120)).await.unwrap();
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_secs(121)).await;

        let sessions = repository.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].subject_id, 9);
        assert_eq!(sessions[0].duration_minutes, 2);
        assert_eq!(sessions[0].mode, SessionMode::Focus);
        assert!(sessions[0].ended_at >= sessions[0].started_at);
    }
}
