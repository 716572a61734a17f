use notify_rust::{Notification, Urgency};
use studymate_core::{CompletionNotifier, FailureObserver, NotificationUrgency, SessionMode};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub enum NotifierMessage {
    SessionComplete { mode: SessionMode },
    Alert { title: String, body: String },
}

#[derive(Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<NotifierMessage>,
}

impl NotifierHandle {
    pub fn send_session_complete(&self, mode: SessionMode) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Err(error) = sender
                .send(NotifierMessage::SessionComplete { mode })
                .await
            {
                error!(%error, "failed to send session complete notification message");
            }
        });
    }

    pub fn send_alert(&self, title: String, body: String) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Err(error) = sender
                .send(NotifierMessage::Alert { title, body })
                .await
            {
                error!(%error, "failed to send alert notification message");
            }
        });
    }
}

impl CompletionNotifier for NotifierHandle {
    fn notify_session_complete(&self, mode: SessionMode) {
        self.send_session_complete(mode);
    }
}

impl FailureObserver for NotifierHandle {
    fn report_failure(&self, title: &str, body: &str) {
        self.send_alert(title.to_string(), body.to_string());
    }
}

/// Summary and body shown when a session of `mode` runs out.
pub fn completion_message(mode: SessionMode) -> (&'static str, &'static str) {
    match mode {
        SessionMode::Focus => (
            "Study session complete!",
            "Great job! Take a well-deserved break.",
        ),
        SessionMode::Break => ("Break time completed!", "Time to get back to studying!"),
    }
}

pub struct NotifierActor {
    receiver: mpsc::Receiver<NotifierMessage>,
    urgency: Urgency,
    sound_enabled: bool,
}

impl NotifierActor {
    pub fn new(urgency: NotificationUrgency, sound_enabled: bool) -> (Self, NotifierHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let urgency = match urgency {
            NotificationUrgency::Low => Urgency::Low,
            NotificationUrgency::Normal => Urgency::Normal,
            NotificationUrgency::Critical => Urgency::Critical,
        };

        let actor = Self {
            receiver,
            urgency,
            sound_enabled,
        };

        let handle = NotifierHandle { sender };

        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("notifier actor started");

        while let Some(message) = self.receiver.recv().await {
            match message {
                NotifierMessage::SessionComplete { mode } => {
                    self.send_session_complete_notification(mode);
                }
                NotifierMessage::Alert { title, body } => {
                    self.send_alert_notification(&title, &body);
                }
            }
        }

        debug!("notifier actor stopped");
    }

    fn send_session_complete_notification(&self, mode: SessionMode) {
        let (summary, body) = completion_message(mode);

        match self.build_notification(summary, body).show() {
            Ok(_) => {
                debug!(%mode, "session complete notification sent");
            }
            Err(error) => {
                warn!(%error, %mode, "failed to show session complete notification");
            }
        }
    }

    fn send_alert_notification(&self, title: &str, body: &str) {
        match self.build_notification(title, body).show() {
            Ok(_) => {
                debug!(title, "alert notification sent");
            }
            Err(error) => {
                warn!(%error, title, "failed to show alert notification");
            }
        }
    }

    fn build_notification(&self, summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .urgency(self.urgency)
            .appname("StudyMate");

        if self.sound_enabled {
            notification.sound_name("complete");
        }

        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_and_break_have_distinct_messages() {
        let (focus_summary, focus_body) = completion_message(SessionMode::Focus);
        let (break_summary, break_body) = completion_message(SessionMode::Break);

        assert_eq!(focus_summary, "Study session complete!");
        assert_eq!(break_body, "Time to get back to studying!");
        assert_ne!(focus_summary, break_summary);
        assert_ne!(focus_body, break_body);
    }

    #[tokio::test]
    async fn handle_forwards_messages_until_dropped() {
        let (mut actor, handle) = NotifierActor::new(NotificationUrgency::Normal, false);

        handle.notify_session_complete(SessionMode::Break);
        handle.report_failure("Session not saved", "disk full");

        let first = actor.receiver.recv().await;
        let second = actor.receiver.recv().await;

        let mut received = vec![first, second];
        received.sort_by_key(|message| matches!(message, Some(NotifierMessage::Alert { .. })));

        assert!(matches!(
            received[0],
            Some(NotifierMessage::SessionComplete {
                mode: SessionMode::Break
            })
        ));
        assert!(matches!(
            &received[1],
            Some(NotifierMessage::Alert { title, body }) if title == "Session not saved" && body == "disk full"
        ));

        drop(handle);
        assert!(actor.receiver.recv().await.is_none());
    }
}
