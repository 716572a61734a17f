use crate::domain::SessionMode;

/// Alerts the user that a countdown reached zero. Fire-and-forget: delivery
/// problems stay inside the implementation.
pub trait CompletionNotifier: Send + Sync {
    fn notify_session_complete(&self, mode: SessionMode);
}

/// Receives failures that were swallowed so the timer could keep going.
pub trait FailureObserver: Send + Sync {
    fn report_failure(&self, title: &str, body: &str);
}
