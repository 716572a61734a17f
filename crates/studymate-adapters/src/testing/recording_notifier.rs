use std::sync::Mutex;

use studymate_core::{CompletionNotifier, FailureObserver, SessionMode};

/// Captures every notification and failure report it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    completions: Mutex<Vec<SessionMode>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completions(&self) -> Vec<SessionMode> {
        self.completions.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<(String, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl CompletionNotifier for RecordingNotifier {
    fn notify_session_complete(&self, mode: SessionMode) {
        self.completions.lock().unwrap().push(mode);
    }
}

impl FailureObserver for RecordingNotifier {
    fn report_failure(&self, title: &str, body: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}
