mod failing_repository;
mod in_memory_repository;
mod recording_notifier;

pub use failing_repository::FailingStudySessionRepository;
pub use in_memory_repository::InMemoryStudySessionRepository;
pub use recording_notifier::RecordingNotifier;
