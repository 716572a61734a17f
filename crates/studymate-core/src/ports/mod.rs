mod session_notifier;
mod study_session_repository;
mod subject_repository;

pub use session_notifier::{CompletionNotifier, FailureObserver};
pub use study_session_repository::{StudySessionRepository, StudySessionRepositoryError};
pub use subject_repository::{SubjectRepository, SubjectRepositoryError};
