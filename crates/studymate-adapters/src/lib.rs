//! StudyMate adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! studymate-core: SQLite storage for sessions and subjects, plus test
//! doubles used by the daemon's tests.

pub mod sqlite;
pub mod testing;

pub use sqlite::{SqliteStudySessionRepository, SqliteSubjectRepository};
pub use testing::{FailingStudySessionRepository, InMemoryStudySessionRepository, RecordingNotifier};
