//! StudyMate core library
//!
//! Contains the timer domain types, statistics types and the port traits
//! implemented by the adapters. This crate has no knowledge of
//! infrastructure concerns.

pub mod config;
pub mod domain;
pub mod ports;

pub use config::{
    Config, ConfigError, NotificationConfig, NotificationUrgency, StorageConfig, TimerConfig,
};
pub use domain::{
    DailyStudyTime, ModeToggle, SessionMode, StudyPeriod, StudySession, StudySessionId, Subject,
    SubjectId, SubjectStudyTime, TimerState, TimerStateError, DEFAULT_BREAK_DURATION,
    DEFAULT_FOCUS_DURATION, DEFAULT_SUBJECT_COLOR, UNASSIGNED_SUBJECT,
};
pub use ports::{
    CompletionNotifier, FailureObserver, StudySessionRepository, StudySessionRepositoryError,
    SubjectRepository, SubjectRepositoryError,
};
