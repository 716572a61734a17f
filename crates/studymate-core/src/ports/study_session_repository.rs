use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    DailyStudyTime, SessionMode, StudySession, StudySessionId, SubjectId, SubjectStudyTime,
};

#[derive(Error, Debug, Clone)]
pub enum StudySessionRepositoryError {
    #[error("study session not found: {id}")]
    NotFound { id: StudySessionId },

    #[error("storage error: {message}")]
    Storage { message: String },
}

/// Store for completed study sessions. Time ranges are half-open:
/// `since <= started_at < until`.
pub trait StudySessionRepository: Send + Sync {
    fn record(&self, session: &mut StudySession)
        -> Result<StudySessionId, StudySessionRepositoryError>;

    fn find_by_id(&self, id: StudySessionId) -> Result<StudySession, StudySessionRepositoryError>;

    fn find_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError>;

    fn find_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError>;

    fn daily_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<DailyStudyTime>, StudySessionRepositoryError>;

    fn subject_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<SubjectStudyTime>, StudySessionRepositoryError>;

    fn total_minutes_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError>;

    fn total_minutes_for_subject(
        &self,
        subject_id: SubjectId,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError>;

    fn delete(&self, id: StudySessionId) -> Result<(), StudySessionRepositoryError>;
}
