use chrono::{DateTime, Utc};
use studymate_core::{
    DailyStudyTime, SessionMode, StudySession, StudySessionId, StudySessionRepository,
    StudySessionRepositoryError, SubjectId, SubjectStudyTime,
};

pub struct FailingStudySessionRepository {
    error: StudySessionRepositoryError,
}

impl FailingStudySessionRepository {
    pub fn unavailable() -> Self {
        Self {
            error: StudySessionRepositoryError::Storage {
                message: "database is locked".to_string(),
            },
        }
    }

    pub fn with_error(error: StudySessionRepositoryError) -> Self {
        Self { error }
    }
}

impl StudySessionRepository for FailingStudySessionRepository {
    fn record(
        &self,
        _session: &mut StudySession,
    ) -> Result<StudySessionId, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn find_by_id(&self, _id: StudySessionId) -> Result<StudySession, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn find_between(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn find_by_subject(
        &self,
        _subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn daily_study_times(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
        _mode: SessionMode,
    ) -> Result<Vec<DailyStudyTime>, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn subject_study_times(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
        _mode: SessionMode,
    ) -> Result<Vec<SubjectStudyTime>, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn total_minutes_between(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
        _mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn total_minutes_for_subject(
        &self,
        _subject_id: SubjectId,
        _mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        Err(self.error.clone())
    }

    fn delete(&self, _id: StudySessionId) -> Result<(), StudySessionRepositoryError> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::UNASSIGNED_SUBJECT;

    #[test]
    fn record_returns_storage_error() {
        let repository = FailingStudySessionRepository::unavailable();
        let now = Utc::now();
        let mut session = StudySession::completed(
            UNASSIGNED_SUBJECT,
            now,
            now,
            std::time::Duration::from_secs(60),
            SessionMode::Focus,
        );

        let result = repository.record(&mut session);

        assert!(matches!(result, Err(StudySessionRepositoryError::Storage { .. })));
        assert!(session.id.is_none());
    }

    #[test]
    fn returns_configured_error() {
        let repository =
            FailingStudySessionRepository::with_error(StudySessionRepositoryError::NotFound { id: 3 });

        let result = repository.find_by_id(3);

        assert!(matches!(result, Err(StudySessionRepositoryError::NotFound { id: 3 })));
    }
}
