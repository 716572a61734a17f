use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Local, Utc};
use studymate_core::{
    DailyStudyTime, SessionMode, StudySession, StudySessionId, StudySessionRepository,
    StudySessionRepositoryError, SubjectId, SubjectStudyTime, DEFAULT_SUBJECT_COLOR,
    UNASSIGNED_SUBJECT,
};

pub struct InMemoryStudySessionRepository {
    sessions: Mutex<Vec<StudySession>>,
}

impl InMemoryStudySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn sessions(&self) -> Vec<StudySession> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching<F>(&self, predicate: F) -> Vec<StudySession>
    where
        F: Fn(&StudySession) -> bool,
    {
        let sessions = self.sessions.lock().unwrap();
        let mut matching: Vec<StudySession> =
            sessions.iter().filter(|session| predicate(session)).cloned().collect();
        matching.sort_by(|left, right| right.started_at.cmp(&left.started_at));
        matching
    }
}

impl Default for InMemoryStudySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn in_range(session: &StudySession, since: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    session.started_at >= since && session.started_at < until
}

impl StudySessionRepository for InMemoryStudySessionRepository {
    fn record(
        &self,
        session: &mut StudySession,
    ) -> Result<StudySessionId, StudySessionRepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let id = sessions.len() as StudySessionId + 1;
        session.id = Some(id);
        sessions.push(session.clone());
        Ok(id)
    }

    fn find_by_id(&self, id: StudySessionId) -> Result<StudySession, StudySessionRepositoryError> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|session| session.id == Some(id))
            .cloned()
            .ok_or(StudySessionRepositoryError::NotFound { id })
    }

    fn find_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        Ok(self.matching(|session| in_range(session, since, until)))
    }

    fn find_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        Ok(self.matching(|session| session.subject_id == subject_id))
    }

    fn daily_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<DailyStudyTime>, StudySessionRepositoryError> {
        let mut by_day = BTreeMap::new();
        for session in self.matching(|session| session.mode == mode && in_range(session, since, until)) {
            let day = session.started_at.with_timezone(&Local).date_naive();
            *by_day.entry(day).or_insert(0) += session.duration_minutes;
        }

        Ok(by_day
            .into_iter()
            .rev()
            .map(|(date, total_minutes)| DailyStudyTime {
                date,
                total_minutes,
            })
            .collect())
    }

    fn subject_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<SubjectStudyTime>, StudySessionRepositoryError> {
        let mut by_subject = BTreeMap::new();
        for session in self.matching(|session| session.mode == mode && in_range(session, since, until)) {
            *by_subject.entry(session.subject_id).or_insert(0) += session.duration_minutes;
        }

        let mut times: Vec<SubjectStudyTime> = by_subject
            .into_iter()
            .map(|(subject_id, total_minutes)| SubjectStudyTime {
                subject_id,
                name: if subject_id == UNASSIGNED_SUBJECT {
                    "Unassigned".to_string()
                } else {
                    format!("Subject {}", subject_id)
                },
                color: DEFAULT_SUBJECT_COLOR.to_string(),
                total_minutes,
            })
            .collect();
        times.sort_by(|left, right| right.total_minutes.cmp(&left.total_minutes));

        Ok(times)
    }

    fn total_minutes_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        Ok(self
            .matching(|session| session.mode == mode && in_range(session, since, until))
            .iter()
            .map(|session| session.duration_minutes)
            .sum())
    }

    fn total_minutes_for_subject(
        &self,
        subject_id: SubjectId,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        Ok(self
            .matching(|session| session.mode == mode && session.subject_id == subject_id)
            .iter()
            .map(|session| session.duration_minutes)
            .sum())
    }

    fn delete(&self, id: StudySessionId) -> Result<(), StudySessionRepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.id != Some(id));

        if sessions.len() == before {
            return Err(StudySessionRepositoryError::NotFound { id });
        }

        Ok(())
    }
}
