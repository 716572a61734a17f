use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{SessionMode, SubjectId};

pub type StudySessionId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct StudySession {
    pub id: Option<StudySessionId>,
    pub subject_id: SubjectId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub mode: SessionMode,
}

impl StudySession {
    /// Builds the record for a countdown that ran to zero. The duration is
    /// the configured session length, not the wall-clock span, so pauses do
    /// not inflate it.
    pub fn completed(
        subject_id: SubjectId,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        total_duration: Duration,
        mode: SessionMode,
    ) -> Self {
        Self {
            id: None,
            subject_id,
            started_at,
            ended_at,
            duration_minutes: (total_duration.as_secs() / 60) as i64,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNASSIGNED_SUBJECT;

    #[test]
    fn completed_session_uses_configured_minutes() {
        let started_at = Utc::now();
        let ended_at = started_at + chrono::Duration::minutes(31);

        let session = StudySession::completed(
            UNASSIGNED_SUBJECT,
            started_at,
            ended_at,
            Duration::from_secs(25 * 60),
            SessionMode::Focus,
        );

        assert!(session.id.is_none());
        assert_eq!(session.duration_minutes, 25);
        assert_eq!(session.ended_at - session.started_at, chrono::Duration::minutes(31));
    }

    #[test]
    fn sub_minute_session_records_zero_minutes() {
        let started_at = Utc::now();

        let session = StudySession::completed(
            7,
            started_at,
            started_at,
            Duration::from_secs(45),
            SessionMode::Break,
        );

        assert_eq!(session.duration_minutes, 0);
        assert_eq!(session.subject_id, 7);
        assert_eq!(session.mode, SessionMode::Break);
    }
}
