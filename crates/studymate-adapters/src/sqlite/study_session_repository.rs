use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use studymate_core::{
    DailyStudyTime, SessionMode, StudySession, StudySessionId, StudySessionRepository,
    StudySessionRepositoryError, SubjectId, SubjectStudyTime, DEFAULT_SUBJECT_COLOR,
};

use super::{format_timestamp, timestamp_column, SCHEMA};

const SESSION_COLUMNS: &str =
    "id, subject_id, started_at, ended_at, duration_minutes, mode";

pub struct SqliteStudySessionRepository {
    connection: Mutex<Connection>,
}

impl SqliteStudySessionRepository {
    pub fn new(path: &Path) -> Result<Self, StudySessionRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    pub fn in_memory() -> Result<Self, StudySessionRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();
        connection.execute_batch(SCHEMA).map_err(storage_error)
    }

    fn query_sessions(
        &self,
        sql: &str,
        parameters: impl rusqlite::Params,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let mut statement = connection.prepare(sql).map_err(storage_error)?;
        let sessions = statement
            .query_map(parameters, row_to_session)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(sessions)
    }
}

impl StudySessionRepository for SqliteStudySessionRepository {
    fn record(
        &self,
        session: &mut StudySession,
    ) -> Result<StudySessionId, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO study_sessions (subject_id, started_at, ended_at, duration_minutes, mode)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.subject_id,
                    format_timestamp(session.started_at),
                    format_timestamp(session.ended_at),
                    session.duration_minutes,
                    session.mode.as_str(),
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        session.id = Some(id);

        Ok(id)
    }

    fn find_by_id(&self, id: StudySessionId) -> Result<StudySession, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM study_sessions WHERE id = ?1"),
                params![id],
                row_to_session,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => StudySessionRepositoryError::NotFound { id },
                _ => storage_error(error),
            })
    }

    fn find_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        self.query_sessions(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE started_at >= ?1 AND started_at < ?2
                 ORDER BY started_at DESC"
            ),
            params![format_timestamp(since), format_timestamp(until)],
        )
    }

    fn find_by_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StudySessionRepositoryError> {
        self.query_sessions(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE subject_id = ?1
                 ORDER BY started_at DESC"
            ),
            params![subject_id],
        )
    }

    fn daily_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<DailyStudyTime>, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let mut statement = connection
            .prepare(
                "SELECT DATE(started_at, 'localtime') AS day, SUM(duration_minutes)
                 FROM study_sessions
                 WHERE started_at >= ?1 AND started_at < ?2 AND mode = ?3
                 GROUP BY day
                 ORDER BY day DESC",
            )
            .map_err(storage_error)?;

        let rows = statement
            .query_map(
                params![format_timestamp(since), format_timestamp(until), mode.as_str()],
                |row| {
                    let day: String = row.get(0)?;
                    let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|error| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(error),
                        )
                    })?;
                    Ok(DailyStudyTime {
                        date,
                        total_minutes: row.get(1)?,
                    })
                },
            )
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(rows)
    }

    fn subject_study_times(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<Vec<SubjectStudyTime>, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let mut statement = connection
            .prepare(
                "SELECT ss.subject_id,
                        COALESCE(s.name, 'Unassigned'),
                        COALESCE(s.color, ?4),
                        SUM(ss.duration_minutes) AS total_minutes
                 FROM study_sessions ss
                 LEFT JOIN subjects s ON s.id = ss.subject_id
                 WHERE ss.started_at >= ?1 AND ss.started_at < ?2 AND ss.mode = ?3
                 GROUP BY ss.subject_id
                 ORDER BY total_minutes DESC, ss.subject_id ASC",
            )
            .map_err(storage_error)?;

        let rows = statement
            .query_map(
                params![
                    format_timestamp(since),
                    format_timestamp(until),
                    mode.as_str(),
                    DEFAULT_SUBJECT_COLOR,
                ],
                |row| {
                    Ok(SubjectStudyTime {
                        subject_id: row.get(0)?,
                        name: row.get(1)?,
                        color: row.get(2)?,
                        total_minutes: row.get(3)?,
                    })
                },
            )
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(rows)
    }

    fn total_minutes_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                "SELECT COALESCE(SUM(duration_minutes), 0) FROM study_sessions
                 WHERE started_at >= ?1 AND started_at < ?2 AND mode = ?3",
                params![format_timestamp(since), format_timestamp(until), mode.as_str()],
                |row| row.get(0),
            )
            .map_err(storage_error)
    }

    fn total_minutes_for_subject(
        &self,
        subject_id: SubjectId,
        mode: SessionMode,
    ) -> Result<i64, StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                "SELECT COALESCE(SUM(duration_minutes), 0) FROM study_sessions
                 WHERE subject_id = ?1 AND mode = ?2",
                params![subject_id, mode.as_str()],
                |row| row.get(0),
            )
            .map_err(storage_error)
    }

    fn delete(&self, id: StudySessionId) -> Result<(), StudySessionRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let rows_affected = connection
            .execute("DELETE FROM study_sessions WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(StudySessionRepositoryError::NotFound { id });
        }

        Ok(())
    }
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<StudySession> {
    let started_at: String = row.get(2)?;
    let ended_at: String = row.get(3)?;
    let mode: String = row.get(5)?;

    Ok(StudySession {
        id: Some(row.get(0)?),
        subject_id: row.get(1)?,
        started_at: timestamp_column(2, &started_at)?,
        ended_at: timestamp_column(3, &ended_at)?,
        duration_minutes: row.get(4)?,
        mode: SessionMode::from_stored(&mode),
    })
}

fn storage_error(error: rusqlite::Error) -> StudySessionRepositoryError {
    StudySessionRepositoryError::Storage {
        message: error.to_string(),
    }
}
