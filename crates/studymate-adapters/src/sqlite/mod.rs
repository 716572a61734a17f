mod study_session_repository;
mod subject_repository;

pub use study_session_repository::SqliteStudySessionRepository;
pub use subject_repository::SqliteSubjectRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 so that text comparison in SQL matches time order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|timestamp| timestamp.with_timezone(&Utc))
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS subjects (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS study_sessions (
        id INTEGER PRIMARY KEY,
        subject_id INTEGER NOT NULL DEFAULT 0,
        started_at TEXT NOT NULL,
        ended_at TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        mode TEXT NOT NULL DEFAULT 'focus'
    );

    CREATE INDEX IF NOT EXISTS idx_study_sessions_subject ON study_sessions (subject_id);
    CREATE INDEX IF NOT EXISTS idx_study_sessions_started_at ON study_sessions (started_at);
";

fn timestamp_column(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    parse_timestamp(value).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(error))
    })
}
