use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use studymate_core::{Subject, SubjectId, SubjectRepository, SubjectRepositoryError};

use super::SCHEMA;

pub struct SqliteSubjectRepository {
    connection: Mutex<Connection>,
}

impl SqliteSubjectRepository {
    pub fn new(path: &Path) -> Result<Self, SubjectRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    pub fn in_memory() -> Result<Self, SubjectRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), SubjectRepositoryError> {
        let connection = self.connection.lock().unwrap();
        connection.execute_batch(SCHEMA).map_err(storage_error)
    }
}

impl SubjectRepository for SqliteSubjectRepository {
    fn create(&self, subject: &mut Subject) -> Result<SubjectId, SubjectRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO subjects (name, color, created_at) VALUES (?1, ?2, ?3)",
                params![
                    &subject.name,
                    &subject.color,
                    subject.created_at.format("%Y-%m-%d").to_string(),
                ],
            )
            .map_err(|error| match error.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => SubjectRepositoryError::AlreadyExists {
                    name: subject.name.clone(),
                },
                _ => storage_error(error),
            })?;

        let id = connection.last_insert_rowid();
        subject.id = Some(id);

        Ok(id)
    }

    fn find_by_id(&self, id: SubjectId) -> Result<Subject, SubjectRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                "SELECT id, name, color, created_at FROM subjects WHERE id = ?1",
                params![id],
                row_to_subject,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => SubjectRepositoryError::NotFound { id },
                _ => storage_error(error),
            })
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Subject>, SubjectRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                "SELECT id, name, color, created_at FROM subjects WHERE name = ?1 LIMIT 1",
                params![name.trim()],
                row_to_subject,
            )
            .optional()
            .map_err(storage_error)
    }

    fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let mut statement = connection
            .prepare("SELECT id, name, color, created_at FROM subjects ORDER BY name ASC")
            .map_err(storage_error)?;

        let subjects = statement
            .query_map([], row_to_subject)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(subjects)
    }

    /// Removes the subject together with every session recorded against it.
    fn delete(&self, id: SubjectId) -> Result<(), SubjectRepositoryError> {
        let mut connection = self.connection.lock().unwrap();

        let transaction = connection.transaction().map_err(storage_error)?;

        let rows_affected = transaction
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(SubjectRepositoryError::NotFound { id });
        }

        transaction
            .execute("DELETE FROM study_sessions WHERE subject_id = ?1", params![id])
            .map_err(storage_error)?;

        transaction.commit().map_err(storage_error)
    }
}

fn row_to_subject(row: &rusqlite::Row) -> rusqlite::Result<Subject> {
    let created_at: String = row.get(3)?;
    let created_at = NaiveDate::parse_from_str(&created_at, "%Y-%m-%d").map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Subject {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        color: row.get(2)?,
        created_at,
    })
}

fn storage_error(error: rusqlite::Error) -> SubjectRepositoryError {
    SubjectRepositoryError::Storage {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use studymate_core::{SessionMode, StudySession, StudySessionRepository};

    use crate::SqliteStudySessionRepository;

    #[test]
    fn create_and_find_subject() {
        let repository = SqliteSubjectRepository::in_memory().unwrap();

        let mut subject = Subject::new("Physics", None);
        let id = repository.create(&mut subject).unwrap();

        assert!(id > 0);
        assert_eq!(subject.id, Some(id));
        assert_eq!(repository.find_by_id(id).unwrap(), subject);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let repository = SqliteSubjectRepository::in_memory().unwrap();

        repository.create(&mut Subject::new("Physics", None)).unwrap();
        let result = repository.create(&mut Subject::new("Physics", Some("#000000")));

        assert!(matches!(
            result,
            Err(SubjectRepositoryError::AlreadyExists { ref name }) if name == "Physics"
        ));
    }

    #[test]
    fn find_by_name_returns_none_when_missing() {
        let repository = SqliteSubjectRepository::in_memory().unwrap();

        repository.create(&mut Subject::new("History", None)).unwrap();

        assert!(repository.find_by_name("History").unwrap().is_some());
        assert!(repository.find_by_name("Geography").unwrap().is_none());
    }

    #[test]
    fn list_is_sorted_by_name() {
        let repository = SqliteSubjectRepository::in_memory().unwrap();

        repository.create(&mut Subject::new("Zoology", None)).unwrap();
        repository.create(&mut Subject::new("Algebra", None)).unwrap();
        repository.create(&mut Subject::new("Music", None)).unwrap();

        let names: Vec<String> = repository
            .list()
            .unwrap()
            .into_iter()
            .map(|subject| subject.name)
            .collect();

        assert_eq!(names, vec!["Algebra", "Music", "Zoology"]);
    }

    #[test]
    fn delete_missing_subject_is_not_found() {
        let repository = SqliteSubjectRepository::in_memory().unwrap();

        assert!(matches!(
            repository.delete(5),
            Err(SubjectRepositoryError::NotFound { id: 5 })
        ));
    }

    #[test]
    fn delete_cascades_to_sessions() {
        let database = std::env::temp_dir().join(format!(
            "studymate-subject-cascade-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&database);

        let subjects = SqliteSubjectRepository::new(&database).unwrap();
        let sessions = SqliteStudySessionRepository::new(&database).unwrap();

        let mut subject = Subject::new("Biology", None);
        let subject_id = subjects.create(&mut subject).unwrap();

        let started_at = Utc::now() - Duration::minutes(30);
        let mut session = StudySession::completed(
            subject_id,
            started_at,
            started_at + Duration::minutes(25),
            std::time::Duration::from_secs(25 * 60),
            SessionMode::Focus,
        );
        sessions.record(&mut session).unwrap();

        subjects.delete(subject_id).unwrap();

        assert!(sessions.find_by_subject(subject_id).unwrap().is_empty());
        assert!(matches!(
            subjects.find_by_id(subject_id),
            Err(SubjectRepositoryError::NotFound { .. })
        ));

        let _ = std::fs::remove_file(&database);
    }
}
