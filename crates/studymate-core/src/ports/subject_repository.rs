use thiserror::Error;

use crate::domain::{Subject, SubjectId};

#[derive(Error, Debug, Clone)]
pub enum SubjectRepositoryError {
    #[error("subject not found: {id}")]
    NotFound { id: SubjectId },

    #[error("a subject named '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

pub trait SubjectRepository: Send + Sync {
    fn create(&self, subject: &mut Subject) -> Result<SubjectId, SubjectRepositoryError>;

    fn find_by_id(&self, id: SubjectId) -> Result<Subject, SubjectRepositoryError>;

    fn find_by_name(&self, name: &str) -> Result<Option<Subject>, SubjectRepositoryError>;

    fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError>;

    fn delete(&self, id: SubjectId) -> Result<(), SubjectRepositoryError>;
}
