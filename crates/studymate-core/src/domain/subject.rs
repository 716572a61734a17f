use chrono::{Local, NaiveDate};

pub type SubjectId = i64;

/// Sessions recorded before a subject was picked are attached to this id.
pub const UNASSIGNED_SUBJECT: SubjectId = 0;

pub const DEFAULT_SUBJECT_COLOR: &str = "#4285F4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: Option<SubjectId>,
    pub name: String,
    pub color: String,
    pub created_at: NaiveDate,
}

impl Subject {
    pub fn new(name: &str, color: Option<&str>) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            color: color.unwrap_or(DEFAULT_SUBJECT_COLOR).to_string(),
            created_at: Local::now().date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subject_uses_default_color() {
        let subject = Subject::new("  Algebra ", None);

        assert!(subject.id.is_none());
        assert_eq!(subject.name, "Algebra");
        assert_eq!(subject.color, DEFAULT_SUBJECT_COLOR);
    }

    #[test]
    fn new_subject_keeps_custom_color() {
        let subject = Subject::new("Chemistry", Some("#34A853"));

        assert_eq!(subject.color, "#34A853");
    }
}
