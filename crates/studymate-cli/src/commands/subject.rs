use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use studymate_adapters::{SqliteStudySessionRepository, SqliteSubjectRepository};
use studymate_core::{
    SessionMode, StudySessionRepository, Subject, SubjectId, SubjectRepository,
    SubjectRepositoryError, UNASSIGNED_SUBJECT,
};
use studymate_protocol::Request;

use super::{database_path, timer};

pub async fn add(name: String, color: Option<String>) -> Result<()> {
    let repository = open_repository(true)?;
    let subject = add_subject(&repository, &name, color.as_deref())?;

    println!(
        "Subject '{}' added (id {}, color {})",
        subject.name,
        subject.id.unwrap_or_default(),
        subject.color
    );
    Ok(())
}

pub async fn list() -> Result<()> {
    let path = database_path(false)?;
    if !path.exists() {
        println!("No subjects yet. Add one with 'studymate subject add <name>'.");
        return Ok(());
    }

    let subjects = SqliteSubjectRepository::new(&path)
        .map_err(|error| anyhow::anyhow!("database access error: {}", error))?
        .list()
        .map_err(|error| anyhow::anyhow!("read error: {}", error))?;

    if subjects.is_empty() {
        println!("No subjects yet. Add one with 'studymate subject add <name>'.");
        return Ok(());
    }

    let sessions = SqliteStudySessionRepository::new(&path)
        .map_err(|error| anyhow::anyhow!("database access error: {}", error))?;

    println!("{:>4}  {:20} {:8} {:>10}", "ID", "NAME", "COLOR", "STUDIED");
    for subject in &subjects {
        let id = subject.id.unwrap_or_default();
        let minutes = sessions
            .total_minutes_for_subject(id, SessionMode::Focus)
            .unwrap_or(0);
        println!(
            "{:>4}  {:20} {:8} {:>10}",
            id,
            subject.name,
            subject.color,
            format!("{} min", minutes)
        );
    }

    Ok(())
}

pub async fn remove(id: SubjectId, skip_confirmation: bool) -> Result<()> {
    let repository = open_repository(false)?;

    let subject = repository.find_by_id(id).map_err(|error| match error {
        SubjectRepositoryError::NotFound { id } => anyhow::anyhow!("no subject with id {}", id),
        other => anyhow::anyhow!("{}", other),
    })?;

    if !skip_confirmation {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete '{}' and every session recorded for it?",
                subject.name
            ))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;

        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    repository
        .delete(id)
        .map_err(|error| anyhow::anyhow!("{}", error))?;

    println!("Subject '{}' deleted", subject.name);
    Ok(())
}

pub async fn select(id: SubjectId) -> Result<()> {
    let name = if id == UNASSIGNED_SUBJECT {
        None
    } else {
        let repository = open_repository(false)?;
        let subject = repository.find_by_id(id).map_err(|error| match error {
            SubjectRepositoryError::NotFound { id } => {
                anyhow::anyhow!("no subject with id {}", id)
            }
            other => anyhow::anyhow!("{}", other),
        })?;
        Some(subject.name)
    };

    timer::send(Request::SelectSubject { subject_id: id }).await?;

    match name {
        Some(name) => println!("Studying '{}'", name),
        None => println!("Sessions will be recorded without a subject"),
    }
    Ok(())
}

fn open_repository(create: bool) -> Result<SqliteSubjectRepository> {
    let path = database_path(create)?;

    if !create && !path.exists() {
        bail!("no subjects yet. Add one with 'studymate subject add <name>'.");
    }

    SqliteSubjectRepository::new(&path)
        .map_err(|error| anyhow::anyhow!("database access error: {}", error))
}

fn add_subject(
    repository: &dyn SubjectRepository,
    name: &str,
    color: Option<&str>,
) -> Result<Subject> {
    if name.trim().is_empty() {
        bail!("subject name cannot be empty");
    }

    if let Some(color) = color {
        if !is_hex_color(color) {
            bail!("invalid color '{}', expected #RRGGBB", color);
        }
    }

    let mut subject = Subject::new(name, color);
    repository
        .create(&mut subject)
        .map_err(|error| match error {
            SubjectRepositoryError::AlreadyExists { name } => {
                anyhow::anyhow!("a subject named '{}' already exists", name)
            }
            other => anyhow::anyhow!("{}", other),
        })?;

    Ok(subject)
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|character| character.is_ascii_hexdigit())
}
