use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use studymate_adapters::SqliteStudySessionRepository;
use studymate_core::{
    DailyStudyTime, SessionMode, StudyPeriod, StudySessionRepository,
    StudySessionRepositoryError, SubjectStudyTime,
};

use super::database_path;

struct StudyReport {
    period: StudyPeriod,
    focus_minutes: i64,
    break_minutes: i64,
    daily: Vec<DailyStudyTime>,
    subjects: Vec<SubjectStudyTime>,
}

pub async fn execute(period: StudyPeriod) -> Result<()> {
    let path = database_path(false)?;

    if !path.exists() {
        bail!("no study data yet. Finish a session first with 'studymate start'.");
    }

    let repository = SqliteStudySessionRepository::new(&path)
        .map_err(|error| anyhow::anyhow!("database access error: {}", error))?;

    let report = build_report(&repository, period, Local::now())?;

    if report.focus_minutes == 0 && report.break_minutes == 0 {
        println!("No sessions recorded {}.", period.label());
        return Ok(());
    }

    display_report(&report);
    Ok(())
}

fn build_report(
    repository: &dyn StudySessionRepository,
    period: StudyPeriod,
    now: DateTime<Local>,
) -> Result<StudyReport> {
    let (since, until) = period.bounds(now);
    let read_error = |error: StudySessionRepositoryError| anyhow::anyhow!("read error: {}", error);

    Ok(StudyReport {
        period,
        focus_minutes: repository
            .total_minutes_between(since, until, SessionMode::Focus)
            .map_err(read_error)?,
        break_minutes: repository
            .total_minutes_between(since, until, SessionMode::Break)
            .map_err(read_error)?,
        daily: repository
            .daily_study_times(since, until, SessionMode::Focus)
            .map_err(read_error)?,
        subjects: repository
            .subject_study_times(since, until, SessionMode::Focus)
            .map_err(read_error)?,
    })
}

fn display_report(report: &StudyReport) {
    println!();
    println!("📚 Study statistics ({})", report.period.label());
    println!();
    println!("Study time: {}", format_minutes(report.focus_minutes));
    println!("Break time: {}", format_minutes(report.break_minutes));
    println!();

    if !report.subjects.is_empty() {
        println!("By subject:");
        let rows: Vec<(String, i64)> = report
            .subjects
            .iter()
            .map(|subject| (subject.name.clone(), subject.total_minutes))
            .collect();
        print_tree(&rows, report.focus_minutes);
        println!();
    }

    if report.daily.len() > 1 {
        println!("By day:");
        let rows: Vec<(String, i64)> = report
            .daily
            .iter()
            .map(|day| (day.date.format("%a %d %b").to_string(), day.total_minutes))
            .collect();
        print_tree(&rows, report.focus_minutes);
        println!();
    }
}

fn print_tree(rows: &[(String, i64)], total_minutes: i64) {
    for (index, (label, minutes)) in rows.iter().enumerate() {
        let prefix = if index == rows.len() - 1 {
            "└──"
        } else {
            "├──"
        };
        println!(
            "{} {:16} {:>10} ({}%)",
            prefix,
            format!("{}:", label),
            format_minutes(*minutes),
            percentage(*minutes, total_minutes)
        );
    }
}

fn percentage(part: i64, total: i64) -> u32 {
    (part as f64 / total.max(1) as f64 * 100.0) as u32
}

fn format_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let remaining_minutes = minutes % 60;

    if hours > 0 {
        format!("{}h {:02}min", hours, remaining_minutes)
    } else {
        format!("{}min", remaining_minutes)
    }
}
