mod client;
mod commands;
mod daemon_launcher;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use studymate_core::{StudyPeriod, SubjectId};

#[derive(Parser)]
#[command(name = "studymate")]
#[command(about = "StudyMate CLI - study/break timer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the StudyMate daemon in the background
    Daemon,
    /// Set the length of the current session
    Set {
        /// Session length in minutes
        minutes: u64,
    },
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Stop the countdown and restore the full session length
    Reset,
    /// Switch between study and break
    Toggle,
    /// Show the timer state
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage study subjects
    Subject {
        #[command(subcommand)]
        command: SubjectCommands,
    },
    /// Show study statistics
    Stats {
        /// today, week, month or all
        #[arg(default_value = "today")]
        period: String,
    },
}

#[derive(Subcommand)]
enum SubjectCommands {
    /// Add a subject
    Add {
        name: String,
        /// Display color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    /// List subjects with their total study time
    List,
    /// Delete a subject and its recorded sessions
    Remove {
        id: SubjectId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Record the next sessions against this subject (0 clears it)
    Use { id: SubjectId },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => commands::daemon().await,
        Commands::Set { minutes } => commands::set(minutes).await,
        Commands::Start => commands::start().await,
        Commands::Pause => commands::pause().await,
        Commands::Reset => commands::reset().await,
        Commands::Toggle => commands::toggle().await,
        Commands::Status { json } => commands::status(json).await,
        Commands::Subject { command } => match command {
            SubjectCommands::Add { name, color } => commands::subjects::add(name, color).await,
            SubjectCommands::List => commands::subjects::list().await,
            SubjectCommands::Remove { id, yes } => commands::subjects::remove(id, yes).await,
            SubjectCommands::Use { id } => commands::subjects::select(id).await,
        },
        Commands::Stats { period } => {
            let Some(period) = StudyPeriod::from_str(&period) else {
                bail!("unknown period '{}', expected today, week, month or all", period);
            };
            commands::stats(period).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_minutes() {
        let cli = Cli::try_parse_from(["studymate", "set", "50"]).unwrap();

        assert!(matches!(cli.command, Commands::Set { minutes: 50 }));
    }

    #[test]
    fn stats_defaults_to_today() {
        let cli = Cli::try_parse_from(["studymate", "stats"]).unwrap();

        assert!(matches!(cli.command, Commands::Stats { ref period } if period == "today"));
    }

    #[test]
    fn parses_subject_remove_with_confirmation_skipped() {
        let cli = Cli::try_parse_from(["studymate", "subject", "remove", "3", "--yes"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Subject {
                command: SubjectCommands::Remove { id: 3, yes: true }
            }
        ));
    }

    #[test]
    fn rejects_negative_minutes() {
        assert!(Cli::try_parse_from(["studymate", "set", "-5"]).is_err());
    }
}
