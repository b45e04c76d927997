//! lovelang - Love Language Assessment
//!
//! Take the assessment in the terminal, move progress between machines with
//! `.love` save files, and export the resulting profile.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Session store: $XDG_DATA_HOME/lovelang/sessions.db (~/.local/share/lovelang/sessions.db)
//! - Logs: $XDG_STATE_HOME/lovelang/ (~/.local/state/lovelang/)
//! - Config: $XDG_CONFIG_HOME/lovelang/config.toml (~/.config/lovelang/config.toml)

mod prompt;
mod render;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use lovelang_core::format::format_relative_time;
use lovelang_core::session::read_save_file;
use lovelang_core::{
    compute_scores, Category, Config, Conclusions, PartnerLanguages, ProfileReport,
    ReportSettings, ResumeOutcome, Scores, Screen, SessionController, SessionRepository,
    SqliteSessionStore,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prompt::{Outcome, PromptOptions};
use crate::render::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "lovelang")]
#[command(about = "Discover how you give and receive love")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take (or resume) the assessment (default)
    Take(ReportArgs),

    /// Import a .love save file as the current session
    Import {
        /// Path to the .love file
        file: PathBuf,
    },

    /// Write the current session to a .love save file
    Export {
        /// Name of the save (also determines the file name)
        name: String,

        /// Directory to write into (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show the saved session
    Status,

    /// Discard the saved session
    Restart,

    /// Print the profile report for a .love save file
    Report {
        /// Path to the .love file
        file: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Debug, Default)]
struct ReportArgs {
    /// Your partner's primary receiving language (e.g. touch)
    #[arg(long, requires = "partner_giving")]
    partner_receiving: Option<Category>,

    /// Your partner's primary giving language (e.g. words)
    #[arg(long, requires = "partner_receiving")]
    partner_giving: Option<Category>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Write the export to this file instead of stdout
    #[arg(long, requires = "export")]
    output: Option<PathBuf>,
}

impl ReportArgs {
    fn partner(&self) -> Option<PartnerLanguages> {
        match (self.partner_receiving, self.partner_giving) {
            (Some(receiving), Some(giving)) => Some(PartnerLanguages { receiving, giving }),
            _ => None,
        }
    }

    fn export_format(&self) -> Result<Option<ExportFormat>> {
        self.export.as_deref().map(ExportFormat::parse).transpose()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file only; stdout belongs to the quiz)
    let _log_guard =
        lovelang_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("lovelang starting");

    let result = match cli.command.unwrap_or(Commands::Take(ReportArgs::default())) {
        Commands::Take(args) => cmd_take(&config, &args),
        Commands::Import { file } => cmd_import(&config, &file),
        Commands::Export { name, dir } => cmd_export(&config, &name, dir),
        Commands::Status => cmd_status(&config),
        Commands::Restart => cmd_restart(),
        Commands::Report { file, report } => cmd_report(&config, &file, &report),
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "lovelang command failed");
        if let Some(log) = lovelang_core::logging::latest_log_file(&Config::state_dir()) {
            eprintln!("Details were logged to {}", log.display());
        }
    }
    result
}

fn open_store() -> Result<SqliteSessionStore> {
    let db_path = Config::database_path();
    tracing::debug!(path = %db_path.display(), "Opening session store");
    SqliteSessionStore::open(&db_path).context("failed to open session store")
}

fn cmd_take(config: &Config, args: &ReportArgs) -> Result<()> {
    // Validate flags before asking any questions
    let format = args.export_format()?;

    let bank = config
        .data
        .question_bank()
        .context("failed to load question bank")?;
    let conclusions = config
        .data
        .conclusions()
        .context("failed to load conclusions")?;

    let store = open_store()?;
    let mut session = SessionController::new(&bank, store);

    match session.resume(Utc::now(), config.quiz.resume_window()) {
        ResumeOutcome::Restored {
            saved_at, position, ..
        } => {
            println!(
                "Welcome back! Resuming at question {} of {} (saved {}).",
                position + 1,
                session.question_count(),
                format_relative_time(saved_at, Utc::now())
            );
        }
        ResumeOutcome::Stale { saved_at } => {
            println!(
                "Found progress from {}, older than {} days. Starting fresh.",
                format_relative_time(saved_at, Utc::now()),
                config.quiz.resume_window_days
            );
        }
        ResumeOutcome::Unreadable => {
            println!("Saved progress could not be read. Starting fresh.");
        }
        ResumeOutcome::NoSnapshot => {}
    }

    // Progress is persisted after every answer, so Ctrl+C can exit immediately
    ctrlc::set_handler(|| {
        eprintln!("\nProgress saved. Run `lovelang` again to continue.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let save_dir = std::env::current_dir().context("failed to resolve current directory")?;
    let options = PromptOptions {
        advance_delay: Duration::from_millis(config.quiz.advance_delay_ms),
        save_dir: &save_dir,
    };

    let stdin = io::stdin();
    let outcome = prompt::run(&mut session, stdin.lock(), &options)?;
    if outcome == Outcome::Quit {
        return Ok(());
    }

    let scores = session
        .scores()
        .copied()
        .context("assessment finished without scores")?;
    emit_report(config, &scores, &conclusions, args, format)
}

fn cmd_import(config: &Config, file: &Path) -> Result<()> {
    let bank = config
        .data
        .question_bank()
        .context("failed to load question bank")?;
    let store = open_store()?;
    let mut session = SessionController::new(&bank, store);

    session
        .import(file)
        .with_context(|| format!("failed to import {}", file.display()))?;

    println!(
        "Imported {} ({}/{} answered). Run `lovelang` to continue.",
        file.display(),
        session.answers().answered_count(),
        session.question_count()
    );
    Ok(())
}

fn cmd_export(config: &Config, name: &str, dir: Option<PathBuf>) -> Result<()> {
    let bank = config
        .data
        .question_bank()
        .context("failed to load question bank")?;
    let store = open_store()?;
    let mut session = SessionController::new(&bank, store);

    match session.resume(Utc::now(), config.quiz.resume_window()) {
        ResumeOutcome::Restored { .. } => {}
        ResumeOutcome::NoSnapshot => anyhow::bail!("No session in progress"),
        ResumeOutcome::Stale { .. } => anyhow::bail!(
            "Saved session is older than {} days",
            config.quiz.resume_window_days
        ),
        ResumeOutcome::Unreadable => anyhow::bail!("Saved session could not be read"),
    }
    if session.screen() == Screen::Intro {
        session.start().context("failed to start session")?;
    }

    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let path = session
        .save_to(&dir, name)
        .context("failed to write save file")?;

    println!("Saved progress to {}", path.display());
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    let store = open_store()?;

    let Some(info) = store.info().context("failed to read session store")? else {
        println!("No session in progress.");
        return Ok(());
    };

    let now = Utc::now();
    println!("Session: {}", info.name);
    println!("Saved: {}", format_relative_time(info.saved_at, now));

    match store.load() {
        Ok(Some(snapshot)) => {
            println!(
                "Progress: {}/{} answered ({:.0}% complete), at question {}",
                snapshot.answers.answered_count(),
                snapshot.questions.len(),
                snapshot.completion() * 100.0,
                snapshot.current_question_index + 1
            );
            if !snapshot.is_fresh(now, config.quiz.resume_window()) {
                println!(
                    "This session is older than {} days and will not be resumed.",
                    config.quiz.resume_window_days
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Stored session is unreadable");
            println!("The stored session is unreadable and will not be resumed.");
        }
    }

    Ok(())
}

fn cmd_restart() -> Result<()> {
    let store = open_store()?;
    store.clear().context("failed to clear session")?;
    println!("Session cleared.");
    Ok(())
}

fn cmd_report(config: &Config, file: &Path, args: &ReportArgs) -> Result<()> {
    let format = args.export_format()?;
    let conclusions = config
        .data
        .conclusions()
        .context("failed to load conclusions")?;

    let snapshot =
        read_save_file(file).with_context(|| format!("failed to load {}", file.display()))?;

    let unanswered = snapshot.questions.len() - snapshot.answers.answered_count();
    if unanswered > 0 {
        eprintln!(
            "Note: {} of {} questions are unanswered; scores reflect answered questions only.",
            unanswered,
            snapshot.questions.len()
        );
    }

    let scores = compute_scores(&snapshot.questions, &snapshot.answers)
        .context("failed to compute scores")?;
    emit_report(config, &scores, &conclusions, args, format)
}

fn emit_report(
    config: &Config,
    scores: &Scores,
    conclusions: &Conclusions,
    args: &ReportArgs,
    format: Option<ExportFormat>,
) -> Result<()> {
    let settings = ReportSettings::from(&config.quiz);
    let report = ProfileReport::build(scores, conclusions, args.partner(), settings)
        .context("failed to build report")?;

    match (format, &args.output) {
        (None, _) => render::print_terminal(&report),
        (Some(format), Some(path)) => {
            render::write_export_file(path, &report, format)?;
            println!("Report written to {}", path.display());
        }
        (Some(format), None) => {
            let stdout = io::stdout();
            render::write_export(&mut stdout.lock(), &report, format)?;
        }
    }

    Ok(())
}
