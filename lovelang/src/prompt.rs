//! Line-oriented quiz loop for the `take` command.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lovelang_core::{Advance, Screen, SessionController, SessionRepository};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

/// A parsed line of input while a question is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based option number
    Select(usize),
    Back,
    Save(String),
    Restart,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "b" | "back" => return Command::Back,
            "r" | "restart" => return Command::Restart,
            "q" | "quit" => return Command::Quit,
            _ => {}
        }

        if let Some(name) = line.strip_prefix("s ") {
            return Command::Save(name.trim().to_string());
        }
        if line == "s" {
            return Command::Save(String::new());
        }

        match line.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Select(n),
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
}

pub struct PromptOptions<'a> {
    /// Pause between a selection and the next question
    pub advance_delay: Duration,
    /// Where `s NAME` writes save files
    pub save_dir: &'a Path,
}

/// Run the session until it completes or the respondent quits.
///
/// End of input counts as quitting; progress is already persisted.
pub fn run<S: SessionRepository, R: BufRead>(
    session: &mut SessionController<S>,
    input: R,
    options: &PromptOptions<'_>,
) -> Result<Outcome> {
    let mut lines = input.lines();
    let progress = progress_bar(session.question_count());

    loop {
        match session.screen() {
            Screen::Results => {
                progress.finish_and_clear();
                return Ok(Outcome::Completed);
            }
            Screen::Intro => {
                progress.suspend(|| print_intro(session.question_count()));
                let Some(line) = next_line(&mut lines)? else {
                    progress.finish_and_clear();
                    return Ok(Outcome::Quit);
                };
                if Command::parse(&line) == Command::Quit {
                    progress.finish_and_clear();
                    return Ok(Outcome::Quit);
                }
                session.start().context("failed to start session")?;
            }
            Screen::Questions => {
                progress.set_position(session.position() as u64 + 1);
                progress.set_message(progress_message(session));
                progress.suspend(|| print_question(session));

                let Some(line) = next_line(&mut lines)? else {
                    progress.finish_and_clear();
                    println!("Progress saved. Run `lovelang` again to continue.");
                    return Ok(Outcome::Quit);
                };

                match Command::parse(&line) {
                    Command::Select(n) => select(session, n, options.advance_delay),
                    Command::Back if !session.can_retreat() => {
                        println!("Already at the first question.");
                    }
                    Command::Back => {
                        if let Err(e) = session.retreat() {
                            println!("Error: {}", e);
                        }
                    }
                    Command::Save(name) => match session.save_to(options.save_dir, &name) {
                        Ok(path) => println!("Saved progress to {}", path.display()),
                        Err(e) => println!("Error: {}", e),
                    },
                    Command::Restart => {
                        session.restart();
                        progress.set_length(session.question_count() as u64);
                        progress.set_position(0);
                        println!("Assessment restarted.");
                    }
                    Command::Quit => {
                        progress.finish_and_clear();
                        println!("Progress saved. Run `lovelang` again to continue.");
                        return Ok(Outcome::Quit);
                    }
                    Command::Unknown(text) => {
                        println!(
                            "Unrecognized input {:?}. Enter an option number, b, s NAME, r or q.",
                            text
                        );
                    }
                }
            }
        }
    }
}

fn select<S: SessionRepository>(session: &mut SessionController<S>, n: usize, delay: Duration) {
    let index = n - 1;
    let Some(option) = session.current_question().and_then(|q| q.option(index)) else {
        println!("Choose an option between 1 and {}.", option_count(session));
        return;
    };
    println!("→ {}", option.text);

    if !delay.is_zero() {
        std::thread::sleep(delay);
    }

    match session.answer_and_advance(index) {
        Ok(Advance::Next) | Ok(Advance::Completed) => {}
        Err(e) => println!("Error: {}", e),
    }
}

fn option_count<S: SessionRepository>(session: &SessionController<S>) -> usize {
    session
        .current_question()
        .map(|q| q.options.len())
        .unwrap_or(0)
}

fn next_line<I>(lines: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    print!("> ");
    std::io::stdout().flush().ok();
    match lines.next() {
        Some(line) => Ok(Some(line.context("failed to read input")?)),
        None => {
            println!();
            Ok(None)
        }
    }
}

fn progress_message<S: SessionRepository>(session: &SessionController<S>) -> String {
    format!("{:.0}%", session.progress_percent())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{bar:40.magenta/white}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_intro(question_count: usize) {
    println!();
    println!("Discover Your Love Language");
    println!();
    println!(
        "Answer {} short questions about how you like to receive love and how you",
        question_count
    );
    println!("naturally give it. There are no right or wrong answers.");
    println!();
    println!("While answering: enter an option number, b to go back, s NAME to save,");
    println!("r to restart, q to quit. Progress is saved automatically.");
    println!();
    println!("Press Enter to begin, or q to quit.");
}

fn print_question<S: SessionRepository>(session: &SessionController<S>) {
    let Some(question) = session.current_question() else {
        return;
    };
    let selected = session.selected_answer();

    println!();
    println!(
        "Question {} of {} ({})",
        session.position() + 1,
        session.question_count(),
        question.context.label()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { "*" } else { " " };
        println!(" {}{}. {}", marker, i + 1, option.text);
    }
}
