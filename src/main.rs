use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use std::path::PathBuf;
use thiserror::Error;

mod cli;
mod libquiz;

use crate::libquiz::db;
use crate::libquiz::question::{BuiltinSource, JsonPackSource, QuestionSource, SourceError};
use crate::libquiz::session::{QuizSession, SessionError};
use crate::libquiz::stats::StatisticsStore;

#[derive(Debug, PartialEq)]
enum Answer {
    Yes,
    No,
    Quit,
    Unknown,
}

impl Answer {
    fn from_str(input: &str) -> Answer {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Answer::Yes,
            "n" | "no" => Answer::No,
            "q" => Answer::Quit,
            _ => Answer::Unknown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "kinoquiz")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "statistics.db")]
    db: Option<PathBuf>,
    /// JSON question pack; the builtin movie list is used when absent.
    #[arg(short, long, value_name = "FILE")]
    pack: Option<PathBuf>,
    #[arg(short, long, default_value = "10")]
    question_count: u32,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error("no questions!")]
    NoQuestions,
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn main() -> Result<(), Error> {
    //INIT START
    let args = Args::parse();
    let question_count = args.question_count;
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let db_path = args.db.unwrap_or(PathBuf::from("statistics.db"));
    let conn = db::create_or_open(&db_path)?;
    debug!("[DB] Database Connection Successful!");
    let mut stats = StatisticsStore::new(conn);

    let source: Box<dyn QuestionSource> = match args.pack {
        Some(path) => Box::new(JsonPackSource::new(path)),
        None => Box::new(BuiltinSource),
    };
    let mut questions = match source.load() {
        Ok(questions) => questions,
        Err(err) => {
            warn!("[Setup] Cannot load questions: {}", err);
            println!("{}", format!("Cannot load questions: {}", err).yellow());
            return finish(stats, Err(err.into()));
        }
    };
    questions.truncate(question_count as usize);
    debug!("[Setup] Questions: {:?}", questions.len());
    if questions.is_empty() {
        warn!("[Setup] No questions to ask.");
        println!(
            "{}",
            "No questions to ask. Pass a question pack or raise --question-count!".yellow()
        );
        return finish(stats, Err(Error::NoQuestions));
    }

    println!(
        "{}",
        format!(
            "==========> Movie Quiz ({} questions) <==========",
            questions.len()
        )
        .cyan()
    );

    // INIT DONE

    let mut session = QuizSession::new(questions);
    let outcome = cli::run_quiz(&mut session, &mut stats);
    finish(stats, outcome)
}

fn finish(stats: StatisticsStore, to_error: Result<(), Error>) -> Result<(), Error> {
    stats.close()?;
    to_error
}
