use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

mod libquiz;
use crate::libquiz::db;
use crate::libquiz::stats::StatisticsStore;

#[derive(Parser, Debug)]
#[command(name = "statstool")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", default_value = "statistics.db")]
    db: Option<PathBuf>,

    /// Output file for `export`; stdout when absent.
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Show,
    Export,
}

#[derive(Serialize, Deserialize, Debug)]
struct StatsJson {
    games_count: i64,
    total_correct_answers: i64,
    total_questions_asked: i64,
    total_accuracy: f64,
    best_game: Option<BestGameJson>,
}
#[derive(Serialize, Deserialize, Debug)]
struct BestGameJson {
    correct: i64,
    total: i64,
    date: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let db_path = match args.db {
        Some(d) => d,
        None => {
            error!("{}", "Database file not specified!".red());
            std::process::exit(1);
        }
    };
    if !db_path.exists() {
        error!(
            "{}",
            format!("No statistics database at {:?}. Play a round first!", db_path).red()
        );
        std::process::exit(1);
    }
    let conn = match db::open_db(&db_path) {
        Ok(c) => c,
        Err(e) => {
            error!("{}{}", "Unable to open Database: ".red(), e);
            std::process::exit(1);
        }
    };
    let stats = StatisticsStore::new(conn);

    let content = match collect(&stats) {
        Ok(c) => c,
        Err(e) => {
            error!("{}{}", "Unable to read statistics: ".red(), e);
            stats.close().unwrap();
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Show => {
            info!("{}", format!("Statistics from {:?}", db_path).cyan());
            println!("{} {}", "Games played:".cyan(), content.games_count);
            println!(
                "{} {}/{}",
                "Answers correct:".cyan(),
                content.total_correct_answers, content.total_questions_asked
            );
            println!(
                "{} {:.2}%",
                "Accuracy:".cyan(),
                content.total_accuracy
            );
            match &content.best_game {
                Some(best) => println!(
                    "{} {}/{} ({})",
                    "Best game:".cyan(),
                    best.correct, best.total, best.date
                ),
                None => println!("{} {}", "Best game:".cyan(), "never".yellow()),
            }
        }
        Commands::Export => {
            let json = serde_json::to_string_pretty(&content).unwrap();
            match args.out {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        error!("{}", format!("Cannot write {:?}: {}!", path, e).red());
                        stats.close().unwrap();
                        std::process::exit(1);
                    }
                    info!("{}", format!("Exported statistics to {:?}", path).green());
                }
                None => println!("{}", json),
            }
        }
    }

    stats.close().unwrap()
}

fn collect(stats: &StatisticsStore) -> rusqlite::Result<StatsJson> {
    Ok(StatsJson {
        games_count: stats.games_count()?,
        total_correct_answers: stats.total_correct_answers()?,
        total_questions_asked: stats.total_questions_asked()?,
        total_accuracy: stats.total_accuracy()?,
        best_game: stats.best_game()?.map(|best| BestGameJson {
            correct: best.correct,
            total: best.total,
            date: best.date_string(),
        }),
    })
}
