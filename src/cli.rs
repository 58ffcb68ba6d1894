use crate::libquiz::session::QuizSession;
use crate::libquiz::stats::{GameResult, StatisticsStore};
use crate::{Answer, Error};
use colored::Colorize;
use log::debug;
use text_io::read;

pub fn run_quiz(session: &mut QuizSession, stats: &mut StatisticsStore) -> Result<(), Error> {
    loop {
        while !session.is_finished() {
            let (image_id, text, correct_answer) = {
                let question = session.current_question()?;
                (
                    question.image_id.clone(),
                    question.text.clone(),
                    question.correct_answer,
                )
            };

            let leading = format!("{}. ", session.progress_label());
            println!("{}{}", leading.cyan(), image_id.black().bold().on_white());
            println!("{}{}", " ".repeat(leading.len()), text);

            print!("{} ", "Answer (y/n, q to quit prematurely):".cyan());
            let choice_string: String = read!("{}\n");
            let choice = Answer::from_str(choice_string.as_str());
            debug!("choice: {:?}", choice);

            let user_said_yes = match choice {
                Answer::Yes => true,
                Answer::No => false,
                Answer::Unknown => {
                    println!("{}", "Please answer y or n!".bright_red());
                    continue;
                }
                Answer::Quit => {
                    println!("{}", "Quitting Early!".cyan());
                    return Ok(());
                }
            };

            if session.submit_answer(user_said_yes)? {
                println!("{}", "Correct!".bright_green());
            } else {
                println!("{}", "Incorrect!".bright_red());
                let answer = if correct_answer { "yes" } else { "no" };
                println!("{}", format!("The answer was {}.", answer).green());
            }
        }

        let result = session.result()?;
        stats.record_game(&result)?;
        print_summary(stats, &result)?;

        print!("{} ", "Play again? (y/n):".cyan());
        let replay_string: String = read!("{}\n");
        match Answer::from_str(replay_string.as_str()) {
            Answer::Yes => session.reset(),
            _ => return Ok(()),
        }
    }
}

fn print_summary(stats: &StatisticsStore, result: &GameResult) -> Result<(), Error> {
    println!("{}", "==========> Round over! <==========".cyan());
    println!(
        "{}",
        format!(
            "You answered {} of {} correctly.",
            result.correct, result.total
        )
        .bright_green()
    );
    println!("Total games: {}", stats.games_count()?);
    if let Some(best) = stats.best_game()? {
        println!(
            "Best game: {}/{} ({})",
            best.correct,
            best.total,
            best.date_string()
        );
    }
    println!(
        "{}",
        format!("Your accuracy: {:.2}%", stats.total_accuracy()?).cyan()
    );
    Ok(())
}
