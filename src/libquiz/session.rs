use chrono::Utc;
use thiserror::Error;

use crate::libquiz::question::Question;
use crate::libquiz::stats::GameResult;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("question {index} is out of range (session has {total} questions)")]
    OutOfRange { index: usize, total: usize },
    #[error("session still has {remaining} unanswered questions")]
    NotFinished { remaining: usize },
}

/// One playthrough over an ordered question list. `submit_answer` is the
/// single mutation point for `current_index` and `correct_count`.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    correct_count: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> QuizSession {
        QuizSession {
            questions,
            current_index: 0,
            correct_count: 0,
        }
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current_index)
            .ok_or(SessionError::OutOfRange {
                index: self.current_index,
                total: self.questions.len(),
            })
    }

    pub fn submit_answer(&mut self, user_said_yes: bool) -> Result<bool, SessionError> {
        let is_correct = user_said_yes == self.current_question()?.correct_answer;
        if is_correct {
            self.correct_count += 1;
        }
        self.current_index += 1;
        Ok(is_correct)
    }

    pub fn is_finished(&self) -> bool {
        self.current_index == self.questions.len()
    }

    /// Restores the initial state over the same question list.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.correct_count = 0;
    }

    pub fn result(&self) -> Result<GameResult, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished {
                remaining: self.questions.len() - self.current_index,
            });
        }
        Ok(GameResult {
            correct: self.correct_count as i64,
            total: self.questions.len() as i64,
            date: Utc::now(),
        })
    }

    /// "N/M" position string for the current question.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.questions.len())
    }
}
