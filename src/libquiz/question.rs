use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_QUESTION_TEXT: &str = "Is this movie rated above 6?";

const RATING_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub image_id: String,
    pub text: String,
    pub correct_answer: bool,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read question pack: {0}")]
    PackRead(#[from] std::io::Error),
    #[error("malformed question pack: {0}")]
    PackMalformed(#[from] serde_json::Error),
    #[error("question pack contains no questions")]
    EmptyPack,
}

pub trait QuestionSource {
    fn load(&self) -> Result<Vec<Question>, SourceError>;
}

/// The stock movie list; the yes/no answer follows from the rating.
pub struct BuiltinSource;

const BUILTIN_MOVIES: [(&str, f64); 10] = [
    ("The Godfather", 9.2),
    ("The Dark Knight", 9.0),
    ("Kill Bill", 8.1),
    ("The Avengers", 8.0),
    ("Deadpool", 8.0),
    ("The Green Knight", 6.6),
    ("Old", 5.8),
    ("The Ice Age Adventures of Buck Wild", 4.3),
    ("Tesla", 5.1),
    ("Vivarium", 5.9),
];

impl QuestionSource for BuiltinSource {
    fn load(&self) -> Result<Vec<Question>, SourceError> {
        Ok(BUILTIN_MOVIES
            .iter()
            .map(|&(title, rating)| Question {
                image_id: title.to_string(),
                text: DEFAULT_QUESTION_TEXT.to_string(),
                correct_answer: rating > RATING_THRESHOLD,
            })
            .collect())
    }
}

/// Loads questions from a JSON pack file.
pub struct JsonPackSource {
    path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug)]
struct PackJson {
    questions: Vec<QuestionJson>,
}
#[derive(Serialize, Deserialize, Debug)]
struct QuestionJson {
    image_id: String,
    text: Option<String>,
    correct_answer: bool,
}

impl JsonPackSource {
    pub fn new(path: PathBuf) -> JsonPackSource {
        JsonPackSource { path }
    }
}

impl QuestionSource for JsonPackSource {
    fn load(&self) -> Result<Vec<Question>, SourceError> {
        let json = fs::read_to_string(&self.path)?;
        parse_pack(json.as_str())
    }
}

fn parse_pack(json: &str) -> Result<Vec<Question>, SourceError> {
    let content: PackJson = serde_json::from_str(json)?;
    if content.questions.is_empty() {
        return Err(SourceError::EmptyPack);
    }
    Ok(content
        .questions
        .into_iter()
        .map(|question| Question {
            image_id: question.image_id,
            text: question
                .text
                .unwrap_or_else(|| DEFAULT_QUESTION_TEXT.to_string()),
            correct_answer: question.correct_answer,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_list_has_ten_movies_with_rating_answers() {
        let questions = BuiltinSource.load().unwrap();
        assert_eq!(questions.len(), 10);
        assert_eq!(questions[0].image_id, "The Godfather");
        assert!(questions[0].correct_answer);
        let old = questions.iter().find(|q| q.image_id == "Old").unwrap();
        assert!(!old.correct_answer);
        assert!(questions.iter().all(|q| q.text == DEFAULT_QUESTION_TEXT));
    }

    #[test]
    fn pack_parses_with_explicit_and_default_text() {
        let json = r#"{
            "questions": [
                {"image_id": "Alien", "text": "Rated above 6?", "correct_answer": true},
                {"image_id": "Morbius", "correct_answer": false}
            ]
        }"#;
        let questions = parse_pack(json).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Rated above 6?");
        assert_eq!(questions[1].text, DEFAULT_QUESTION_TEXT);
        assert!(!questions[1].correct_answer);
    }

    #[test]
    fn empty_pack_is_rejected() {
        let err = parse_pack(r#"{"questions": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::EmptyPack));
    }

    #[test]
    fn malformed_pack_is_rejected() {
        let err = parse_pack("{not json").unwrap_err();
        assert!(matches!(err, SourceError::PackMalformed(_)));
    }
}
