use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, Result};

use crate::libquiz::db;

/// One persisted key per scalar field.
mod keys {
    pub const GAMES_COUNT: &str = "gamesCount";
    pub const BEST_GAME_CORRECT: &str = "bestGameCorrect";
    pub const BEST_GAME_TOTAL: &str = "bestGameTotal";
    pub const BEST_GAME_DATE: &str = "bestGameDate";
    pub const TOTAL_CORRECT_ANSWERS: &str = "totalCorrectAnswers";
    pub const TOTAL_QUESTIONS_ASKED: &str = "totalQuestionsAsked";
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub correct: i64,
    pub total: i64,
    pub date: DateTime<Utc>,
}

impl GameResult {
    /// Higher correct count wins; an equal count keeps the incumbent best.
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        self.correct > other.correct
    }

    pub fn date_string(&self) -> String {
        self.date.format("%d.%m.%y %H:%M").to_string()
    }
}

/// Cross-session aggregates over an injected database connection.
pub struct StatisticsStore {
    conn: Connection,
}

impl StatisticsStore {
    pub fn new(conn: Connection) -> StatisticsStore {
        StatisticsStore { conn }
    }

    pub fn record_game(&mut self, result: &GameResult) -> Result<()> {
        let tx = self.conn.transaction()?;
        apply_record(&tx, result)?;
        tx.commit()?;
        debug!(
            "[Stats] Recorded game {}/{} ({})",
            result.correct,
            result.total,
            result.date_string()
        );
        Ok(())
    }

    pub fn games_count(&self) -> Result<i64> {
        read_count(&self.conn, keys::GAMES_COUNT)
    }

    pub fn total_correct_answers(&self) -> Result<i64> {
        read_count(&self.conn, keys::TOTAL_CORRECT_ANSWERS)
    }

    pub fn total_questions_asked(&self) -> Result<i64> {
        read_count(&self.conn, keys::TOTAL_QUESTIONS_ASKED)
    }

    pub fn total_accuracy(&self) -> Result<f64> {
        let asked = self.total_questions_asked()?;
        if asked == 0 {
            return Ok(0.0);
        }
        Ok(100.0 * self.total_correct_answers()? as f64 / asked as f64)
    }

    /// `None` until the first game has been recorded.
    pub fn best_game(&self) -> Result<Option<GameResult>> {
        read_best_game(&self.conn)
    }

    pub fn close(self) -> Result<()> {
        db::close_db(self.conn)
    }
}

fn read_count(conn: &Connection, key: &str) -> Result<i64> {
    Ok(db::get_i64(conn, key)?.unwrap_or(0))
}

// All six key writes of one recorded game. Runs inside a transaction so a
// crash between field writes cannot split the aggregates.
pub(crate) fn apply_record(conn: &Connection, result: &GameResult) -> Result<()> {
    add_to(conn, keys::TOTAL_CORRECT_ANSWERS, result.correct)?;
    add_to(conn, keys::TOTAL_QUESTIONS_ASKED, result.total)?;
    add_to(conn, keys::GAMES_COUNT, 1)?;
    let replace = match read_best_game(conn)? {
        None => true,
        Some(best) => result.is_better_than(&best),
    };
    if replace {
        write_best_game(conn, result)?;
    }
    Ok(())
}

fn add_to(conn: &Connection, key: &str, delta: i64) -> Result<()> {
    let current = db::get_i64(conn, key)?.unwrap_or(0);
    db::set_i64(conn, key, current + delta)
}

fn read_best_game(conn: &Connection) -> Result<Option<GameResult>> {
    let date = match db::get_i64(conn, keys::BEST_GAME_DATE)? {
        None => return Ok(None),
        Some(seconds) => DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH),
    };
    Ok(Some(GameResult {
        correct: db::get_i64(conn, keys::BEST_GAME_CORRECT)?.unwrap_or(0),
        total: db::get_i64(conn, keys::BEST_GAME_TOTAL)?.unwrap_or(0),
        date,
    }))
}

fn write_best_game(conn: &Connection, result: &GameResult) -> Result<()> {
    db::set_i64(conn, keys::BEST_GAME_CORRECT, result.correct)?;
    db::set_i64(conn, keys::BEST_GAME_TOTAL, result.total)?;
    db::set_i64(conn, keys::BEST_GAME_DATE, result.date.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> StatisticsStore {
        let conn = db::init_db(Connection::open_in_memory().unwrap()).unwrap();
        StatisticsStore::new(conn)
    }

    fn result(correct: i64, total: i64, seconds: i64) -> GameResult {
        GameResult {
            correct,
            total,
            date: DateTime::from_timestamp(seconds, 0).unwrap(),
        }
    }

    #[test]
    fn accuracy_is_zero_before_any_game() {
        let store = test_store();
        assert_eq!(store.total_accuracy().unwrap(), 0.0);
        assert_eq!(store.games_count().unwrap(), 0);
    }

    #[test]
    fn best_game_is_none_before_any_game() {
        let store = test_store();
        assert_eq!(store.best_game().unwrap(), None);
    }

    #[test]
    fn best_game_reads_are_idempotent() {
        let mut store = test_store();
        store.record_game(&result(4, 10, 1_700_000_000)).unwrap();
        assert_eq!(store.best_game().unwrap(), store.best_game().unwrap());
    }

    #[test]
    fn seven_of_ten_yields_seventy_percent() {
        let mut store = test_store();
        store.record_game(&result(7, 10, 1_700_000_000)).unwrap();
        assert_eq!(store.games_count().unwrap(), 1);
        assert_eq!(store.total_accuracy().unwrap(), 70.0);
    }

    #[test]
    fn all_correct_yields_one_hundred_percent() {
        let mut store = test_store();
        store.record_game(&result(10, 10, 1_700_000_000)).unwrap();
        assert_eq!(store.total_accuracy().unwrap(), 100.0);
    }

    #[test]
    fn totals_accumulate_across_games() {
        let mut store = test_store();
        store.record_game(&result(7, 10, 1_700_000_000)).unwrap();
        store.record_game(&result(9, 10, 1_700_000_100)).unwrap();
        assert_eq!(store.games_count().unwrap(), 2);
        assert_eq!(store.total_correct_answers().unwrap(), 16);
        assert_eq!(store.total_questions_asked().unwrap(), 20);
        assert_eq!(store.total_accuracy().unwrap(), 80.0);
    }

    #[test]
    fn higher_correct_count_replaces_the_best_game() {
        let mut store = test_store();
        store.record_game(&result(7, 10, 1_700_000_000)).unwrap();
        store.record_game(&result(9, 10, 1_700_000_100)).unwrap();
        let best = store.best_game().unwrap().unwrap();
        assert_eq!(best.correct, 9);
        assert_eq!(best.date, DateTime::from_timestamp(1_700_000_100, 0).unwrap());
    }

    #[test]
    fn lower_correct_count_keeps_the_best_game() {
        let mut store = test_store();
        store.record_game(&result(5, 10, 1_700_000_000)).unwrap();
        store.record_game(&result(3, 10, 1_700_000_100)).unwrap();
        let best = store.best_game().unwrap().unwrap();
        assert_eq!(best.correct, 5);
        assert_eq!(best.date, DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn equal_correct_count_keeps_the_incumbent() {
        let mut store = test_store();
        store.record_game(&result(5, 10, 1_700_000_000)).unwrap();
        store.record_game(&result(5, 8, 1_700_000_100)).unwrap();
        let best = store.best_game().unwrap().unwrap();
        assert_eq!(best.total, 10);
        assert_eq!(best.date, DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn best_game_date_survives_persistence() {
        let mut store = test_store();
        let recorded = result(8, 10, 1_700_000_000);
        store.record_game(&recorded).unwrap();
        assert_eq!(store.best_game().unwrap().unwrap(), recorded);
    }

    #[test]
    fn dropped_transaction_leaves_aggregates_untouched() {
        let mut conn = db::init_db(Connection::open_in_memory().unwrap()).unwrap();
        {
            let tx = conn.transaction().unwrap();
            apply_record(&tx, &result(7, 10, 1_700_000_000)).unwrap();
            // no commit: simulates a crash mid-record
        }
        let store = StatisticsStore::new(conn);
        assert_eq!(store.games_count().unwrap(), 0);
        assert_eq!(store.total_questions_asked().unwrap(), 0);
        assert_eq!(store.best_game().unwrap(), None);
    }
}
