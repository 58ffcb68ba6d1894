use log::{debug, error, info, warn};
use rusqlite::{params, Connection, DatabaseName, Result};
use std::path::Path;
use std::time::Instant;

pub(crate) fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub(crate) fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = init_db(Connection::open_in_memory()?)?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            // Reopen the file so later writes actually persist.
            close_db(db)?;
            open_db(dest)
        }
        Err(err) => {
            warn!("Failed to create database file: {}", err);
            close_db(db)?;
            Err(err)
        }
    }
}

pub(crate) fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub(crate) fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    match connection.close() {
        Ok(_) => Ok(()),
        Err((conn, err)) => {
            error!("[DB] Cannot close connection ({}). Retrying 1/2...", err);
            match conn.close() {
                Ok(_) => Ok(()),
                Err((conn2, err)) => {
                    error!("[DB] Cannot close connection ({}). Retrying 2/2...", err);
                    match conn2.close() {
                        Ok(_) => Ok(()),
                        Err(_) => panic!("[DB] Cannot close connection! Aborting."),
                    }
                }
            }
        }
    }
}

pub(crate) fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute(
        "CREATE TABLE Statistics (
              key TEXT NOT NULL,
              value INTEGER NOT NULL,
              PRIMARY KEY (key)
            )",
        (),
    )?;
    info!("[DB INIT] Created table Statistics");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}

pub(crate) fn get_i64(conn: &Connection, key: &str) -> Result<Option<i64>> {
    let mut statement = conn.prepare("SELECT value FROM Statistics WHERE key = :key LIMIT 1")?;
    match statement.query_row(&[(":key", &key)], |row| row.get(0)) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err),
    }
}

pub(crate) fn set_i64(conn: &Connection, key: &str, value: i64) -> Result<()> {
    match conn.execute(
        "INSERT INTO Statistics(key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    ) {
        Ok(_) => Ok(()),
        Err(err) => {
            error!("[DB] Failed to set '{}' to {}.", key, value);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        init_db(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn missing_key_reads_as_none() {
        let conn = test_conn();
        assert_eq!(get_i64(&conn, "gamesCount").unwrap(), None);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let conn = test_conn();
        set_i64(&conn, "gamesCount", 3).unwrap();
        assert_eq!(get_i64(&conn, "gamesCount").unwrap(), Some(3));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let conn = test_conn();
        set_i64(&conn, "totalQuestionsAsked", 10).unwrap();
        set_i64(&conn, "totalQuestionsAsked", 20).unwrap();
        assert_eq!(get_i64(&conn, "totalQuestionsAsked").unwrap(), Some(20));
    }
}
