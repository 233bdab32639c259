use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::TaskboardError;

use super::migrations;

pub const DATA_DIR_NAME: &str = ".taskboard";
pub const DB_FILE_NAME: &str = "taskboard.db";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Find the nearest ancestor of the current directory holding a `.taskboard` dir.
pub fn find_board_root() -> Result<PathBuf, TaskboardError> {
    let mut dir = env::current_dir()?;
    loop {
        if dir.join(DATA_DIR_NAME).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TaskboardError::not_initialized());
        }
    }
}

/// Resolve the data directory: an explicit override wins, otherwise walk up
/// from the current directory.
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf, TaskboardError> {
    match explicit {
        Some(root) => Ok(root.join(DATA_DIR_NAME)),
        None => Ok(find_board_root()?.join(DATA_DIR_NAME)),
    }
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Open the board database. Returns error if not initialized.
pub fn open_db(data_dir: &Path) -> Result<Connection, TaskboardError> {
    let path = db_path(data_dir);
    if !path.exists() {
        return Err(TaskboardError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Create the data directory and database under `root`. Safe to repeat.
pub fn init_db(root: &Path) -> Result<PathBuf, TaskboardError> {
    let dir = root.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    let path = db_path(&dir);
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    tracing::debug!(path = %path.display(), "database initialized");
    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskboardError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA synchronous=FULL;",
    )?;
    Ok(())
}
