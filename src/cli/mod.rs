pub mod board;
pub mod commands;
pub mod host;
pub mod init;
pub mod project;
pub mod reset;
pub mod todo;

use std::path::PathBuf;

use crate::config::Config;
use crate::db::{connection, SqliteKv};
use crate::error::{ErrorCode, TaskboardError};
use crate::output;
use crate::store::Store;
use crate::ui::{Outcome, Ui};

pub use commands::*;
pub use host::CliHost;

/// Global flags every command runs with.
#[derive(Debug, Clone)]
pub struct Context {
    pub json: bool,
    pub dir: Option<PathBuf>,
    pub yes: bool,
}

pub type CliUi = Ui<SqliteKv, CliHost>;

impl Context {
    pub fn data_dir(&self) -> Result<PathBuf, TaskboardError> {
        connection::data_dir(self.dir.as_deref())
    }

    /// Open the board: database, config, store, and a UI drawing into a [`CliHost`].
    pub fn open_ui(&self) -> Result<CliUi, TaskboardError> {
        let data_dir = self.data_dir()?;
        let conn = connection::open_db(&data_dir)?;
        let config = Config::load(&data_dir)?;
        let store = Store::open(SqliteKv::new(conn), &config.store_options())?;
        Ok(Ui::new(store, CliHost::new(self.json, self.yes)))
    }
}

/// Print an error the way the current output mode expects and return exit code 1.
pub fn report_error(e: &TaskboardError, json_output: bool) -> i32 {
    if json_output {
        output::json::print(&output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
    }
    1
}

pub fn finish(result: Result<i32, TaskboardError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => report_error(&e, json_output),
    }
}

/// Handle the outcomes that end a command early. Returns `Some(exit code)`
/// when the caller should stop.
pub fn settle(outcome: &Outcome, json_output: bool) -> Option<i32> {
    match outcome {
        Outcome::Declined => {
            if json_output {
                output::json::print(&output::json::success(serde_json::json!({
                    "cancelled": true
                })));
            } else {
                println!("Cancelled.");
            }
            Some(0)
        }
        Outcome::Rejected(message) => {
            // Text mode already printed the alert.
            if json_output {
                output::json::print(&output::json::error_parts(
                    ErrorCode::ValidationError,
                    message,
                ));
            }
            Some(1)
        }
        Outcome::Ignored => Some(report_error(
            &TaskboardError::validation("Target no longer exists"),
            json_output,
        )),
        Outcome::Applied | Outcome::Created(_) => None,
    }
}
