use std::io::{self, BufRead, Write};

use crate::ui::ViewHost;

/// Terminal host. Frames are kept rather than printed so each command decides
/// which pane, if any, ends up on stdout.
pub struct CliHost {
    json: bool,
    assume_yes: bool,
    list: Option<String>,
    detail: Option<String>,
}

impl CliHost {
    pub fn new(json: bool, assume_yes: bool) -> Self {
        Self {
            json,
            assume_yes,
            list: None,
            detail: None,
        }
    }

    pub fn list_frame(&self) -> Option<&str> {
        self.list.as_deref()
    }

    pub fn detail_frame(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl ViewHost for CliHost {
    fn show_list(&mut self, markup: &str) {
        self.list = Some(markup.to_string());
    }

    fn show_detail(&mut self, markup: &str) {
        self.detail = Some(markup.to_string());
    }

    /// `--yes` accepts; otherwise ask on stderr and read one line from stdin.
    /// EOF or anything but y/yes declines.
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{message} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }

    fn alert(&mut self, message: &str) {
        tracing::debug!(message, "validation alert");
        if !self.json {
            eprintln!("Error: {message}");
        }
    }
}
