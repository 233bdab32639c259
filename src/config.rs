use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::db::connection;
use crate::error::TaskboardError;
use crate::store::{StoreOptions, DEFAULT_PROJECT_DESCRIPTION, DEFAULT_PROJECT_TITLE};

/// Optional `<data dir>/config.json`. Every field has a default, so a missing
/// file and `{}` behave the same.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_project: DefaultProject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultProject {
    pub title: String,
    pub description: String,
}

impl Default for DefaultProject {
    fn default() -> Self {
        Self {
            title: DEFAULT_PROJECT_TITLE.to_string(),
            description: DEFAULT_PROJECT_DESCRIPTION.to_string(),
        }
    }
}

impl Config {
    pub fn load(data_dir: &Path) -> Result<Self, TaskboardError> {
        let path = connection::config_path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            TaskboardError::validation(format!("Invalid config {}: {e}", path.display()))
        })?;
        if config.default_project.title.trim().is_empty() {
            return Err(TaskboardError::validation(format!(
                "Invalid config {}: default_project.title must not be empty",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            default_project_title: self.default_project.title.clone(),
            default_project_description: self.default_project.description.clone(),
        }
    }
}
