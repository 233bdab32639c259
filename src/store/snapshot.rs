//! Persisted document shape: `{ projects, todos, currentProjectId }`.
//!
//! Entities are stored flat with their full field set and reference each other
//! by id only. Parsing is the validation boundary: a document either becomes
//! fully typed entities or fails as `CORRUPT_STATE`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TaskboardError;
use crate::models::{Project, Todo};

/// Slot the snapshot is written under.
pub const STORAGE_KEY: &str = "taskboard.snapshot";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub current_project_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    projects: &'a [Project],
    todos: &'a [Todo],
    current_project_id: Option<&'a str>,
}

pub fn encode(
    projects: &[Project],
    todos: &[Todo],
    current_project_id: Option<&str>,
) -> Result<String, TaskboardError> {
    serde_json::to_string(&SnapshotRef {
        projects,
        todos,
        current_project_id,
    })
    .map_err(|e| TaskboardError::storage(format!("failed to encode snapshot: {e}")))
}

pub fn decode(raw: &str) -> Result<Snapshot, TaskboardError> {
    let snapshot: Snapshot = serde_json::from_str(raw).map_err(TaskboardError::corrupt_state)?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn validate(snapshot: &Snapshot) -> Result<(), TaskboardError> {
    let mut seen = HashSet::new();
    for project in &snapshot.projects {
        if project.id.is_empty() {
            return Err(TaskboardError::corrupt_state("project with empty id"));
        }
        if project.title.trim().is_empty() {
            return Err(TaskboardError::corrupt_state(format!(
                "project {} has an empty title",
                project.id
            )));
        }
        if !seen.insert(project.id.as_str()) {
            return Err(TaskboardError::corrupt_state(format!(
                "duplicate project id {}",
                project.id
            )));
        }
    }

    seen.clear();
    for todo in &snapshot.todos {
        if todo.id.is_empty() {
            return Err(TaskboardError::corrupt_state("todo with empty id"));
        }
        if todo.title.trim().is_empty() {
            return Err(TaskboardError::corrupt_state(format!(
                "todo {} has an empty title",
                todo.id
            )));
        }
        if !seen.insert(todo.id.as_str()) {
            return Err(TaskboardError::corrupt_state(format!(
                "duplicate todo id {}",
                todo.id
            )));
        }
    }
    Ok(())
}
