//! The authoritative in-memory collection of projects and todos.
//!
//! Every mutating operation writes a full snapshot to the backing
//! [`KeyValueStore`] before it returns, so the caller never observes memory
//! and storage out of step. A failed write rolls memory back to the last
//! saved state before the error is returned. Lookups by unknown id return
//! `None` and do not touch storage.

pub mod snapshot;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::db::KeyValueStore;
use crate::error::TaskboardError;
use crate::models::{Priority, Project, ProjectUpdate, Todo, TodoStatus, TodoUpdate};

pub use snapshot::{Snapshot, STORAGE_KEY};

pub const DEFAULT_PROJECT_TITLE: &str = "My Tasks";
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Default project for todos";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Project created when the store comes up empty.
    pub default_project_title: String,
    pub default_project_description: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_project_title: DEFAULT_PROJECT_TITLE.to_string(),
            default_project_description: DEFAULT_PROJECT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
    pub percentage: f64,
}

pub struct Store<B: KeyValueStore> {
    backend: B,
    projects: Vec<Project>,
    todos: Vec<Todo>,
    current_project_id: Option<String>,
}

/// In-memory state as of the last successful save.
struct Checkpoint {
    projects: Vec<Project>,
    todos: Vec<Todo>,
    current_project_id: Option<String>,
}

impl<B: KeyValueStore> Store<B> {
    /// Load the persisted snapshot and make sure at least one project exists.
    pub fn open(backend: B, options: &StoreOptions) -> Result<Self, TaskboardError> {
        let mut store = Self::blank(backend);
        store.load_from_storage()?;

        if store.projects.is_empty() {
            let project = Project::new(options.default_project_title.as_str())
                .with_description(options.default_project_description.as_str());
            let id = project.id.clone();
            store.projects.push(project);
            store.current_project_id = Some(id);
            store.save_to_storage()?;
            tracing::info!("created default project");
        }
        Ok(store)
    }

    /// An empty store that has not read the backend.
    pub fn blank(backend: B) -> Self {
        Self {
            backend,
            projects: Vec::new(),
            todos: Vec::new(),
            current_project_id: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- projects ---

    pub fn add_project(&mut self, project: Project) -> Result<&Project, TaskboardError> {
        let checkpoint = self.checkpoint();
        let id = project.id.clone();
        self.projects.push(project);
        self.commit(checkpoint)?;
        tracing::info!(project = %id, "project added");
        Ok(&self.projects[self.projects.len() - 1])
    }

    pub fn get_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn get_all_projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn update_project(
        &mut self,
        id: &str,
        updates: ProjectUpdate,
    ) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, |p| p.update(updates))
    }

    pub fn start_project(&mut self, id: &str) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, Project::start)
    }

    pub fn complete_project(&mut self, id: &str) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, Project::complete)
    }

    pub fn pause_project(&mut self, id: &str) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, |p| {
            p.pause();
            Ok(())
        })
    }

    pub fn resume_project(&mut self, id: &str) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, Project::resume)
    }

    pub fn cancel_project(&mut self, id: &str) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, Project::cancel)
    }

    pub fn add_project_example(
        &mut self,
        id: &str,
        url: &str,
    ) -> Result<Option<&Project>, TaskboardError> {
        self.mutate_project(id, |p| {
            p.add_example(url);
            Ok(())
        })
    }

    /// Removes the project together with every todo that references it.
    /// Returns the removed project and the number of todos removed with it.
    pub fn delete_project(
        &mut self,
        id: &str,
    ) -> Result<Option<(Project, usize)>, TaskboardError> {
        let Some(idx) = self.projects.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let checkpoint = self.checkpoint();
        let before = self.todos.len();
        self.todos.retain(|t| t.project_id.as_deref() != Some(id));
        let removed_todos = before - self.todos.len();
        let project = self.projects.remove(idx);

        if self.current_project_id.as_deref() == Some(id) {
            self.current_project_id = self.projects.first().map(|p| p.id.clone());
        }

        self.commit(checkpoint)?;
        tracing::info!(project = %id, removed_todos, "project deleted");
        Ok(Some((project, removed_todos)))
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project_id.as_deref()
    }

    pub fn get_current_project(&self) -> Option<&Project> {
        self.current_project_id
            .as_deref()
            .and_then(|id| self.get_project(id))
    }

    pub fn set_current_project(&mut self, id: &str) -> Result<&Project, TaskboardError> {
        let Some(idx) = self.projects.iter().position(|p| p.id == id) else {
            return Err(TaskboardError::project_not_found(id));
        };
        let checkpoint = self.checkpoint();
        self.current_project_id = Some(id.to_string());
        self.commit(checkpoint)?;
        Ok(&self.projects[idx])
    }

    /// Resolve a project reference: exact id → exact title → id prefix → title fragment.
    pub fn resolve_project(&self, reference: &str) -> Result<&Project, TaskboardError> {
        resolve(
            &self.projects,
            reference,
            |p| p.id.as_str(),
            |p| p.title.as_str(),
            TaskboardError::project_not_found,
        )
    }

    pub fn project_progress(&self, project_id: &str) -> ProjectProgress {
        let today = Utc::now().date_naive();
        let mut progress = ProjectProgress::default();
        for todo in self.get_todos_by_project(project_id) {
            match todo.status {
                TodoStatus::Todo => progress.todo += 1,
                TodoStatus::InProgress => progress.in_progress += 1,
                TodoStatus::Done => progress.done += 1,
            }
            if todo.is_overdue_on(today) {
                progress.overdue += 1;
            }
        }
        progress.total = progress.todo + progress.in_progress + progress.done;
        progress.percentage = if progress.total > 0 {
            (progress.done as f64 / progress.total as f64) * 100.0
        } else {
            0.0
        };
        progress
    }

    // --- todos ---

    pub fn add_todo(&mut self, todo: Todo) -> Result<&Todo, TaskboardError> {
        let checkpoint = self.checkpoint();
        tracing::info!(todo = %todo.id, project = ?todo.project_id, "todo added");
        self.todos.push(todo);
        self.commit(checkpoint)?;
        Ok(&self.todos[self.todos.len() - 1])
    }

    pub fn get_todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn get_all_todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn update_todo(
        &mut self,
        id: &str,
        updates: TodoUpdate,
    ) -> Result<Option<&Todo>, TaskboardError> {
        self.mutate_todo(id, |t| t.update(updates))
    }

    pub fn start_todo(&mut self, id: &str) -> Result<Option<&Todo>, TaskboardError> {
        self.mutate_todo(id, Todo::start_progress)
    }

    pub fn complete_todo(&mut self, id: &str) -> Result<Option<&Todo>, TaskboardError> {
        self.mutate_todo(id, |t| {
            t.complete();
            Ok(())
        })
    }

    pub fn reopen_todo(&mut self, id: &str) -> Result<Option<&Todo>, TaskboardError> {
        self.mutate_todo(id, |t| {
            t.reopen();
            Ok(())
        })
    }

    pub fn delete_todo(&mut self, id: &str) -> Result<Option<Todo>, TaskboardError> {
        let Some(idx) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let checkpoint = self.checkpoint();
        let todo = self.todos.remove(idx);
        self.commit(checkpoint)?;
        tracing::info!(todo = %id, "todo deleted");
        Ok(Some(todo))
    }

    /// Resolve a todo reference: exact id → exact title → id prefix → title fragment.
    pub fn resolve_todo(&self, reference: &str) -> Result<&Todo, TaskboardError> {
        resolve(
            &self.todos,
            reference,
            |t| t.id.as_str(),
            |t| t.title.as_str(),
            TaskboardError::todo_not_found,
        )
    }

    // --- queries ---

    pub fn get_todos_by_project(&self, project_id: &str) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project_id))
            .collect()
    }

    /// Todos that belong to no project.
    pub fn get_unassigned_todos(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.project_id.is_none()).collect()
    }

    pub fn get_todos_by_status(&self, status: TodoStatus) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.status == status).collect()
    }

    pub fn get_todos_by_priority(&self, priority: Priority) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.priority == priority).collect()
    }

    pub fn get_overdue_todos(&self) -> Vec<&Todo> {
        self.get_overdue_todos_on(Utc::now().date_naive())
    }

    pub fn get_overdue_todos_on(&self, today: NaiveDate) -> Vec<&Todo> {
        self.todos.iter().filter(|t| t.is_overdue_on(today)).collect()
    }

    // --- persistence ---

    pub fn save_to_storage(&mut self) -> Result<(), TaskboardError> {
        let raw = snapshot::encode(
            &self.projects,
            &self.todos,
            self.current_project_id.as_deref(),
        )?;
        self.backend.set(STORAGE_KEY, &raw)?;
        tracing::debug!(
            projects = self.projects.len(),
            todos = self.todos.len(),
            bytes = raw.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Replace in-memory state with the persisted snapshot, if one exists.
    /// A corrupt snapshot leaves the store untouched and fails with `CORRUPT_STATE`.
    pub fn load_from_storage(&mut self) -> Result<(), TaskboardError> {
        let Some(raw) = self.backend.get(STORAGE_KEY)? else {
            tracing::debug!("no snapshot found");
            return Ok(());
        };
        let snapshot = snapshot::decode(&raw).inspect_err(|e| {
            tracing::warn!(error = %e, "persisted snapshot rejected");
        })?;

        self.projects = snapshot.projects;
        self.todos = snapshot.todos;
        self.current_project_id = snapshot.current_project_id;
        tracing::debug!(
            projects = self.projects.len(),
            todos = self.todos.len(),
            "snapshot loaded"
        );
        Ok(())
    }

    /// Drop every entity and erase the persisted snapshot. Memory is only
    /// cleared once the snapshot is gone.
    pub fn clear_all(&mut self) -> Result<(), TaskboardError> {
        self.backend.remove(STORAGE_KEY)?;
        self.projects.clear();
        self.todos.clear();
        self.current_project_id = None;
        tracing::info!("store cleared");
        Ok(())
    }

    fn mutate_project<F>(&mut self, id: &str, f: F) -> Result<Option<&Project>, TaskboardError>
    where
        F: FnOnce(&mut Project) -> Result<(), TaskboardError>,
    {
        let Some(idx) = self.projects.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let checkpoint = self.checkpoint();
        f(&mut self.projects[idx])?;
        self.commit(checkpoint)?;
        Ok(Some(&self.projects[idx]))
    }

    fn mutate_todo<F>(&mut self, id: &str, f: F) -> Result<Option<&Todo>, TaskboardError>
    where
        F: FnOnce(&mut Todo) -> Result<(), TaskboardError>,
    {
        let Some(idx) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let checkpoint = self.checkpoint();
        f(&mut self.todos[idx])?;
        self.commit(checkpoint)?;
        Ok(Some(&self.todos[idx]))
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            projects: self.projects.clone(),
            todos: self.todos.clone(),
            current_project_id: self.current_project_id.clone(),
        }
    }

    /// Persist the mutated state, or put `checkpoint` back when the write fails.
    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), TaskboardError> {
        if let Err(e) = self.save_to_storage() {
            tracing::warn!(error = %e, "snapshot write failed, rolling back");
            self.projects = checkpoint.projects;
            self.todos = checkpoint.todos;
            self.current_project_id = checkpoint.current_project_id;
            return Err(e);
        }
        Ok(())
    }
}

fn resolve<'a, T>(
    items: &'a [T],
    reference: &str,
    id_of: impl Fn(&T) -> &str,
    title_of: impl Fn(&T) -> &str,
    not_found: fn(&str) -> TaskboardError,
) -> Result<&'a T, TaskboardError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(not_found(reference));
    }
    if let Some(item) = items.iter().find(|i| id_of(*i) == reference) {
        return Ok(item);
    }

    let needle = reference.to_lowercase();
    let title_eq = |i: &T| title_of(i).to_lowercase() == needle;
    let id_prefix = |i: &T| id_of(i).to_lowercase().starts_with(&needle);
    let title_fragment = |i: &T| title_of(i).to_lowercase().contains(&needle);
    let stages: [&dyn Fn(&T) -> bool; 3] = [&title_eq, &id_prefix, &title_fragment];

    for stage in stages {
        let found: Vec<&T> = items.iter().filter(|i| stage(*i)).collect();
        match found.len() {
            0 => continue,
            1 => return Ok(found[0]),
            _ => {
                let candidates: Vec<String> = found
                    .iter()
                    .map(|i| format!("{} ({})", title_of(*i), id_of(*i)))
                    .collect();
                return Err(TaskboardError::ambiguous_ref(reference, &candidates));
            }
        }
    }
    Err(not_found(reference))
}
