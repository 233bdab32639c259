//! Presentation layer: turns store state into markup and user actions into
//! store calls.
//!
//! The only state kept here is transient view state (expanded project panels
//! and what the detail pane is showing). Every mutating action ends with a
//! full [`Ui::render`] pass; there is no incremental patching.

pub mod forms;
pub mod host;
pub mod render;

use std::collections::HashSet;

use chrono::Utc;

use crate::db::KeyValueStore;
use crate::error::TaskboardError;
use crate::store::Store;

pub use forms::{ProjectForm, TodoForm};
pub use host::ViewHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Project(String),
    Todo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Project,
    Todo { project_id: Option<String> },
}

/// What the detail pane currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Detail(EntityRef),
    Create(FormKind),
}

/// A click inside the project list, already resolved to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    ToggleProject(String),
    OpenProject(String),
    OpenTodo(String),
    SetTodoComplete { todo_id: String, checked: bool },
    AddTodo(String),
    AddProject,
    DeleteProject(String),
    DeleteTodo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran and the view was redrawn.
    Applied,
    /// A new entity was stored under this id.
    Created(String),
    /// The user declined a confirmation gate. Nothing changed.
    Declined,
    /// The target no longer exists. Nothing changed.
    Ignored,
    /// A required field was missing; the user was alerted and the store untouched.
    Rejected(String),
}

pub struct Ui<B: KeyValueStore, H: ViewHost> {
    store: Store<B>,
    host: H,
    expanded: HashSet<String>,
    view: ViewState,
}

impl<B: KeyValueStore, H: ViewHost> Ui<B, H> {
    pub fn new(store: Store<B>, host: H) -> Self {
        Self {
            store,
            host,
            expanded: HashSet::new(),
            view: ViewState::Idle,
        }
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    /// Direct store access for actions that have no list control. Call
    /// [`Ui::render`] afterwards.
    pub fn store_mut(&mut self) -> &mut Store<B> {
        &mut self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn is_expanded(&self, project_id: &str) -> bool {
        self.expanded.contains(project_id)
    }

    pub fn expand(&mut self, project_id: &str) {
        self.expanded.insert(project_id.to_string());
    }

    pub fn expand_all(&mut self) {
        let ids: Vec<String> = self
            .store
            .get_all_projects()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        self.expanded.extend(ids);
    }

    /// Redraw the whole project list from current store state.
    pub fn render(&mut self) {
        let markup = render::project_list(
            self.store.get_all_projects(),
            self.store.get_all_todos(),
            &self.expanded,
            Utc::now().date_naive(),
        );
        self.host.show_list(&markup);
    }

    pub fn handle_list_event(&mut self, event: ListEvent) -> Result<Outcome, TaskboardError> {
        tracing::debug!(?event, "list event");
        match event {
            ListEvent::ToggleProject(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
                self.render();
                Ok(Outcome::Applied)
            }
            ListEvent::OpenProject(id) => Ok(self.show_project_detail(&id)),
            ListEvent::OpenTodo(id) => Ok(self.show_todo_detail(&id)),
            ListEvent::SetTodoComplete { todo_id, checked } => {
                let changed = if checked {
                    self.store.complete_todo(&todo_id)?.is_some()
                } else {
                    self.store.reopen_todo(&todo_id)?.is_some()
                };
                if !changed {
                    return Ok(Outcome::Ignored);
                }
                self.render();
                Ok(Outcome::Applied)
            }
            ListEvent::AddTodo(project_id) => {
                if self.store.get_project(&project_id).is_none() {
                    return Ok(Outcome::Ignored);
                }
                self.show_add_todo_form(Some(project_id));
                Ok(Outcome::Applied)
            }
            ListEvent::AddProject => {
                self.show_add_project_form();
                Ok(Outcome::Applied)
            }
            ListEvent::DeleteProject(id) => self.delete_project(&id),
            ListEvent::DeleteTodo(id) => self.delete_todo(&id),
        }
    }

    // --- detail views ---

    pub fn show_project_detail(&mut self, project_id: &str) -> Outcome {
        let Some(project) = self.store.get_project(project_id) else {
            return Outcome::Ignored;
        };
        let count = self.store.get_todos_by_project(project_id).len();
        let markup = render::project_detail(project, count);
        self.host.show_detail(&markup);
        self.view = ViewState::Detail(EntityRef::Project(project_id.to_string()));
        Outcome::Applied
    }

    pub fn show_todo_detail(&mut self, todo_id: &str) -> Outcome {
        let Some(todo) = self.store.get_todo(todo_id) else {
            return Outcome::Ignored;
        };
        let project = todo
            .project_id
            .as_deref()
            .and_then(|id| self.store.get_project(id));
        let markup = render::todo_detail(todo, project);
        self.host.show_detail(&markup);
        self.view = ViewState::Detail(EntityRef::Todo(todo_id.to_string()));
        Outcome::Applied
    }

    /// The edit form of the open detail view, populated from the entity.
    pub fn project_form(&self) -> Option<ProjectForm> {
        match &self.view {
            ViewState::Detail(EntityRef::Project(id)) => {
                self.store.get_project(id).map(ProjectForm::from_project)
            }
            _ => None,
        }
    }

    pub fn todo_form(&self) -> Option<TodoForm> {
        match &self.view {
            ViewState::Detail(EntityRef::Todo(id)) => self.store.get_todo(id).map(TodoForm::from_todo),
            _ => None,
        }
    }

    pub fn save_project(&mut self, form: ProjectForm) -> Result<Outcome, TaskboardError> {
        let ViewState::Detail(EntityRef::Project(id)) = self.view.clone() else {
            return Err(TaskboardError::validation("No project is open for editing"));
        };
        if let Err(message) = form.validate() {
            return Ok(self.reject(message));
        }
        if self.store.update_project(&id, form.to_update())?.is_none() {
            self.close_detail();
            return Ok(Outcome::Ignored);
        }
        self.render();
        self.close_detail();
        Ok(Outcome::Applied)
    }

    pub fn save_todo(&mut self, form: TodoForm) -> Result<Outcome, TaskboardError> {
        let ViewState::Detail(EntityRef::Todo(id)) = self.view.clone() else {
            return Err(TaskboardError::validation("No todo is open for editing"));
        };
        if let Err(message) = form.validate() {
            return Ok(self.reject(message));
        }
        if self.store.update_todo(&id, form.to_update())?.is_none() {
            self.close_detail();
            return Ok(Outcome::Ignored);
        }
        self.render();
        self.close_detail();
        Ok(Outcome::Applied)
    }

    /// Delete button of the open todo detail view.
    pub fn delete_open_todo(&mut self) -> Result<Outcome, TaskboardError> {
        let ViewState::Detail(EntityRef::Todo(id)) = self.view.clone() else {
            return Err(TaskboardError::validation("No todo is open"));
        };
        self.delete_todo(&id)
    }

    // --- create forms ---

    pub fn show_add_project_form(&mut self) {
        self.host.show_detail(&render::new_project_form());
        self.view = ViewState::Create(FormKind::Project);
    }

    pub fn show_add_todo_form(&mut self, project_id: Option<String>) {
        let project = project_id
            .as_deref()
            .and_then(|id| self.store.get_project(id));
        self.host.show_detail(&render::new_todo_form(project));
        self.view = ViewState::Create(FormKind::Todo { project_id });
    }

    pub fn create_project(&mut self, form: ProjectForm) -> Result<Outcome, TaskboardError> {
        if self.view != ViewState::Create(FormKind::Project) {
            return Err(TaskboardError::validation("The new project form is not open"));
        }
        if let Err(message) = form.validate() {
            return Ok(self.reject(message));
        }

        let id = self.store.add_project(form.to_project())?.id.clone();
        if let Some(update) = form.lifecycle_update() {
            self.store.update_project(&id, update)?;
        }
        self.render();
        self.close_detail();
        Ok(Outcome::Created(id))
    }

    pub fn create_todo(&mut self, form: TodoForm) -> Result<Outcome, TaskboardError> {
        let ViewState::Create(FormKind::Todo { project_id }) = self.view.clone() else {
            return Err(TaskboardError::validation("The new todo form is not open"));
        };
        if let Err(message) = form.validate() {
            return Ok(self.reject(message));
        }

        let id = self
            .store
            .add_todo(form.to_todo(project_id.clone()))?
            .id
            .clone();
        if let Some(project_id) = project_id {
            self.expanded.insert(project_id);
        }
        self.render();
        self.close_detail();
        Ok(Outcome::Created(id))
    }

    /// Leave any detail or create view without saving.
    pub fn cancel(&mut self) {
        self.close_detail();
    }

    // --- deletes ---

    fn delete_project(&mut self, project_id: &str) -> Result<Outcome, TaskboardError> {
        let Some(project) = self.store.get_project(project_id) else {
            return Ok(Outcome::Ignored);
        };
        let count = self.store.get_todos_by_project(project_id).len();
        let message = if count > 0 {
            format!("Delete \"{}\" and its {} todo(s)?", project.title, count)
        } else {
            format!("Delete \"{}\"?", project.title)
        };
        if !self.host.confirm(&message) {
            return Ok(Outcome::Declined);
        }

        self.store.delete_project(project_id)?;
        self.expanded.remove(project_id);
        self.render();
        self.close_detail();
        Ok(Outcome::Applied)
    }

    fn delete_todo(&mut self, todo_id: &str) -> Result<Outcome, TaskboardError> {
        if self.store.get_todo(todo_id).is_none() {
            return Ok(Outcome::Ignored);
        }
        if !self.host.confirm("Are you sure you want to delete this todo?") {
            return Ok(Outcome::Declined);
        }

        self.store.delete_todo(todo_id)?;
        self.render();
        self.close_detail();
        Ok(Outcome::Applied)
    }

    fn reject(&mut self, message: &str) -> Outcome {
        self.host.alert(message);
        Outcome::Rejected(message.to_string())
    }

    fn close_detail(&mut self) {
        self.host.show_detail(&render::idle_detail());
        self.view = ViewState::Idle;
    }
}
