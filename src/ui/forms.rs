use chrono::NaiveDate;

use crate::models::{
    CompensationType, Priority, Project, ProjectLifecycle, ProjectUpdate, Todo, TodoStatus,
    TodoUpdate,
};

pub const PROJECT_TITLE_REQUIRED: &str = "Please enter a project title";
pub const TODO_TITLE_REQUIRED: &str = "Please enter a todo title";

/// Field values of the project create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub lifecycle: ProjectLifecycle,
    pub compensation_type: CompensationType,
    pub deadline: Option<NaiveDate>,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            lifecycle: project.lifecycle,
            compensation_type: project.compensation_type,
            deadline: project.deadline,
        }
    }

    /// Returns the alert message when a required field is missing.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err(PROJECT_TITLE_REQUIRED);
        }
        Ok(())
    }

    /// A fresh project in `planning`; a different lifecycle picked on the form is
    /// applied afterwards through [`ProjectForm::lifecycle_update`].
    pub fn to_project(&self) -> Project {
        Project::new(self.title.trim())
            .with_description(self.description.trim())
            .with_deadline(self.deadline)
            .with_compensation(self.compensation_type)
    }

    pub fn lifecycle_update(&self) -> Option<ProjectUpdate> {
        (self.lifecycle != ProjectLifecycle::Planning).then(|| ProjectUpdate {
            lifecycle: Some(self.lifecycle),
            ..Default::default()
        })
    }

    pub fn to_update(&self) -> ProjectUpdate {
        ProjectUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            lifecycle: Some(self.lifecycle),
            compensation_type: Some(self.compensation_type),
            deadline: Some(self.deadline),
            ..Default::default()
        }
    }
}

/// Field values of the todo create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}

impl TodoForm {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status,
            priority: todo.priority,
            start_date: todo.start_date,
            deadline: todo.deadline,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err(TODO_TITLE_REQUIRED);
        }
        Ok(())
    }

    pub fn to_todo(&self, project_id: Option<String>) -> Todo {
        let mut todo = Todo::new(self.title.trim(), project_id)
            .with_description(self.description.trim())
            .with_priority(self.priority)
            .with_start_date(self.start_date)
            .with_deadline(self.deadline);
        match self.status {
            TodoStatus::Todo => {}
            TodoStatus::InProgress => todo.status = TodoStatus::InProgress,
            TodoStatus::Done => todo.complete(),
        }
        todo
    }

    /// Plain field overwrite. `completion_date` is left alone even when the
    /// status changes.
    pub fn to_update(&self) -> TodoUpdate {
        TodoUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            status: Some(self.status),
            priority: Some(self.priority),
            start_date: Some(self.start_date),
            deadline: Some(self.deadline),
            ..Default::default()
        }
    }
}
