use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

use crate::error::TaskboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    #[serde(default, deserialize_with = "project_ref")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Older snapshots used the literal "default" for todos outside any project.
fn project_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|id| id != "default" && !id.is_empty()))
}

/// Fields a caller may change on an existing todo. `id` and `created_at`
/// cannot be changed.
///
/// Setting `status` does not touch `completion_date` and vice versa; use
/// [`Todo::complete`] / [`Todo::reopen`] to keep them in step.
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub project_id: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub start_date: Option<Option<NaiveDate>>,
    pub deadline: Option<Option<NaiveDate>>,
    pub completion_date: Option<Option<DateTime<Utc>>>,
}

impl Todo {
    pub fn new(title: impl Into<String>, project_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new().to_string(),
            project_id,
            sort_order: 0,
            title: title.into(),
            description: String::new(),
            status: TodoStatus::default(),
            priority: Priority::default(),
            start_date: None,
            deadline: None,
            completion_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = deadline;
        self
    }

    /// todo|in-progress → in-progress. A done todo has to be reopened first.
    pub fn start_progress(&mut self) -> Result<(), TaskboardError> {
        if self.status == TodoStatus::Done {
            tracing::warn!(todo = %self.id, "rejected start of a done todo");
            return Err(TaskboardError::invalid_transition(
                self.status.as_str(),
                TodoStatus::InProgress.as_str(),
            ));
        }
        self.status = TodoStatus::InProgress;
        self.touch();
        Ok(())
    }

    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = TodoStatus::Done;
        self.completion_date = Some(now);
        self.updated_at = now;
    }

    /// Un-check path: back to `todo` with the completion date cleared.
    pub fn reopen(&mut self) {
        self.status = TodoStatus::Todo;
        self.completion_date = None;
        self.touch();
    }

    pub fn update(&mut self, updates: TodoUpdate) -> Result<(), TaskboardError> {
        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(TaskboardError::validation("Todo title must not be empty"));
            }
        }

        if let Some(project_id) = updates.project_id {
            self.project_id = project_id;
        }
        if let Some(sort_order) = updates.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(title) = updates.title {
            self.title = title;
        }
        if let Some(description) = updates.description {
            self.description = description;
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        if let Some(start_date) = updates.start_date {
            self.start_date = start_date;
        }
        if let Some(deadline) = updates.deadline {
            self.deadline = deadline;
        }
        if let Some(completion_date) = updates.completion_date {
            self.completion_date = completion_date;
        }
        self.touch();
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == TodoStatus::Done
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(deadline) => !self.is_done() && deadline < today,
            None => false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
