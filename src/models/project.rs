use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::TaskboardError;

/// Display colors a new project can be tagged with.
pub const PROJECT_COLORS: [&str; 6] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompensationType {
    Paid,
    #[default]
    Unpaid,
    Volunteer,
}

impl CompensationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::Volunteer => "volunteer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectLifecycle {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl ProjectLifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::OnHold => "onHold",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self → to` is allowed. Staying in the same state is always allowed,
    /// and any state may be put on hold.
    pub fn can_transition_to(&self, to: ProjectLifecycle) -> bool {
        use ProjectLifecycle::*;

        if *self == to || to == OnHold {
            return true;
        }
        match to {
            InProgress => matches!(self, Planning | OnHold),
            Completed => matches!(self, Planning | InProgress | OnHold),
            Planning => matches!(self, OnHold),
            Cancelled => !self.is_terminal(),
            OnHold => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub color: String,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub compensation_type: CompensationType,
    #[serde(default)]
    pub lifecycle: ProjectLifecycle,
    #[serde(default)]
    pub examples: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may change on an existing project. `id` and `created_at`
/// cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub deadline: Option<Option<NaiveDate>>,
    pub compensation_type: Option<CompensationType>,
    pub lifecycle: Option<ProjectLifecycle>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        let ulid = Ulid::new();
        let now = Utc::now();
        Self {
            id: ulid.to_string(),
            title: title.into(),
            description: String::new(),
            color: PROJECT_COLORS[(ulid.random() % PROJECT_COLORS.len() as u128) as usize]
                .to_string(),
            start_date: None,
            deadline: None,
            completion_date: None,
            compensation_type: CompensationType::default(),
            lifecycle: ProjectLifecycle::default(),
            examples: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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

    pub fn with_compensation(mut self, compensation_type: CompensationType) -> Self {
        self.compensation_type = compensation_type;
        self
    }

    /// planning|onHold → inProgress. Sets `start_date` to today when unset.
    pub fn start(&mut self) -> Result<(), TaskboardError> {
        self.transition_to(ProjectLifecycle::InProgress)
    }

    /// → completed. Stamps `completion_date` on entry; it is never cleared afterwards.
    pub fn complete(&mut self) -> Result<(), TaskboardError> {
        self.transition_to(ProjectLifecycle::Completed)
    }

    /// Any state → onHold.
    pub fn pause(&mut self) {
        self.lifecycle = ProjectLifecycle::OnHold;
        self.touch();
    }

    pub fn resume(&mut self) -> Result<(), TaskboardError> {
        if self.lifecycle != ProjectLifecycle::OnHold {
            return Err(TaskboardError::invalid_transition(
                self.lifecycle.as_str(),
                ProjectLifecycle::InProgress.as_str(),
            ));
        }
        self.transition_to(ProjectLifecycle::InProgress)
    }

    pub fn cancel(&mut self) -> Result<(), TaskboardError> {
        self.transition_to(ProjectLifecycle::Cancelled)
    }

    pub fn add_example(&mut self, url: impl Into<String>) {
        self.examples.push(url.into());
        self.touch();
    }

    /// Applies the provided fields. Lifecycle changes go through the transition
    /// table; nothing is written when any field is rejected.
    pub fn update(&mut self, updates: ProjectUpdate) -> Result<(), TaskboardError> {
        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(TaskboardError::validation("Project title must not be empty"));
            }
        }
        if let Some(to) = updates.lifecycle {
            if !self.lifecycle.can_transition_to(to) {
                return Err(TaskboardError::invalid_transition(
                    self.lifecycle.as_str(),
                    to.as_str(),
                ));
            }
        }

        if let Some(title) = updates.title {
            self.title = title;
        }
        if let Some(description) = updates.description {
            self.description = description;
        }
        if let Some(color) = updates.color {
            self.color = color;
        }
        if let Some(start_date) = updates.start_date {
            self.start_date = start_date;
        }
        if let Some(deadline) = updates.deadline {
            self.deadline = deadline;
        }
        if let Some(compensation_type) = updates.compensation_type {
            self.compensation_type = compensation_type;
        }
        match updates.lifecycle {
            Some(to) => self.transition_to(to),
            None => {
                self.touch();
                Ok(())
            }
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(deadline) => self.lifecycle != ProjectLifecycle::Completed && deadline < today,
            None => false,
        }
    }

    fn transition_to(&mut self, to: ProjectLifecycle) -> Result<(), TaskboardError> {
        if !self.lifecycle.can_transition_to(to) {
            tracing::warn!(
                project = %self.id,
                from = self.lifecycle.as_str(),
                to = to.as_str(),
                "rejected lifecycle transition"
            );
            return Err(TaskboardError::invalid_transition(
                self.lifecycle.as_str(),
                to.as_str(),
            ));
        }
        let now = Utc::now();
        match to {
            ProjectLifecycle::InProgress if self.start_date.is_none() => {
                self.start_date = Some(now.date_naive());
            }
            ProjectLifecycle::Completed if self.lifecycle != ProjectLifecycle::Completed => {
                self.completion_date = Some(now);
            }
            _ => {}
        }
        self.lifecycle = to;
        self.updated_at = now;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
