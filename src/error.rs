use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    ProjectNotFound,
    TodoNotFound,
    AmbiguousRef,
    InvalidLifecycleTransition,
    ValidationError,
    CorruptState,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::TodoNotFound => "TODO_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::InvalidLifecycleTransition => "INVALID_LIFECYCLE_TRANSITION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::CorruptState => "CORRUPT_STATE",
            Self::StorageError => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskboardError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskboardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "taskboard is not initialized. Run `taskboard init` first.",
        )
    }

    pub fn project_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            format!("Project not found: {reference}"),
        )
    }

    pub fn todo_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::TodoNotFound, format!("Todo not found: {reference}"))
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::InvalidLifecycleTransition,
            format!("Invalid lifecycle transition: {from} → {to}"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// The persisted snapshot could not be turned back into entities.
    pub fn corrupt_state(detail: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::CorruptState,
            format!(
                "Persisted state is corrupt ({detail}). Run `taskboard reset --yes` to discard it."
            ),
        )
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl From<rusqlite::Error> for TaskboardError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<std::io::Error> for TaskboardError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}
