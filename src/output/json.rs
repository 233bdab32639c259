use serde_json::{json, Value};

use crate::error::{ErrorCode, TaskboardError};
use crate::models::{Project, Todo};
use crate::store::ProjectProgress;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskboardError) -> Value {
    error_parts(err.code, &err.message)
}

pub fn error_parts(code: ErrorCode, message: &str) -> Value {
    json!({
        "success": false,
        "error": {
            "code": code.as_str(),
            "message": message
        }
    })
}

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: failed to encode output: {e}"),
    }
}

pub fn progress_json(p: &ProjectProgress) -> Value {
    json!({
        "total": p.total,
        "todo": p.todo,
        "in_progress": p.in_progress,
        "done": p.done,
        "overdue": p.overdue,
        "percentage": (p.percentage * 10.0).round() / 10.0
    })
}

pub fn project_json(p: &Project) -> Value {
    json!({
        "id": p.id,
        "title": p.title,
        "description": p.description,
        "color": p.color,
        "lifecycle": p.lifecycle.as_str(),
        "compensation_type": p.compensation_type.as_str(),
        "start_date": p.start_date,
        "deadline": p.deadline,
        "completion_date": p.completion_date,
        "examples": p.examples,
        "overdue": p.is_overdue(),
        "created_at": p.created_at,
        "updated_at": p.updated_at
    })
}

pub fn project_summary(p: &Project, todo_count: usize, current: bool) -> Value {
    json!({
        "id": p.id,
        "title": p.title,
        "lifecycle": p.lifecycle.as_str(),
        "todos": todo_count,
        "current": current
    })
}

pub fn todo_json(t: &Todo) -> Value {
    json!({
        "id": t.id,
        "project_id": t.project_id,
        "title": t.title,
        "description": t.description,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "start_date": t.start_date,
        "deadline": t.deadline,
        "completion_date": t.completion_date,
        "overdue": t.is_overdue(),
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn todo_summary(t: &Todo) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "overdue": t.is_overdue()
    })
}
