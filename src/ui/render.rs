//! Markup for the list and detail panes.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{Project, Todo, TodoStatus};

pub const NO_PROJECTS: &str = "No projects yet. Create one to get started!";
pub const NO_TODOS: &str = "NO TODOs YET.";
pub const IDLE_DETAIL: &str =
    "Select a project or todo to view and edit details, or add a new one.";

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// The full project list. Todos are listed only under expanded projects.
pub fn project_list(
    projects: &[Project],
    todos: &[Todo],
    expanded: &HashSet<String>,
    today: NaiveDate,
) -> String {
    if projects.is_empty() {
        return format!("{NO_PROJECTS}\n");
    }

    let mut out = String::new();
    for project in projects {
        let owned: Vec<&Todo> = todos
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project.id.as_str()))
            .collect();
        let is_expanded = expanded.contains(&project.id);
        let overdue = if project.is_overdue_on(today) { " !overdue" } else { "" };

        out.push_str(&format!(
            "{} {} {} ({}) [{}] {}{}\n",
            if is_expanded { "▾" } else { "▸" },
            project.color,
            project.title,
            short_id(&project.id),
            project.lifecycle.as_str(),
            owned.len(),
            overdue,
        ));

        if is_expanded {
            if owned.is_empty() {
                out.push_str(&format!("    {NO_TODOS}\n"));
            }
            for todo in owned {
                out.push_str(&todo_line(todo, today));
            }
        }
    }
    out
}

fn todo_line(todo: &Todo, today: NaiveDate) -> String {
    let check = match todo.status {
        TodoStatus::Done => "[x]",
        TodoStatus::InProgress => "[~]",
        TodoStatus::Todo => "[ ]",
    };
    let due = match todo.deadline {
        Some(d) if todo.is_overdue_on(today) => format!(" due {d} !overdue"),
        Some(d) => format!(" due {d}"),
        None => String::new(),
    };
    format!(
        "    {} {} ({}) {}{}\n",
        check,
        todo.title,
        short_id(&todo.id),
        todo.priority.as_str(),
        due
    )
}

pub fn project_detail(project: &Project, todo_count: usize) -> String {
    let mut out = format!("Project: {} ({})\n", project.title, project.id);
    out.push_str(&format!("  Lifecycle: {}\n", project.lifecycle.as_str()));
    out.push_str(&format!(
        "  Compensation: {}\n",
        project.compensation_type.as_str()
    ));
    out.push_str(&format!("  Color: {}\n", project.color));
    out.push_str(&format!("  Start date: {}\n", date_or_dash(project.start_date)));
    out.push_str(&format!("  Deadline: {}\n", date_or_dash(project.deadline)));
    if let Some(completed) = project.completion_date {
        out.push_str(&format!("  Completed: {}\n", completed.to_rfc3339()));
    }
    out.push_str(&format!("  Todos: {todo_count}\n"));
    if !project.examples.is_empty() {
        out.push_str("  Examples:\n");
        for url in &project.examples {
            out.push_str(&format!("    - {url}\n"));
        }
    }
    out.push_str(&format!("  Description: {}\n", project.description));
    out
}

pub fn todo_detail(todo: &Todo, project: Option<&Project>) -> String {
    let mut out = format!("Todo: {} ({})\n", todo.title, todo.id);
    match project {
        Some(p) => out.push_str(&format!("  Project: {} ({})\n", p.title, short_id(&p.id))),
        None => out.push_str("  Project: -\n"),
    }
    out.push_str(&format!("  Status: {}\n", todo.status.as_str()));
    out.push_str(&format!("  Priority: {}\n", todo.priority.as_str()));
    out.push_str(&format!("  Start date: {}\n", date_or_dash(todo.start_date)));
    out.push_str(&format!("  Deadline: {}\n", date_or_dash(todo.deadline)));
    if let Some(completed) = todo.completion_date {
        out.push_str(&format!("  Completed: {}\n", completed.to_rfc3339()));
    }
    out.push_str(&format!("  Description: {}\n", todo.description));
    out
}

pub fn new_project_form() -> String {
    "New project\n  Title: \n  Lifecycle: planning\n  Compensation: unpaid\n  Deadline: -\n  Description: \n"
        .to_string()
}

pub fn new_todo_form(project: Option<&Project>) -> String {
    let target = project
        .map(|p| p.title.as_str())
        .unwrap_or("(no project)");
    format!(
        "New todo in {target}\n  Title: \n  Status: todo\n  Priority: medium\n  Start date: -\n  Deadline: -\n  Description: \n"
    )
}

pub fn idle_detail() -> String {
    format!("{IDLE_DETAIL}\n")
}
