use crate::models::{Project, Todo};
use crate::store::ProjectProgress;
use crate::ui::render::short_id;

pub fn print_project_list(projects: &[(&Project, usize)], current_id: Option<&str>) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    for (p, todo_count) in projects {
        let marker = if Some(p.id.as_str()) == current_id { " *" } else { "" };
        println!(
            "  {} ({}) [{}] {} todo(s){}",
            p.title,
            short_id(&p.id),
            p.lifecycle.as_str(),
            todo_count,
            marker
        );
    }
}

pub fn print_todo_list(todos: &[&Todo]) {
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }
    for t in todos {
        let due = t
            .deadline
            .map(|d| format!(" due {d}"))
            .unwrap_or_default();
        println!(
            "  [{}] {} ({}) {}{}{}",
            t.status.as_str(),
            t.title,
            short_id(&t.id),
            t.priority.as_str(),
            due,
            if t.is_overdue() { " !overdue" } else { "" }
        );
    }
}

pub fn print_progress(p: &ProjectProgress) {
    println!("Progress: {:.1}% ({}/{})", p.percentage, p.done, p.total);
    println!(
        "  todo={} in_progress={} done={} overdue={}",
        p.todo, p.in_progress, p.done, p.overdue
    );
}
