use chrono::NaiveDate;
use serde_json::json;

use crate::cli::commands::{PriorityArg, StatusArg, TodoCommands};
use crate::cli::{finish, settle, CliUi, Context};
use crate::error::TaskboardError;
use crate::models::{Priority, Todo, TodoStatus};
use crate::output;
use crate::ui::{ListEvent, Outcome, TodoForm};

pub fn run(cmd: TodoCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        TodoCommands::Add {
            title,
            project,
            unassigned,
            description,
            priority,
            start_date,
            deadline,
        } => {
            let form = TodoForm {
                title,
                description,
                priority: priority.into(),
                start_date,
                deadline,
                ..Default::default()
            };
            run_add(ctx, form, project.as_deref(), unassigned)
        }
        TodoCommands::List {
            project,
            status,
            priority,
            overdue,
        } => run_list(ctx, project.as_deref(), status, priority, overdue),
        TodoCommands::Show { reference } => run_show(ctx, &reference),
        TodoCommands::Edit {
            reference,
            title,
            description,
            status,
            priority,
            start_date,
            clear_start_date,
            deadline,
            clear_deadline,
        } => run_edit(
            ctx,
            &reference,
            EditArgs {
                title,
                description,
                status,
                priority,
                start_date: if clear_start_date {
                    Some(None)
                } else {
                    start_date.map(Some)
                },
                deadline: if clear_deadline {
                    Some(None)
                } else {
                    deadline.map(Some)
                },
            },
        ),
        TodoCommands::Start { reference } => run_start(ctx, &reference),
        TodoCommands::Done { reference } => run_check(ctx, &reference, true),
        TodoCommands::Undo { reference } => run_check(ctx, &reference, false),
        TodoCommands::Delete { reference } => run_delete(ctx, &reference),
    };
    finish(result, ctx.json)
}

fn run_add(
    ctx: &Context,
    form: TodoForm,
    project_ref: Option<&str>,
    unassigned: bool,
) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let project_id = match project_ref {
        Some(reference) => Some(ui.store().resolve_project(reference)?.id.clone()),
        None if unassigned => None,
        None => ui.store().current_project_id().map(str::to_string),
    };

    ui.show_add_todo_form(project_id);
    let outcome = ui.create_todo(form)?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }
    let Outcome::Created(id) = outcome else {
        return Ok(0);
    };
    print_todo(&ui, &id, "Added todo", ctx.json)
}

fn run_list(
    ctx: &Context,
    project_ref: Option<&str>,
    status: Option<StatusArg>,
    priority: Option<PriorityArg>,
    overdue: bool,
) -> Result<i32, TaskboardError> {
    let ui = ctx.open_ui()?;
    let store = ui.store();
    let status: Option<TodoStatus> = status.map(Into::into);
    let priority: Option<Priority> = priority.map(Into::into);

    let mut todos: Vec<&Todo> = match (project_ref, status, priority) {
        (Some(reference), _, _) => {
            let id = &store.resolve_project(reference)?.id;
            store.get_todos_by_project(id)
        }
        (None, Some(status), _) => store.get_todos_by_status(status),
        (None, None, Some(priority)) => store.get_todos_by_priority(priority),
        (None, None, None) if overdue => store.get_overdue_todos(),
        (None, None, None) => store.get_all_todos().iter().collect(),
    };
    if let Some(status) = status {
        todos.retain(|t| t.status == status);
    }
    if let Some(priority) = priority {
        todos.retain(|t| t.priority == priority);
    }
    if overdue {
        todos.retain(|t| t.is_overdue());
    }

    if ctx.json {
        let todos_json: Vec<_> = todos.iter().map(|t| output::json::todo_summary(t)).collect();
        output::json::print(&output::json::success(json!({ "todos": todos_json })));
    } else {
        output::text::print_todo_list(&todos);
    }
    Ok(0)
}

fn run_show(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_todo(reference)?.id.clone();
    ui.show_todo_detail(&id);

    if ctx.json {
        let Some(todo) = ui.store().get_todo(&id) else {
            return Err(TaskboardError::todo_not_found(reference));
        };
        output::json::print(&output::json::success(json!({
            "todo": output::json::todo_json(todo)
        })));
    } else {
        print!("{}", ui.host().detail_frame().unwrap_or_default());
    }
    Ok(0)
}

struct EditArgs {
    title: Option<String>,
    description: Option<String>,
    status: Option<StatusArg>,
    priority: Option<PriorityArg>,
    start_date: Option<Option<NaiveDate>>,
    deadline: Option<Option<NaiveDate>>,
}

fn run_edit(ctx: &Context, reference: &str, args: EditArgs) -> Result<i32, TaskboardError> {
    if args.title.is_none()
        && args.description.is_none()
        && args.status.is_none()
        && args.priority.is_none()
        && args.start_date.is_none()
        && args.deadline.is_none()
    {
        return Err(TaskboardError::validation("Nothing to update"));
    }

    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_todo(reference)?.id.clone();
    ui.show_todo_detail(&id);
    let Some(mut form) = ui.todo_form() else {
        return Err(TaskboardError::todo_not_found(reference));
    };
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(status) = args.status {
        form.status = status.into();
    }
    if let Some(priority) = args.priority {
        form.priority = priority.into();
    }
    if let Some(start_date) = args.start_date {
        form.start_date = start_date;
    }
    if let Some(deadline) = args.deadline {
        form.deadline = deadline;
    }

    let outcome = ui.save_todo(form)?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }
    print_todo(&ui, &id, "Updated todo", ctx.json)
}

fn run_start(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_todo(reference)?.id.clone();
    if ui.store_mut().start_todo(&id)?.is_none() {
        return Err(TaskboardError::todo_not_found(reference));
    }
    ui.render();
    print_todo(&ui, &id, "Started todo", ctx.json)
}

fn run_check(ctx: &Context, reference: &str, checked: bool) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_todo(reference)?.id.clone();
    let outcome = ui.handle_list_event(ListEvent::SetTodoComplete {
        todo_id: id.clone(),
        checked,
    })?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }
    let verb = if checked { "Completed todo" } else { "Reopened todo" };
    print_todo(&ui, &id, verb, ctx.json)
}

fn run_delete(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let (id, title) = {
        let todo = ui.store().resolve_todo(reference)?;
        (todo.id.clone(), todo.title.clone())
    };

    ui.show_todo_detail(&id);
    let outcome = ui.delete_open_todo()?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "deleted": { "id": id, "title": title }
        })));
    } else {
        println!("Deleted todo: {title} ({id})");
    }
    Ok(0)
}

fn print_todo(ui: &CliUi, id: &str, verb: &str, json_output: bool) -> Result<i32, TaskboardError> {
    let Some(todo) = ui.store().get_todo(id) else {
        return Err(TaskboardError::todo_not_found(id));
    };
    if json_output {
        output::json::print(&output::json::success(output::json::todo_json(todo)));
    } else {
        println!("{verb}: {} ({}) [{}]", todo.title, todo.id, todo.status.as_str());
    }
    Ok(0)
}
