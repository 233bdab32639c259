use chrono::NaiveDate;
use serde_json::json;

use crate::cli::commands::{CompensationArg, LifecycleArg, ProjectCommands};
use crate::cli::{finish, settle, CliUi, Context};
use crate::error::TaskboardError;
use crate::models::Project;
use crate::output;
use crate::ui::{ListEvent, Outcome, ProjectForm};

pub fn run(cmd: ProjectCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        ProjectCommands::Add {
            title,
            description,
            deadline,
            compensation,
            lifecycle,
        } => run_add(ctx, title, description, deadline, compensation, lifecycle),
        ProjectCommands::List => run_list(ctx),
        ProjectCommands::Show { reference } => run_show(ctx, &reference),
        ProjectCommands::Edit {
            reference,
            title,
            description,
            lifecycle,
            compensation,
            deadline,
            clear_deadline,
        } => {
            let deadline = if clear_deadline { Some(None) } else { deadline.map(Some) };
            run_edit(ctx, &reference, title, description, lifecycle, compensation, deadline)
        }
        ProjectCommands::Start { reference } => run_transition(ctx, &reference, "start"),
        ProjectCommands::Complete { reference } => run_transition(ctx, &reference, "complete"),
        ProjectCommands::Pause { reference } => run_transition(ctx, &reference, "pause"),
        ProjectCommands::Resume { reference } => run_transition(ctx, &reference, "resume"),
        ProjectCommands::Cancel { reference } => run_transition(ctx, &reference, "cancel"),
        ProjectCommands::Example { reference, url } => run_example(ctx, &reference, &url),
        ProjectCommands::Select { reference } => run_select(ctx, &reference),
        ProjectCommands::Delete { reference } => run_delete(ctx, &reference),
    };
    finish(result, ctx.json)
}

fn run_add(
    ctx: &Context,
    title: String,
    description: String,
    deadline: Option<NaiveDate>,
    compensation: CompensationArg,
    lifecycle: LifecycleArg,
) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    ui.show_add_project_form();
    let outcome = ui.create_project(ProjectForm {
        title,
        description,
        lifecycle: lifecycle.into(),
        compensation_type: compensation.into(),
        deadline,
    })?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }
    let Outcome::Created(id) = outcome else {
        return Ok(0);
    };
    print_project(&ui, &id, "Created project", ctx.json)
}

fn run_list(ctx: &Context) -> Result<i32, TaskboardError> {
    let ui = ctx.open_ui()?;
    let store = ui.store();
    let current = store.current_project_id();
    let projects: Vec<(&Project, usize)> = store
        .get_all_projects()
        .iter()
        .map(|p| (p, store.get_todos_by_project(&p.id).len()))
        .collect();

    if ctx.json {
        let projects_json: Vec<_> = projects
            .iter()
            .map(|(p, count)| {
                output::json::project_summary(p, *count, current == Some(p.id.as_str()))
            })
            .collect();
        output::json::print(&output::json::success(json!({
            "projects": projects_json,
            "current_project_id": current
        })));
    } else {
        output::text::print_project_list(&projects, current);
    }
    Ok(0)
}

fn run_show(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_project(reference)?.id.clone();
    ui.show_project_detail(&id);

    if ctx.json {
        let store = ui.store();
        let Some(project) = store.get_project(&id) else {
            return Err(TaskboardError::project_not_found(reference));
        };
        let todos: Vec<_> = store
            .get_todos_by_project(&id)
            .into_iter()
            .map(output::json::todo_summary)
            .collect();
        output::json::print(&output::json::success(json!({
            "project": output::json::project_json(project),
            "todos": todos,
            "progress": output::json::progress_json(&store.project_progress(&id))
        })));
    } else {
        print!("{}", ui.host().detail_frame().unwrap_or_default());
        output::text::print_progress(&ui.store().project_progress(&id));
    }
    Ok(0)
}

fn run_edit(
    ctx: &Context,
    reference: &str,
    title: Option<String>,
    description: Option<String>,
    lifecycle: Option<LifecycleArg>,
    compensation: Option<CompensationArg>,
    deadline: Option<Option<NaiveDate>>,
) -> Result<i32, TaskboardError> {
    if title.is_none()
        && description.is_none()
        && lifecycle.is_none()
        && compensation.is_none()
        && deadline.is_none()
    {
        return Err(TaskboardError::validation("Nothing to update"));
    }

    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_project(reference)?.id.clone();
    ui.show_project_detail(&id);
    let Some(mut form) = ui.project_form() else {
        return Err(TaskboardError::project_not_found(reference));
    };
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(description) = description {
        form.description = description;
    }
    if let Some(lifecycle) = lifecycle {
        form.lifecycle = lifecycle.into();
    }
    if let Some(compensation) = compensation {
        form.compensation_type = compensation.into();
    }
    if let Some(deadline) = deadline {
        form.deadline = deadline;
    }

    let outcome = ui.save_project(form)?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }
    print_project(&ui, &id, "Updated project", ctx.json)
}

fn run_transition(ctx: &Context, reference: &str, action: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_project(reference)?.id.clone();
    let store = ui.store_mut();
    let updated = match action {
        "start" => store.start_project(&id)?,
        "complete" => store.complete_project(&id)?,
        "pause" => store.pause_project(&id)?,
        "resume" => store.resume_project(&id)?,
        "cancel" => store.cancel_project(&id)?,
        _ => return Err(TaskboardError::validation(format!("Unknown action: {action}"))),
    };
    if updated.is_none() {
        return Err(TaskboardError::project_not_found(reference));
    }
    ui.render();
    print_project(&ui, &id, "Project is now", ctx.json)
}

fn run_example(ctx: &Context, reference: &str, url: &str) -> Result<i32, TaskboardError> {
    if url.trim().is_empty() {
        return Err(TaskboardError::validation("Example URL must not be empty"));
    }
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_project(reference)?.id.clone();
    if ui.store_mut().add_project_example(&id, url.trim())?.is_none() {
        return Err(TaskboardError::project_not_found(reference));
    }
    ui.render();
    print_project(&ui, &id, "Added example to", ctx.json)
}

fn run_select(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let id = ui.store().resolve_project(reference)?.id.clone();
    let project = ui.store_mut().set_current_project(&id)?;

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "current": { "id": project.id, "title": project.title }
        })));
    } else {
        println!("Selected project: {} ({})", project.title, project.id);
    }
    Ok(0)
}

fn run_delete(ctx: &Context, reference: &str) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    let (id, title) = {
        let project = ui.store().resolve_project(reference)?;
        (project.id.clone(), project.title.clone())
    };
    let todo_count = ui.store().get_todos_by_project(&id).len();

    let outcome = ui.handle_list_event(ListEvent::DeleteProject(id.clone()))?;
    if let Some(code) = settle(&outcome, ctx.json) {
        return Ok(code);
    }

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "deleted": { "id": id, "title": title, "todos_removed": todo_count },
            "current_project_id": ui.store().current_project_id()
        })));
    } else {
        println!("Deleted project: {title} ({id}) and {todo_count} todo(s)");
    }
    Ok(0)
}

fn print_project(ui: &CliUi, id: &str, verb: &str, json_output: bool) -> Result<i32, TaskboardError> {
    let Some(project) = ui.store().get_project(id) else {
        return Err(TaskboardError::project_not_found(id));
    };
    if json_output {
        output::json::print(&output::json::success(output::json::project_json(project)));
    } else {
        println!(
            "{verb}: {} ({}) [{}]",
            project.title,
            project.id,
            project.lifecycle.as_str()
        );
    }
    Ok(0)
}
