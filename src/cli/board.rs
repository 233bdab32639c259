use serde_json::json;

use crate::cli::{finish, Context};
use crate::error::TaskboardError;
use crate::output;

pub fn run(ctx: &Context, expand: &[String], all: bool) -> i32 {
    finish(run_inner(ctx, expand, all), ctx.json)
}

fn run_inner(ctx: &Context, expand: &[String], all: bool) -> Result<i32, TaskboardError> {
    let mut ui = ctx.open_ui()?;
    if all {
        ui.expand_all();
    }
    for reference in expand {
        let id = ui.store().resolve_project(reference)?.id.clone();
        ui.expand(&id);
    }
    ui.render();

    if ctx.json {
        let store = ui.store();
        let projects: Vec<_> = store
            .get_all_projects()
            .iter()
            .map(|p| {
                let todos: Vec<_> = store
                    .get_todos_by_project(&p.id)
                    .into_iter()
                    .map(output::json::todo_summary)
                    .collect();
                json!({
                    "project": output::json::project_summary(
                        p,
                        todos.len(),
                        store.current_project_id() == Some(p.id.as_str()),
                    ),
                    "expanded": ui.is_expanded(&p.id),
                    "todos": todos,
                    "progress": output::json::progress_json(&store.project_progress(&p.id))
                })
            })
            .collect();
        let unassigned: Vec<_> = store
            .get_unassigned_todos()
            .into_iter()
            .map(output::json::todo_summary)
            .collect();
        output::json::print(&output::json::success(json!({
            "projects": projects,
            "unassigned": unassigned
        })));
    } else {
        print!("{}", ui.host().list_frame().unwrap_or_default());
        let unassigned = ui.store().get_unassigned_todos();
        if !unassigned.is_empty() {
            println!("\nUnassigned:");
            output::text::print_todo_list(&unassigned);
        }
    }
    Ok(0)
}
