use std::env;

use serde_json::json;

use crate::cli::{finish, Context};
use crate::db::connection;
use crate::error::TaskboardError;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, TaskboardError> {
    let root = match ctx.dir.clone() {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let path = connection::init_db(&root)?;

    // Opening creates the default project on a fresh board.
    let ui = Context {
        dir: Some(root),
        ..ctx.clone()
    }
    .open_ui()?;
    let projects = ui.store().get_all_projects().len();

    if ctx.json {
        output::json::print(&output::json::success(json!({
            "path": path.to_string_lossy(),
            "projects": projects
        })));
    } else {
        println!("Initialized taskboard at {}", path.display());
    }
    Ok(0)
}
