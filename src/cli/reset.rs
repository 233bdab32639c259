use serde_json::json;

use crate::cli::{finish, CliHost, Context};
use crate::db::{connection, SqliteKv};
use crate::error::TaskboardError;
use crate::output;
use crate::store::Store;
use crate::ui::ViewHost;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, TaskboardError> {
    let data_dir = ctx.data_dir()?;
    let conn = connection::open_db(&data_dir)?;

    let mut host = CliHost::new(ctx.json, ctx.yes);
    if !host.confirm("Erase every project and todo?") {
        if ctx.json {
            output::json::print(&output::json::success(json!({ "cancelled": true })));
        } else {
            println!("Cancelled.");
        }
        return Ok(0);
    }

    // Skip loading so a corrupt snapshot can still be erased.
    let mut store = Store::blank(SqliteKv::new(conn));
    store.clear_all()?;

    if ctx.json {
        output::json::print(&output::json::success(json!({ "reset": true })));
    } else {
        println!("Board reset.");
    }
    Ok(0)
}
