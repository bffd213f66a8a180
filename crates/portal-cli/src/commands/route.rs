use portal_auth::{Navigation, routes};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RouteArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct RouteResponse<'a> {
    path: &'a str,
    role: Option<String>,
    navigation: Navigation,
}

pub async fn handle(args: &RouteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.store.refresh().await;
    let snapshot = ctx.store.current();
    output(
        &RouteResponse {
            path: &args.path,
            role: snapshot.session.role().map(ToString::to_string),
            navigation: routes::navigate(&snapshot, &args.path),
        },
        flags.format,
    )
}
