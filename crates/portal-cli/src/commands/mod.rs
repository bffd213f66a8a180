pub mod auth;
pub mod route;
pub mod survey;
pub mod users;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, ctx, flags).await,
        Commands::Route(args) => route::handle(&args, ctx, flags).await,
        Commands::Survey => survey::handle(ctx, flags).await,
        Commands::Users { action } => users::handle(&action, ctx, flags).await,
    }
}
