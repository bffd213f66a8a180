use anyhow::Context;
use portal_auth::{IdToken, guard};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: String,
    username: String,
    email: Option<String>,
    role: String,
    home: &'static str,
    expires_at: Option<String>,
}

pub async fn handle(args: &AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token = IdToken::decode(&args.token).context("auth login: token is not a valid JWT")?;
    if token.is_expired_at(chrono::Utc::now()) {
        anyhow::bail!("auth login: token has already expired");
    }
    ctx.tokens()
        .store(token.as_str())
        .context("auth login: failed to store token")?;

    let session = ctx.store.refresh().await;
    let (Some(identity), Some(role)) = (session.identity(), session.role()) else {
        anyhow::bail!("auth login: stored token does not identify a user (missing 'sub' claim?)");
    };

    output(
        &AuthLoginResponse {
            authenticated: true,
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: role.to_string(),
            home: guard::home_path(role),
            expires_at: token.expires_at().map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
