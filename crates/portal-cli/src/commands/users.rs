use anyhow::Context;
use portal_auth::{Navigation, Page, UserDirectory, UserRecord, routes};
use portal_core::Role;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UsersCommands;
use crate::context::AppContext;
use crate::output::output;

const MANAGE_ROLES_PATH: &str = "/admin/manage-roles";

#[derive(Serialize)]
struct UserRow {
    username: String,
    email: Option<String>,
    role: String,
    status: Option<String>,
    enabled: Option<bool>,
    created: Option<String>,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email().map(str::to_string),
            role: user.role().to_string(),
            status: user.user_status.clone(),
            enabled: user.enabled,
            created: user.user_create_date.clone(),
        }
    }
}

#[derive(Serialize)]
struct UserAddResponse {
    added: String,
    role: String,
}

#[derive(Serialize)]
struct UserRoleResponse {
    updated: String,
    username: String,
    role: String,
}

/// Handle `portal users <subcommand>`.
pub async fn handle(action: &UsersCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.store.refresh().await;
    match routes::navigate(&ctx.store.current(), MANAGE_ROLES_PATH) {
        Navigation::Render(Page::ManageRoles) => {}
        Navigation::Redirect(target) => {
            anyhow::bail!("users: admin access required (redirected to {target})")
        }
        other => anyhow::bail!("users: cannot open user management ({other:?})"),
    }

    let admin = ctx.config.require_admin()?;
    let directory = UserDirectory::new(
        admin.api_base_url.clone(),
        &ctx.config.general.user_agent,
        ctx.config.general.request_timeout(),
    )?;
    let token = ctx
        .store
        .provider()
        .id_token()
        .context("users: no usable ID token")?;
    let bearer = token.as_str();

    match action {
        UsersCommands::List => {
            let users = directory.list_users(bearer).await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output(&rows, flags.format)
        }
        UsersCommands::Add(args) => {
            let role = Role::from(args.role);
            directory
                .add_user(bearer, &args.email, &role)
                .await
                .with_context(|| format!("failed to add user {}", args.email))?;
            output(
                &UserAddResponse {
                    added: args.email.clone(),
                    role: role.to_string(),
                },
                flags.format,
            )
        }
        UsersCommands::SetRole(args) => {
            let role = Role::from(args.role);
            let user = directory
                .update_role_by_email(bearer, &args.email, &role)
                .await
                .with_context(|| format!("failed to update role for {}", args.email))?;
            output(
                &UserRoleResponse {
                    updated: args.email.clone(),
                    username: user.username,
                    role: role.to_string(),
                },
                flags.format,
            )
        }
    }
}
