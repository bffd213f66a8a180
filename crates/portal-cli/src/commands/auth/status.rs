use portal_auth::{AuthError, Session, guard};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    user: Option<String>,
    user_id: Option<String>,
    role: Option<String>,
    home: Option<&'static str>,
    expires_at: Option<String>,
    token_source: Option<&'static str>,
    note: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.store.refresh().await;
    let token = ctx.store.provider().id_token();

    let status = match &session {
        Session::Authenticated { identity, role } => AuthStatusResponse {
            authenticated: true,
            user: Some(identity.display_name().to_string()),
            user_id: Some(identity.user_id.clone()),
            role: Some(role.to_string()),
            home: Some(guard::home_path(role)),
            expires_at: token
                .ok()
                .and_then(|t| t.expires_at())
                .map(|at| at.to_rfc3339()),
            token_source: ctx.tokens().detect_source().map(|s| s.as_str()),
            note: (!role.is_recognized())
                .then(|| format!("unrecognized role '{role}'; access is limited to the survey area")),
        },
        Session::Anonymous => AuthStatusResponse {
            authenticated: false,
            user: None,
            user_id: None,
            role: None,
            home: None,
            expires_at: None,
            token_source: None,
            note: Some(match token {
                Err(AuthError::NotAuthenticated) => "no stored token found".to_string(),
                Err(error) => error.to_string(),
                Ok(_) => "token does not identify a user".to_string(),
            }),
        },
    };

    output(&status, flags.format)
}
