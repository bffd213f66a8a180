//! Administrator-only user directory client.
//!
//! Every call carries the caller's ID token as a bearer token. The directory
//! backend enforces admin-only access; this client just reports what it says.

use std::time::Duration;

use portal_core::Role;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

const EMAIL_ATTRIBUTE: &str = "email";
const ROLE_ATTRIBUTE: &str = "custom:role";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// One directory entry as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    /// Provider username, usually a UUID rather than the email.
    pub username: String,
    #[serde(default)]
    pub attributes: Vec<UserAttribute>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub user_status: Option<String>,
    #[serde(default)]
    pub user_create_date: Option<String>,
}

impl UserRecord {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.attribute(EMAIL_ATTRIBUTE)
    }

    /// Role stored in the custom attribute, or the default role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.attribute(ROLE_ATTRIBUTE)
            .filter(|s| !s.is_empty())
            .map_or(Role::DEFAULT, Role::from)
    }
}

#[derive(Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Option<Vec<UserRecord>>,
}

#[derive(Serialize)]
struct NewUser<'a> {
    email: &'a str,
    role: &'a str,
}

#[derive(Serialize)]
struct RoleUpdate<'a> {
    role: &'a str,
}

pub struct UserDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl UserDirectory {
    /// # Errors
    ///
    /// Returns `AuthError::Other` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, base_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::DirectoryApi` on transport failure, a non-success
    /// status, or an unreadable body.
    pub async fn list_users(&self, bearer: &str) -> Result<Vec<UserRecord>, AuthError> {
        let resp = self
            .http
            .get(format!("{}/users", self.base_url))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(transport)?;
        let resp = check_response(resp, "fetch users").await?;
        let body: UsersResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::DirectoryApi(format!("invalid users response: {e}")))?;
        Ok(body.users.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Other` for an empty email and
    /// `AuthError::DirectoryApi` when the backend rejects the request.
    pub async fn add_user(&self, bearer: &str, email: &str, role: &Role) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::Other("email is required".into()));
        }
        let resp = self
            .http
            .post(format!("{}/users", self.base_url))
            .bearer_auth(bearer)
            .json(&NewUser {
                email,
                role: role.as_str(),
            })
            .send()
            .await
            .map_err(transport)?;
        check_response(resp, "add user").await?;
        tracing::info!(email, role = role.as_str(), "user added");
        Ok(())
    }

    /// Set the role of the user with provider username `username`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DirectoryApi` when the backend rejects the request.
    pub async fn update_role(
        &self,
        bearer: &str,
        username: &str,
        role: &Role,
    ) -> Result<(), AuthError> {
        let url = format!(
            "{}/users/{}/role",
            self.base_url,
            urlencoding::encode(username)
        );
        let resp = self
            .http
            .put(url)
            .bearer_auth(bearer)
            .json(&RoleUpdate {
                role: role.as_str(),
            })
            .send()
            .await
            .map_err(transport)?;
        check_response(resp, "update user role").await?;
        tracing::info!(username, role = role.as_str(), "user role updated");
        Ok(())
    }

    /// Set a role by email: the directory is addressed by provider username,
    /// so the user is looked up first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no listed user has that email.
    pub async fn update_role_by_email(
        &self,
        bearer: &str,
        email: &str,
        role: &Role,
    ) -> Result<UserRecord, AuthError> {
        let users = self.list_users(bearer).await?;
        let user = find_by_email(users, email)?;
        self.update_role(bearer, &user.username, role).await?;
        Ok(user)
    }
}

fn find_by_email(users: Vec<UserRecord>, email: &str) -> Result<UserRecord, AuthError> {
    users
        .into_iter()
        .find(|user| user.email() == Some(email))
        .ok_or_else(|| AuthError::UserNotFound(email.to_string()))
}

#[allow(clippy::needless_pass_by_value)]
fn transport(error: reqwest::Error) -> AuthError {
    AuthError::DirectoryApi(error.to_string())
}

/// Map a non-success response to `DirectoryApi`, preferring the body's
/// `message` field over the bare status.
async fn check_response(
    resp: reqwest::Response,
    action: &str,
) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    Err(AuthError::DirectoryApi(format!("failed to {action}: {message}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "users": [
            {
                "Username": "6f1c-uuid",
                "Attributes": [
                    {"Name": "email", "Value": "ada@example.org"},
                    {"Name": "custom:role", "Value": "researcher"}
                ],
                "Enabled": true,
                "UserStatus": "CONFIRMED",
                "UserCreateDate": "2024-03-01T10:00:00Z"
            },
            {
                "Username": "92ab-uuid",
                "Attributes": [{"Name": "email", "Value": "bob@example.org"}]
            }
        ]
    }"#;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    fn fixture_users() -> Vec<UserRecord> {
        serde_json::from_str::<UsersResponse>(FIXTURE)
            .unwrap()
            .users
            .unwrap()
    }

    #[test]
    fn parses_directory_records() {
        let users = fixture_users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email(), Some("ada@example.org"));
        assert_eq!(users[0].role(), Role::Researcher);
        assert_eq!(users[0].user_status.as_deref(), Some("CONFIRMED"));
        assert_eq!(users[1].role(), Role::SurveyTaker);
        assert_eq!(users[1].enabled, None);
    }

    #[test]
    fn missing_users_field_is_empty() {
        let body: UsersResponse = serde_json::from_str("{}").unwrap();
        assert!(body.users.unwrap_or_default().is_empty());
    }

    #[test]
    fn find_by_email_returns_provider_username() {
        let user = find_by_email(fixture_users(), "bob@example.org").unwrap();
        assert_eq!(user.username, "92ab-uuid");
    }

    #[test]
    fn find_by_email_reports_unknown_user() {
        let err = find_by_email(fixture_users(), "eve@example.org").unwrap_err();
        assert_eq!(err.to_string(), "user with email eve@example.org not found");
    }

    #[tokio::test]
    async fn check_response_prefers_body_message() {
        let resp = mock_response(403, r#"{"message": "admin only"}"#);
        let err = check_response(resp, "fetch users").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "user directory error: failed to fetch users: admin only"
        );
    }

    #[tokio::test]
    async fn check_response_falls_back_to_status() {
        let resp = mock_response(500, "not json");
        let err = check_response(resp, "add user").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "user directory error: failed to add user: HTTP 500"
        );
    }

    #[tokio::test]
    async fn check_response_success_passes_through() {
        assert!(check_response(mock_response(200, "{}"), "x").await.is_ok());
    }

    #[tokio::test]
    async fn add_user_requires_email() {
        let directory = UserDirectory::with_client(reqwest::Client::new(), "http://localhost:1/");
        let err = directory
            .add_user("token", "  ", &Role::SurveyTaker)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email is required");
        assert_eq!(directory.base_url, "http://localhost:1");
    }
}
