use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated — run `portal auth login`")]
    NotAuthenticated,

    #[error("token expired — run `portal auth login` with a fresh token")]
    TokenExpired,

    #[error("token decode failed: {0}")]
    TokenDecode(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("sign-out failed: {0}")]
    SignOutFailed(String),

    #[error("user directory error: {0}")]
    DirectoryApi(String),

    #[error("user with email {0} not found")]
    UserNotFound(String),

    #[error("{0}")]
    Other(String),
}
