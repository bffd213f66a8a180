use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::AuthError;

pub const DEFAULT_KEYRING_SERVICE: &str = "survey-portal";
pub const TOKEN_ENV_VAR: &str = "PORTAL_AUTH__TOKEN";
const KEYRING_USER: &str = "id-token";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Where a loaded token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// Persistent home of the signed-in user's ID token.
///
/// Lookup order is keyring, then the `PORTAL_AUTH__TOKEN` env var, then the
/// credentials file (`~/.portal/credentials`). Stores go to the keyring and
/// fall back to the file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    service: String,
    use_keyring: bool,
    env_var: Option<String>,
    credentials_path: Option<PathBuf>,
}

impl TokenStore {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            use_keyring: true,
            env_var: Some(TOKEN_ENV_VAR.to_string()),
            credentials_path: None,
        }
    }

    /// A store that only touches the given file. Used by tests and by
    /// environments without a usable keychain.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            service: DEFAULT_KEYRING_SERVICE.to_string(),
            use_keyring: false,
            env_var: None,
            credentials_path: Some(path.into()),
        }
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Save a token. Falls back to the credentials file if the keyring is
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if both keyring and file storage fail.
    pub fn store(&self, token: &str) -> Result<(), AuthError> {
        if !self.use_keyring {
            return self.store_file(token);
        }
        match keyring::Entry::new(&self.service, KEYRING_USER) {
            Ok(entry) => match entry.set_password(token) {
                Ok(()) => Ok(()),
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                    self.store_file(token)
                }
            },
            Err(error) => {
                tracing::warn!(%error, "keyring unavailable; falling back to file");
                self.store_file(token)
            }
        }
    }

    #[must_use]
    pub fn load(&self) -> Option<String> {
        self.load_with_source().map(|(token, _)| token)
    }

    /// Which tier the current token comes from, for status display.
    #[must_use]
    pub fn detect_source(&self) -> Option<TokenSource> {
        self.load_with_source().map(|(_, source)| source)
    }

    fn load_with_source(&self) -> Option<(String, TokenSource)> {
        if self.use_keyring
            && let Ok(entry) = keyring::Entry::new(&self.service, KEYRING_USER)
            && let Ok(token) = entry.get_password()
            && !token.is_empty()
        {
            return Some((token, TokenSource::Keyring));
        }

        if let Some(var) = &self.env_var
            && let Ok(token) = std::env::var(var)
            && !token.is_empty()
        {
            return Some((token, TokenSource::Env));
        }

        self.load_file().map(|token| (token, TokenSource::File))
    }

    /// Remove the token from the keyring and the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if self.use_keyring
            && let Ok(entry) = keyring::Entry::new(&self.service, KEYRING_USER)
        {
            // May not exist.
            let _ = entry.delete_credential();
        }

        let path = self.credentials_path()?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    /// Path of the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStoreError` when no home directory is known.
    pub fn credentials_path(&self) -> Result<PathBuf, AuthError> {
        if let Some(path) = &self.credentials_path {
            return Ok(path.clone());
        }
        dirs::home_dir()
            .map(|h| h.join(".portal").join(CREDENTIALS_FILE_NAME))
            .ok_or_else(|| {
                AuthError::TokenStoreError(
                    "home directory not found; cannot store credentials".into(),
                )
            })
    }

    fn store_file(&self, token: &str) -> Result<(), AuthError> {
        let path = self.credentials_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(&path, token)
            .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::TokenStoreError(format!("chmod {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        let path = self.credentials_path().ok()?;
        fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEYRING_SERVICE)
    }
}
