//! # portal-auth
//!
//! Session and authority resolution for the survey portal.
//!
//! Turns an identity provider's current user and token claims into a single
//! authoritative [`Session`], holds it in a process-wide [`SessionStore`], and
//! gates navigation on it ([`guard`], [`routes`]). Also ships a provider backed
//! by a stored ID token and the bearer-token user directory client used by
//! administrators.

pub mod claims;
pub mod error;
pub mod guard;
pub mod logout;
pub mod provider;
pub mod resolver;
pub mod routes;
pub mod session;
pub mod store;
pub mod token_provider;
pub mod token_store;
pub mod users;

pub use claims::{IdToken, RoleClaims};
pub use error::AuthError;
pub use guard::AccessDecision;
pub use logout::{LogoutOutcome, LogoutPolicy};
pub use provider::{IdentityProvider, ProviderSession, SignOutOptions};
pub use routes::{Navigation, Page};
pub use session::{Session, SessionSnapshot};
pub use store::SessionStore;
pub use token_provider::TokenIdentityProvider;
pub use token_store::{TokenSource, TokenStore};
pub use users::{UserDirectory, UserRecord};
