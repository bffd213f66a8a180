use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};

use crate::error::AuthError;
use crate::provider::{IdentityProvider, SignOutOptions};
use crate::resolver;
use crate::session::{Session, SessionSnapshot};

/// Process-wide holder of the current [`Session`].
///
/// Create one per process, share it by reference or `Arc`, and inject it into
/// every consumer. State changes are published through a `watch` channel;
/// [`SessionStore::subscribe`] hands out receivers.
///
/// Refreshes are coalesced: a caller that arrives while another refresh is in
/// flight waits for it and returns its result instead of issuing a second
/// identity lookup.
pub struct SessionStore<P> {
    provider: Arc<P>,
    state: watch::Sender<SessionSnapshot>,
    refresh_lock: Mutex<()>,
    completed: AtomicU64,
}

impl<P: IdentityProvider> SessionStore<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initial());
        Self {
            provider,
            state,
            refresh_lock: Mutex::new(()),
            completed: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Current state (cloned).
    #[must_use]
    pub fn current(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Look up the current identity, derive its role, and replace the stored
    /// session.
    ///
    /// A failed identity or session lookup leaves the store anonymous; it is
    /// never reported as an error. Dropping the future mid-lookup keeps the
    /// previous session and clears the loading flag.
    pub async fn refresh(&self) -> Session {
        let observed = self.completed.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;
        if self.completed.load(Ordering::Acquire) != observed {
            tracing::debug!("joined in-flight session refresh");
            return self.state.borrow().session.clone();
        }

        self.state.send_if_modified(|snapshot| {
            let changed = !snapshot.is_loading;
            snapshot.is_loading = true;
            changed
        });
        let mut loading = LoadingGuard {
            state: &self.state,
            armed: true,
        };

        let session = self.lookup().await;
        loading.armed = false;
        self.state.send_if_modified(|snapshot| {
            let next = SessionSnapshot::settled(session.clone());
            if *snapshot == next {
                return false;
            }
            *snapshot = next;
            true
        });
        self.completed.fetch_add(1, Ordering::Release);

        tracing::debug!(
            authenticated = session.is_authenticated(),
            role = session.role().map(portal_core::Role::as_str),
            "session refreshed"
        );
        session
    }

    /// Globally sign out with the provider, then reset to anonymous.
    ///
    /// The local session is reset even when the provider call fails; the
    /// failure is returned so the caller can surface it.
    ///
    /// # Errors
    ///
    /// Returns the provider's sign-out error.
    pub async fn clear(&self) -> Result<(), AuthError> {
        let _guard = self.refresh_lock.lock().await;
        let result = self.provider.sign_out(SignOutOptions { global: true }).await;
        if let Err(error) = &result {
            tracing::warn!(%error, "provider sign-out failed; clearing local session anyway");
        }

        self.state
            .send_modify(|snapshot| *snapshot = SessionSnapshot::settled(Session::Anonymous));
        self.completed.fetch_add(1, Ordering::Release);
        result
    }

    async fn lookup(&self) -> Session {
        let identity = match self.provider.current_identity().await {
            Ok(identity) => identity,
            Err(error) => {
                tracing::debug!(%error, "no current identity; treating as signed out");
                return Session::Anonymous;
            }
        };

        let provider_session = match self.provider.session().await {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(%error, "session lookup failed; treating as signed out");
                return Session::Anonymous;
            }
        };

        Session::Authenticated {
            identity,
            role: resolver::resolve_session(&provider_session),
        }
    }
}

/// Settles the loading flag if a refresh is dropped mid-lookup, keeping the
/// previous session.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!("session refresh cancelled");
        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.is_loading;
            snapshot.is_loading = false;
            changed
        });
    }
}
