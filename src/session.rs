//! Session holder
//!
//! Single owner of the authenticated identity. Every transition writes storage
//! first and memory second, so a failed write never leaves the two out of step.

use crate::error::SessionError;
use crate::storage::KeyValueStore;
use tracing::{debug, warn};
use tutor_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserProfile};

/// Snapshot of the session read by the guard and the pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    /// True until the persisted session has been checked once.
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SessionHolder<S> {
    store: S,
    state: SessionState,
    initialized: bool,
}

impl<S: KeyValueStore> SessionHolder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState {
                loading: true,
                ..SessionState::default()
            },
            initialized: false,
        }
    }

    /// Rehydrates the session from storage.
    ///
    /// Only the first call does anything; `loading` is cleared on that call
    /// whatever the outcome. A corrupted record is wiped and reported.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        let result = self.restore();
        self.state.loading = false;
        result
    }

    fn restore(&mut self) -> Result<(), SessionError> {
        let token = self.store.get(STORAGE_TOKEN_KEY);
        let raw_user = self.store.get(STORAGE_USER_KEY);

        match (token, raw_user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<UserProfile>(&raw_user) {
                Ok(user) => {
                    debug!(user_id = %user.id, "restored persisted session");
                    self.state.user = Some(user);
                    self.state.token = Some(token);
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable persisted session");
                    self.clear_storage();
                    Err(SessionError::Corrupted(e.to_string()))
                }
            },
            (None, None) => Ok(()),
            _ => {
                // half of a session is no session
                self.clear_storage();
                Ok(())
            }
        }
    }

    pub fn login(&mut self, user: UserProfile, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        let raw_user = serde_json::to_string(&user).map_err(|e| SessionError::Encode(e.to_string()))?;

        let previous = [
            (STORAGE_TOKEN_KEY, self.store.get(STORAGE_TOKEN_KEY)),
            (STORAGE_USER_KEY, self.store.get(STORAGE_USER_KEY)),
        ];
        let written = self
            .store
            .set(STORAGE_TOKEN_KEY, &token)
            .and_then(|()| self.store.set(STORAGE_USER_KEY, &raw_user));
        if let Err(e) = written {
            if !self.restore_storage(&previous) {
                // nothing consistent left to fall back to
                self.state.user = None;
                self.state.token = None;
            }
            return Err(e.into());
        }

        debug!(user_id = %user.id, "session started");
        self.state.user = Some(user);
        self.state.token = Some(token);
        self.state.loading = false;
        self.initialized = true;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.clear_storage();
        self.state.user = None;
        self.state.token = None;
        debug!("session cleared");
    }

    /// Replaces the cached user record. The token is left as is.
    pub fn update_user(&mut self, user: UserProfile) -> Result<(), SessionError> {
        if self.state.token.is_none() {
            return Err(SessionError::NotAuthenticated);
        }
        let raw_user = serde_json::to_string(&user).map_err(|e| SessionError::Encode(e.to_string()))?;
        self.store.set(STORAGE_USER_KEY, &raw_user)?;
        self.state.user = Some(user);
        Ok(())
    }

    /// Puts back the records a failed write may have replaced. When that
    /// fails too, storage is wiped and `false` is returned.
    fn restore_storage(&self, previous: &[(&str, Option<String>)]) -> bool {
        for (key, value) in previous {
            match value {
                Some(value) => {
                    if let Err(e) = self.store.set(key, value) {
                        warn!(key = %key, error = %e, "could not restore session record");
                        self.clear_storage();
                        return false;
                    }
                }
                None => self.store.remove(key),
            }
        }
        true
    }

    fn clear_storage(&self) {
        self.store.remove(STORAGE_TOKEN_KEY);
        self.store.remove(STORAGE_USER_KEY);
    }

    // --- Accessors ---

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests;
