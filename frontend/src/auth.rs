//! Reactive session context
//!
//! Wraps the core `SessionHolder` in a signal and hands it to every component
//! through context. The holder stays the single writer; components only call
//! the methods below.

use crate::api::auth_backend;
use crate::web::BrowserStorage;
use crate::web::router::{clear_fragment, current_fragment};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, info, warn};
use tutor::auth_backend::{CallbackKind, parse_oauth_callback};
use tutor_shared::UserProfile;
use tutor::{ClientConfig, SessionError, SessionHolder};

use crate::web::route::GuardState;

#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<SessionHolder<BrowserStorage>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(SessionHolder::new(BrowserStorage)),
        }
    }

    pub fn user(&self) -> Signal<Option<UserProfile>> {
        let session = self.session;
        Signal::derive(move || session.with(|h| h.user().cloned()))
    }

    pub fn guard_state(&self) -> Signal<GuardState> {
        let session = self.session;
        Signal::derive(move || session.with(|h| GuardState::from_session(h.state())))
    }

    pub fn is_authenticated(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|h| h.is_authenticated()))
    }

    pub fn token_untracked(&self) -> Option<String> {
        self.session.with_untracked(|h| h.token().map(str::to_string))
    }

    pub fn user_untracked(&self) -> Option<UserProfile> {
        self.session.with_untracked(|h| h.user().cloned())
    }

    pub fn login(&self, user: UserProfile, token: String) -> Result<(), SessionError> {
        self.session
            .try_update(|h| h.login(user, token))
            .unwrap_or(Err(SessionError::Disposed))
    }

    pub fn logout(&self) {
        self.session.update(|h| h.logout());
    }

    pub fn update_user(&self, user: UserProfile) -> Result<(), SessionError> {
        self.session
            .try_update(|h| h.update_user(user))
            .unwrap_or(Err(SessionError::Disposed))
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Rehydrates the persisted session, then finishes an OAuth redirect if the
/// address bar carries one.
pub fn init_auth(ctx: &AuthContext, config: &ClientConfig) {
    ctx.session.update(|h| {
        if let Err(e) = h.initialize() {
            warn!(error = %e, "persisted session discarded");
        }
    });

    let callback = match parse_oauth_callback(&current_fragment()) {
        Ok(Some(cb)) => cb,
        Ok(None) => return,
        Err(e) => {
            error!(error = %e, "sign-in redirect carried an error");
            clear_fragment();
            return;
        }
    };

    // the reset page consumes recovery tokens itself
    if callback.kind == CallbackKind::Recovery || !config.auth_enabled() {
        return;
    }
    clear_fragment();

    let ctx = *ctx;
    let backend = auth_backend(config);
    spawn_local(async move {
        match backend.current_user(&callback.access_token).await {
            Ok(user) => {
                info!(user_id = %user.id, "signed in from provider redirect");
                if let Err(e) = ctx.login(user, callback.access_token) {
                    error!(error = %e, "could not persist session");
                }
            }
            Err(e) => error!(error = %e, "could not load user for provider token"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposed_context_reports_writes_as_failed() {
        let ctx = AuthContext::new();
        ctx.session.dispose();

        let ada = UserProfile::new("u-1", "ada@example.com");
        assert_eq!(ctx.login(ada.clone(), "tok".to_string()), Err(SessionError::Disposed));
        assert_eq!(ctx.update_user(ada), Err(SessionError::Disposed));
    }
}
