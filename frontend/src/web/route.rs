//! Route table and guard rules
//!
//! Pure logic, no DOM access: which path maps to which page, which pages
//! need a session, and what the guard decides for a given session state.

use std::fmt::Display;
use tutor::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    About,
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    Profile,
    Settings,
    Notifications,
    Reminders,
    Resources,
    NotFound,
}

impl AppRoute {
    pub const PROTECTED: [AppRoute; 5] = [
        AppRoute::Profile,
        AppRoute::Settings,
        AppRoute::Notifications,
        AppRoute::Reminders,
        AppRoute::Resources,
    ];

    /// Parses a location path. Query string and fragment are ignored, as is a
    /// trailing slash.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Self::Home,
            "/about" => Self::About,
            "/signin" => Self::SignIn,
            "/signup" => Self::SignUp,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            "/profile" => Self::Profile,
            "/settings" => Self::Settings,
            "/notifications" => Self::Notifications,
            "/reminders" => Self::Reminders,
            "/resources" => Self::Resources,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Profile => "/profile",
            Self::Settings => "/settings",
            Self::Notifications => "/notifications",
            Self::Reminders => "/reminders",
            Self::Resources => "/resources",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::ForgotPassword => "Forgot Password",
            Self::ResetPassword => "Reset Password",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
            Self::Notifications => "Notifications",
            Self::Reminders => "Reminders",
            Self::Resources => "Resources",
            Self::NotFound => "Not Found",
        }
    }

    /// Whether this page needs a signed-in user.
    pub fn requires_auth(&self) -> bool {
        Self::PROTECTED.contains(self)
    }

    /// Pages a signed-in user is sent away from.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp)
    }

    /// Where the guard sends visitors without a session.
    pub fn auth_failure_redirect() -> Self {
        Self::SignUp
    }

    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Session as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Persisted session not checked yet.
    Loading,
    Authenticated,
    Unauthenticated,
}

impl GuardState {
    pub fn from_session(state: &SessionState) -> Self {
        if state.loading {
            Self::Loading
        } else if state.is_authenticated() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render nothing until the session is known.
    Wait,
    Render,
    Redirect(AppRoute),
}

pub fn evaluate(route: AppRoute, guard: GuardState) -> RouteDecision {
    match guard {
        GuardState::Loading if route.requires_auth() => RouteDecision::Wait,
        GuardState::Unauthenticated if route.requires_auth() => {
            RouteDecision::Redirect(AppRoute::auth_failure_redirect())
        }
        GuardState::Authenticated if route.should_redirect_when_authenticated() => {
            RouteDecision::Redirect(AppRoute::auth_success_redirect())
        }
        _ => RouteDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_shared::UserProfile;

    #[test]
    fn paths_round_trip() {
        for route in [
            AppRoute::Home,
            AppRoute::About,
            AppRoute::SignIn,
            AppRoute::SignUp,
            AppRoute::ForgotPassword,
            AppRoute::ResetPassword,
            AppRoute::Profile,
            AppRoute::Settings,
            AppRoute::Notifications,
            AppRoute::Reminders,
            AppRoute::Resources,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn parsing_ignores_query_fragment_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/profile/"), AppRoute::Profile);
        assert_eq!(AppRoute::from_path("/reset-password#access_token=x"), AppRoute::ResetPassword);
        assert_eq!(AppRoute::from_path("/signin?next=/profile"), AppRoute::SignIn);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn loading_renders_nothing_for_protected_pages() {
        assert_eq!(evaluate(AppRoute::Profile, GuardState::Loading), RouteDecision::Wait);
        assert_eq!(evaluate(AppRoute::About, GuardState::Loading), RouteDecision::Render);
    }

    #[test]
    fn missing_session_redirects_to_signup() {
        for route in AppRoute::PROTECTED {
            assert_eq!(
                evaluate(route, GuardState::Unauthenticated),
                RouteDecision::Redirect(AppRoute::SignUp)
            );
            assert_eq!(evaluate(route, GuardState::Authenticated), RouteDecision::Render);
        }
    }

    #[test]
    fn signed_in_users_skip_auth_pages() {
        assert_eq!(
            evaluate(AppRoute::SignIn, GuardState::Authenticated),
            RouteDecision::Redirect(AppRoute::Home)
        );
        assert_eq!(evaluate(AppRoute::SignUp, GuardState::Unauthenticated), RouteDecision::Render);
    }

    #[test]
    fn guard_state_follows_session() {
        let mut state = SessionState {
            loading: true,
            ..SessionState::default()
        };
        assert_eq!(GuardState::from_session(&state), GuardState::Loading);

        state.loading = false;
        assert_eq!(GuardState::from_session(&state), GuardState::Unauthenticated);

        state.user = Some(UserProfile::new("u-1", "ada@example.com"));
        assert_eq!(GuardState::from_session(&state), GuardState::Authenticated);
    }
}
