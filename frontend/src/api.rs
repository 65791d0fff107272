//! Client wiring
//!
//! Builds the core clients with the browser transport and storage. Config
//! values are baked in at compile time through `option_env!`.

use crate::auth::AuthContext;
use crate::web::router::hard_redirect;
use crate::web::{BrowserStorage, FETCH, FetchHttpClient};
use leptos::prelude::*;
use tracing::error;
use tutor::config::{ENV_API_URL, ENV_AUTH_ANON_KEY, ENV_AUTH_URL, ENV_LOG_LEVEL};
use tutor::{AuthBackend, AuthorizedClient, ClientConfig};

/// Tutoring API client: bearer token from storage, 401 ends the session.
pub type TutorClient = AuthorizedClient<FetchHttpClient, BrowserStorage, Box<dyn Fn()>>;

pub fn load_config() -> ClientConfig {
    let lookup = |key: &str| {
        match key {
            ENV_API_URL => option_env!("TUTOR_API_URL"),
            ENV_AUTH_URL => option_env!("TUTOR_AUTH_URL"),
            ENV_AUTH_ANON_KEY => option_env!("TUTOR_AUTH_ANON_KEY"),
            ENV_LOG_LEVEL => option_env!("TUTOR_LOG"),
            _ => None,
        }
        .map(str::to_string)
    };

    ClientConfig::from_lookup(lookup).unwrap_or_else(|e| {
        error!(error = %e, "invalid build configuration, using defaults");
        ClientConfig::default()
    })
}

pub fn use_config() -> ClientConfig {
    use_context::<ClientConfig>().expect("ClientConfig should be provided")
}

/// Client for the tutoring API.
///
/// On a 401 the session is dropped and the browser is sent to `/signin`.
pub fn tutor_client(config: &ClientConfig, auth: AuthContext) -> TutorClient {
    let on_expired: Box<dyn Fn()> = Box::new(move || {
        auth.logout();
        hard_redirect("/signin");
    });
    AuthorizedClient::new(&config.api_base_url, FetchHttpClient, BrowserStorage, on_expired)
}

pub fn use_tutor_client() -> TutorClient {
    tutor_client(&use_config(), crate::auth::use_auth())
}

pub fn auth_backend(config: &ClientConfig) -> AuthBackend<'static, FetchHttpClient> {
    AuthBackend::new(&FETCH, &config.auth_url, &config.auth_anon_key)
}

/// Message shown when the auth provider is not configured for this build.
pub const AUTH_NOT_CONFIGURED: &str = "Sign-in is not configured for this deployment.";
