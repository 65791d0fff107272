//! Authorized HTTP client
//!
//! Wraps any `HttpClient` with the two cross-cutting rules of the tutoring API:
//! the bearer token from storage goes on every request, and a 401 ends the
//! session.

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::storage::KeyValueStore;
use tracing::{debug, warn};
use tutor_shared::protocol::ApiRequest;
use tutor_shared::{HEADER_AUTHORIZATION, STORAGE_TOKEN_KEY, STORAGE_USER_KEY};

/// Reacts to a rejected session (browser: sign out and go to `/signin`).
pub trait SessionExpiryHandler {
    fn session_expired(&self);
}

impl<F: Fn()> SessionExpiryHandler for F {
    fn session_expired(&self) {
        self()
    }
}

/// Something that can execute a typed `ApiRequest`.
#[async_trait::async_trait(?Send)]
pub trait ApiTransport {
    async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response>;
}

pub struct AuthorizedClient<C, S, H> {
    base_url: String,
    http: C,
    store: S,
    on_expired: H,
}

impl<C, S, H> AuthorizedClient<C, S, H>
where
    C: HttpClient,
    S: KeyValueStore,
    H: SessionExpiryHandler,
{
    pub fn new(base_url: &str, http: C, store: S, on_expired: H) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
            on_expired,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.store.get(STORAGE_TOKEN_KEY) {
            Some(token) if !token.is_empty() => {
                req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token))
            }
            _ => req,
        }
    }

    pub async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let req = self.authorize(req);
        debug!(method = req.method.as_str(), url = %req.url, "dispatching request");

        let resp = self.http.send(req).await?;

        if resp.status == 401 {
            warn!("request rejected with 401, ending session");
            self.store.remove(STORAGE_TOKEN_KEY);
            self.store.remove(STORAGE_USER_KEY);
            self.on_expired.session_expired();
            return Err(ApiError::Unauthorized {
                status: resp.status,
            });
        }

        if !resp.is_success() {
            return Err(ApiError::Status {
                status: resp.status,
                message: error_message(&resp.body),
            });
        }

        Ok(resp)
    }
}

#[async_trait::async_trait(?Send)]
impl<C, S, H> ApiTransport for AuthorizedClient<C, S, H>
where
    C: HttpClient,
    S: KeyValueStore,
    H: SessionExpiryHandler,
{
    async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let mut req = HttpRequest::new(&self.url(R::PATH), R::METHOD);
        if R::METHOD != HttpMethod::Get {
            req = req.with_json(request)?;
        }
        self.send(req).await?.json()
    }
}

/// Pulls a human readable message out of an error body.
///
/// Understands the tutoring API (`error`) and the auth provider
/// (`error_description`, `msg`, `message`) shapes.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.len() > 200 || trimmed.starts_with('<') {
        String::new()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::cell::Cell;
    use tutor_shared::protocol::HealthRequest;

    const BASE: &str = "http://localhost:5000/api";

    #[test]
    fn url_joins_paths() {
        let client = AuthorizedClient::new("http://x/api/", MockHttpClient::new(), MemoryStore::new(), || {});
        assert_eq!(client.url("/ask"), "http://x/api/ask");
        assert_eq!(client.url("topics"), "http://x/api/topics");
    }

    #[tokio::test]
    async fn attaches_bearer_token_from_storage() {
        let http = MockHttpClient::new();
        http.mock_response(&format!("{}/health", BASE), 200, json!({ "status": "healthy" }));
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "tok-9").unwrap();

        let client = AuthorizedClient::new(BASE, &http, store, || {});
        let status = client.call(&HealthRequest).await.unwrap();

        assert!(status.is_healthy());
        let req = http.last_request().unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer tok-9"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn no_token_means_no_header() {
        let http = MockHttpClient::new();
        http.mock_response(&format!("{}/health", BASE), 200, json!({ "status": "healthy" }));

        let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});
        client.call(&HealthRequest).await.unwrap();

        assert!(http.last_request().unwrap().header(HEADER_AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn unauthorized_clears_storage_and_fires_handler() {
        let http = MockHttpClient::new();
        http.mock_response(&format!("{}/health", BASE), 401, json!({ "error": "expired" }));
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "tok").unwrap();
        store.set(STORAGE_USER_KEY, r#"{"id":"u","email":"e@x.io"}"#).unwrap();
        let fired = Cell::new(0);

        let client = AuthorizedClient::new(BASE, &http, store.clone(), || fired.set(fired.get() + 1));
        let err = client.call(&HealthRequest).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { status: 401 }));
        assert_eq!(fired.get(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn other_statuses_keep_the_session() {
        let http = MockHttpClient::new();
        http.mock_response(&format!("{}/health", BASE), 500, json!({ "error": "db down" }));
        let store = MemoryStore::new();
        store.set(STORAGE_TOKEN_KEY, "tok").unwrap();
        let fired = Cell::new(false);

        let client = AuthorizedClient::new(BASE, &http, store.clone(), || fired.set(true));
        let err = client.call(&HealthRequest).await.unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "db down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!fired.get());
        assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn transport_failure_is_offline() {
        let http = MockHttpClient::new();
        http.mock_network_failure(&format!("{}/health", BASE));

        let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});
        let err = client.call(&HealthRequest).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Offline);
    }

    #[test]
    fn error_message_shapes() {
        assert_eq!(error_message(r#"{"error":"Question is required"}"#), "Question is required");
        assert_eq!(error_message(r#"{"error_description":"Invalid login credentials","error":"invalid_grant"}"#), "Invalid login credentials");
        assert_eq!(error_message(r#"{"msg":"User already registered"}"#), "User already registered");
        assert_eq!(error_message("Not Found"), "Not Found");
        assert_eq!(error_message("<html>502</html>"), "");
    }
}
