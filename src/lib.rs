//! Client core of the AI tutor front-end.
//!
//! Everything here is independent of the browser: the transport and storage
//! are traits, so the session rules, the 401 handling and the quiz/chat state
//! are exercised natively in tests and driven by the Leptos app in
//! `tutor-frontend`.

pub mod api;
pub mod auth_backend;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod quiz;
pub mod request;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::{ChatApi, HealthApi, QuizApi};
pub use auth_backend::{AuthBackend, AuthSession, OAuthProvider, SignUpOutcome};
pub use client::{ApiTransport, AuthorizedClient, SessionExpiryHandler};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind, SessionError, StorageError};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::{SessionHolder, SessionState};
pub use storage::{KeyValueStore, MemoryStore};
pub use validation::ValidationError;

pub use tutor_shared as shared;
