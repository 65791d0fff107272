use super::*;
use crate::error::ErrorKind;
use crate::request::{HttpBody, MockHttpClient};
use crate::validation::ValidationError;
use serde_json::json;

const AUTH: &str = "https://project.supabase.co";
const ANON: &str = "anon-key";

fn backend(http: &MockHttpClient) -> AuthBackend<'_, MockHttpClient> {
    AuthBackend::new(http, AUTH, ANON)
}

fn gotrue_user() -> serde_json::Value {
    json!({
        "id": "u-1",
        "email": "ada@example.com",
        "user_metadata": { "name": "Ada", "avatar_url": "https://cdn/ada.png" }
    })
}

fn sent_json(http: &MockHttpClient) -> serde_json::Value {
    serde_json::from_str(http.last_request().unwrap().body_text().unwrap()).unwrap()
}

#[tokio::test]
async fn password_sign_in_maps_the_user() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/auth/v1/token?grant_type=password", AUTH),
        200,
        json!({ "access_token": "jwt-1", "token_type": "bearer", "user": gotrue_user() }),
    );

    let session = backend(&http)
        .sign_in_with_password("ada@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(session.token, "jwt-1");
    assert_eq!(session.user.id, "u-1");
    assert_eq!(session.user.display_name.as_deref(), Some("Ada"));
    assert_eq!(session.user.photo_url.as_deref(), Some("https://cdn/ada.png"));

    let req = http.last_request().unwrap();
    assert_eq!(req.header("apikey"), Some(ANON));
    assert_eq!(req.header("authorization"), Some("Bearer anon-key"));
    assert_eq!(sent_json(&http)["password"], "secret1");
}

#[tokio::test]
async fn bad_credentials_surface_the_provider_message() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/auth/v1/token?grant_type=password", AUTH),
        400,
        json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
    );

    let err = backend(&http)
        .sign_in_with_password("ada@example.com", "nope")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.user_message(), "Invalid login credentials");
}

#[tokio::test]
async fn sign_up_without_session_needs_confirmation() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/auth/v1/signup", AUTH),
        200,
        json!({ "id": "u-2", "email": "grace@example.com", "confirmation_sent_at": "2026-01-01T00:00:00Z" }),
    );

    let outcome = backend(&http)
        .sign_up("grace@example.com", "secret1", "Grace")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SignUpOutcome::ConfirmationRequired {
            email: "grace@example.com".into()
        }
    );
    assert_eq!(sent_json(&http)["data"]["name"], "Grace");
}

#[tokio::test]
async fn sign_up_with_session_signs_in() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/auth/v1/signup", AUTH),
        200,
        json!({ "access_token": "jwt-2", "user": gotrue_user() }),
    );

    let outcome = backend(&http)
        .sign_up("ada@example.com", "secret1", "Ada")
        .await
        .unwrap();

    assert!(matches!(outcome, SignUpOutcome::SignedIn(s) if s.token == "jwt-2"));
}

#[tokio::test]
async fn current_user_uses_the_session_token() {
    let http = MockHttpClient::new();
    http.mock_response(&format!("{}/auth/v1/user", AUTH), 200, gotrue_user());

    let user = backend(&http).current_user("jwt-9").await.unwrap();

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(
        http.last_request().unwrap().header("Authorization"),
        Some("Bearer jwt-9")
    );
}

#[tokio::test]
async fn password_reset_and_update() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!(
            "{}/auth/v1/recover?redirect_to=https%3A%2F%2Ftutor.app%2Freset-password",
            AUTH
        ),
        200,
        json!({}),
    );
    http.mock_response(&format!("{}/auth/v1/user", AUTH), 200, gotrue_user());

    let auth = backend(&http);
    auth.request_password_reset("ada@example.com", "https://tutor.app/reset-password")
        .await
        .unwrap();
    assert_eq!(sent_json(&http)["email"], "ada@example.com");

    auth.update_password("recovery-jwt", "newpass").await.unwrap();
    let req = http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.header("authorization"), Some("Bearer recovery-jwt"));
}

#[tokio::test]
async fn resend_sends_signup_type() {
    let http = MockHttpClient::new();
    http.mock_response(&format!("{}/auth/v1/resend", AUTH), 200, json!({}));

    backend(&http).resend_confirmation("grace@example.com").await.unwrap();

    assert_eq!(
        sent_json(&http),
        json!({ "type": "signup", "email": "grace@example.com" })
    );
}

#[test]
fn oauth_url_encodes_redirect() {
    let http = MockHttpClient::new();
    assert_eq!(
        backend(&http).oauth_authorize_url(OAuthProvider::Google, "http://localhost:8080/"),
        "https://project.supabase.co/auth/v1/authorize?provider=google&redirect_to=http%3A%2F%2Flocalhost%3A8080%2F"
    );
}

#[tokio::test]
async fn avatar_upload_returns_public_url() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/storage/v1/object/avatars/u-1/me.png", AUTH),
        200,
        json!({ "Key": "avatars/u-1/me.png" }),
    );

    let url = backend(&http)
        .upload_avatar("jwt", "u-1", "me.png", "image/png", vec![1, 2, 3])
        .await
        .unwrap();

    assert_eq!(url, format!("{}/storage/v1/object/public/avatars/u-1/me.png", AUTH));
    let req = http.last_request().unwrap();
    assert_eq!(req.header("x-upsert"), Some("true"));
    assert_eq!(req.header("content-type"), Some("image/png"));
    assert_eq!(req.body, Some(HttpBody::Bytes(vec![1, 2, 3])));
}

#[tokio::test]
async fn profile_rows_round_trip_through_postgrest() {
    let http = MockHttpClient::new();
    let url = format!("{}/rest/v1/profiles?id=eq.u-1", AUTH);
    http.mock_response(&url, 200, json!([]));

    let auth = backend(&http);
    assert_eq!(auth.fetch_profile("jwt", "u-1").await.unwrap(), None);

    http.mock_response(
        &url,
        200,
        json!([{ "id": "u-1", "full_name": "Ada L.", "avatar_url": null }]),
    );
    let patch = ProfilePatch {
        full_name: Some("Ada L.".into()),
        avatar_url: None,
    };
    let row = auth.update_profile("jwt", "u-1", &patch).await.unwrap();

    assert_eq!(row.full_name.as_deref(), Some("Ada L."));
    let req = http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Patch);
    assert_eq!(req.header("prefer"), Some("return=representation"));
    assert_eq!(sent_json(&http), json!({ "full_name": "Ada L." }));
}

#[test]
fn profile_row_overlays_cached_user() {
    let cached = UserProfile::new("u-1", "ada@example.com").with_display_name("Ada");
    let row = ProfileRow {
        id: "u-1".into(),
        full_name: Some(" ".into()),
        avatar_url: Some("https://cdn/new.png".into()),
        email: None,
        created_at: None,
    };

    let merged = row.apply_to(&cached);
    assert_eq!(merged.display_name.as_deref(), Some("Ada"));
    assert_eq!(merged.photo_url.as_deref(), Some("https://cdn/new.png"));
}

#[test]
fn callback_fragment_parsing() {
    let cb = parse_oauth_callback("#access_token=abc&expires_in=3600&refresh_token=r1&token_type=bearer")
        .unwrap()
        .unwrap();
    assert_eq!(cb.access_token, "abc");
    assert_eq!(cb.expires_in, Some(3600));
    assert_eq!(cb.kind, CallbackKind::SignIn);

    let cb = parse_oauth_callback("access_token=abc&type=recovery").unwrap().unwrap();
    assert_eq!(cb.kind, CallbackKind::Recovery);

    assert_eq!(parse_oauth_callback("").unwrap(), None);
    assert_eq!(parse_oauth_callback("#section-2").unwrap(), None);

    let err = parse_oauth_callback("#error=access_denied&error_description=User+cancelled").unwrap_err();
    assert_eq!(err.user_message(), "User cancelled");
}

fn sign_up_form(confirm: &str) -> SignUpForm {
    SignUpForm {
        name: " Ada ".into(),
        email: "ada@example.com".into(),
        password: "secret1".into(),
        confirm_password: confirm.into(),
        accepted_terms: true,
    }
}

#[tokio::test]
async fn register_with_mismatched_passwords_sends_nothing() {
    let http = MockHttpClient::new();

    let err = backend(&http).register(&sign_up_form("secret2")).await.unwrap_err();

    assert!(matches!(err, ApiError::Invalid(ValidationError::PasswordMismatch)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), "Passwords do not match!");
    assert!(http.requests.borrow().is_empty());
}

#[tokio::test]
async fn register_sends_trimmed_fields_once_valid() {
    let http = MockHttpClient::new();
    http.mock_response(
        &format!("{}/auth/v1/signup", AUTH),
        200,
        json!({ "id": "u-1", "email": "ada@example.com" }),
    );

    let outcome = backend(&http).register(&sign_up_form("secret1")).await.unwrap();

    assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired { .. }));
    assert_eq!(http.requests.borrow().len(), 1);
    assert_eq!(sent_json(&http)["data"]["name"], "Ada");
}
