//! Auth and storage provider client
//!
//! Talks to a Supabase-compatible backend over plain REST: GoTrue for
//! identity, the storage API for avatars and PostgREST for the `profiles`
//! table. These calls go through the raw `HttpClient`, never through
//! `AuthorizedClient`, since they run before a session exists or carry
//! their own token.

use crate::client::error_message;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::validation::{SignUpForm, validate_sign_up};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use tutor_shared::{HEADER_AUTHORIZATION, UserProfile};

pub const AVATAR_BUCKET: &str = "avatars";
pub const PROFILES_TABLE: &str = "profiles";

// =========================================================
// Types
// =========================================================

/// A signed-in identity as handed to `SessionHolder::login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider sent a confirmation mail; no session yet.
    ConfirmationRequired { email: String },
    /// Email confirmation is disabled on the project.
    SignedIn(AuthSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
        }
    }
}

/// What a redirect back from the provider was for (`type=` in the fragment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    SignIn,
    SignUp,
    Recovery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCallback {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub kind: CallbackKind,
}

/// Row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ProfileRow {
    /// Overlays the row onto the cached user; empty columns keep the cached value.
    pub fn apply_to(&self, user: &UserProfile) -> UserProfile {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        UserProfile {
            display_name: non_empty(&self.full_name).or_else(|| user.display_name.clone()),
            photo_url: non_empty(&self.avatar_url).or_else(|| user.photo_url.clone()),
            ..user.clone()
        }
    }
}

/// Partial update of a `profiles` row. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

// GoTrue wire shapes

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Map<String, Value>,
}

impl GoTrueUser {
    fn into_profile(self) -> UserProfile {
        let meta = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| self.user_metadata.get(*k).and_then(|v| v.as_str()))
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        let display_name = meta(&["full_name", "name"]);
        let photo_url = meta(&["avatar_url", "picture"]);
        UserProfile {
            id: self.id,
            email: self.email.unwrap_or_default(),
            display_name,
            photo_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<GoTrueUser>,
    #[serde(default)]
    email: Option<String>,
}

// =========================================================
// Client
// =========================================================

pub struct AuthBackend<'a, C: ?Sized> {
    http: &'a C,
    base_url: String,
    anon_key: String,
}

impl<'a, C: HttpClient + ?Sized> AuthBackend<'a, C> {
    pub fn new(http: &'a C, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn request(&self, path: &str, method: HttpMethod, token: Option<&str>) -> HttpRequest {
        let bearer = token.unwrap_or(&self.anon_key);
        HttpRequest::new(&format!("{}{}", self.base_url, path), method)
            .with_header("apikey", &self.anon_key)
            .with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", bearer))
    }

    async fn dispatch(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        debug!(method = req.method.as_str(), url = %req.url, "auth backend request");
        let resp = self.http.send(req).await?;
        if !resp.is_success() {
            let message = error_message(&resp.body);
            warn!(status = resp.status, %message, "auth backend rejected request");
            return Err(ApiError::Provider(if message.is_empty() {
                format!("Request failed with status {}", resp.status)
            } else {
                message
            }));
        }
        Ok(resp)
    }

    // --- Identity ---

    /// `POST /auth/v1/signup`. The display name travels as user metadata.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> ApiResult<SignUpOutcome> {
        let req = self
            .request("/auth/v1/signup", HttpMethod::Post, None)
            .with_json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name, "full_name": name }
            }))?;
        let body: SignUpResponse = self.dispatch(req).await?.json()?;

        match (body.access_token, body.user) {
            (Some(token), Some(user)) => Ok(SignUpOutcome::SignedIn(AuthSession {
                token,
                user: user.into_profile(),
            })),
            (_, user) => Ok(SignUpOutcome::ConfirmationRequired {
                email: user
                    .and_then(|u| u.email)
                    .or(body.email)
                    .unwrap_or_else(|| email.to_string()),
            }),
        }
    }

    /// Checks the whole form, then signs up with its trimmed fields. A form
    /// that fails the checks never reaches the network.
    pub async fn register(&self, form: &SignUpForm) -> ApiResult<SignUpOutcome> {
        validate_sign_up(form)?;
        self.sign_up(form.email.trim(), &form.password, form.name.trim()).await
    }

    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let req = self
            .request("/auth/v1/token?grant_type=password", HttpMethod::Post, None)
            .with_json(&json!({ "email": email, "password": password }))?;
        let body: TokenResponse = self.dispatch(req).await?.json()?;
        Ok(AuthSession {
            token: body.access_token,
            user: body.user.into_profile(),
        })
    }

    /// URL the browser is sent to for an OAuth sign-in.
    pub fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url,
            provider.as_str(),
            urlencoding::encode(redirect_to)
        )
    }

    /// `GET /auth/v1/user`
    pub async fn current_user(&self, token: &str) -> ApiResult<UserProfile> {
        let req = self.request("/auth/v1/user", HttpMethod::Get, Some(token));
        let user: GoTrueUser = self.dispatch(req).await?.json()?;
        Ok(user.into_profile())
    }

    /// `POST /auth/v1/recover`. The mail links back to `redirect_to`.
    pub async fn request_password_reset(&self, email: &str, redirect_to: &str) -> ApiResult<()> {
        let path = format!("/auth/v1/recover?redirect_to={}", urlencoding::encode(redirect_to));
        let req = self
            .request(&path, HttpMethod::Post, None)
            .with_json(&json!({ "email": email }))?;
        self.dispatch(req).await?;
        Ok(())
    }

    /// `PUT /auth/v1/user` with the recovery or session token.
    pub async fn update_password(&self, token: &str, password: &str) -> ApiResult<()> {
        let req = self
            .request("/auth/v1/user", HttpMethod::Put, Some(token))
            .with_json(&json!({ "password": password }))?;
        self.dispatch(req).await?;
        Ok(())
    }

    /// `POST /auth/v1/resend` for a pending sign-up confirmation.
    pub async fn resend_confirmation(&self, email: &str) -> ApiResult<()> {
        let req = self
            .request("/auth/v1/resend", HttpMethod::Post, None)
            .with_json(&json!({ "type": "signup", "email": email }))?;
        self.dispatch(req).await?;
        Ok(())
    }

    // --- Storage ---

    /// Uploads (or replaces) an avatar and returns its public URL.
    pub async fn upload_avatar(
        &self,
        token: &str,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<String> {
        let object = format!(
            "{}/{}/{}",
            AVATAR_BUCKET,
            urlencoding::encode(user_id),
            urlencoding::encode(file_name)
        );
        let req = self
            .request(&format!("/storage/v1/object/{}", object), HttpMethod::Post, Some(token))
            .with_header("x-upsert", "true")
            .with_bytes(content_type, bytes);
        self.dispatch(req).await?;
        Ok(self.public_object_url(&object))
    }

    pub fn public_object_url(&self, object: &str) -> String {
        format!("{}/storage/v1/object/public/{}", self.base_url, object)
    }

    // --- Profiles table ---

    fn profile_path(user_id: &str) -> String {
        format!("/rest/v1/{}?id=eq.{}", PROFILES_TABLE, urlencoding::encode(user_id))
    }

    /// Returns `None` when the user has no row yet.
    pub async fn fetch_profile(&self, token: &str, user_id: &str) -> ApiResult<Option<ProfileRow>> {
        let req = self.request(&Self::profile_path(user_id), HttpMethod::Get, Some(token));
        let rows: Vec<ProfileRow> = self.dispatch(req).await?.json()?;
        Ok(rows.into_iter().next())
    }

    pub async fn update_profile(&self, token: &str, user_id: &str, patch: &ProfilePatch) -> ApiResult<ProfileRow> {
        let req = self
            .request(&Self::profile_path(user_id), HttpMethod::Patch, Some(token))
            .with_header("Prefer", "return=representation")
            .with_json(patch)?;
        let rows: Vec<ProfileRow> = self.dispatch(req).await?.json()?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse(format!("no profile row for {}", user_id)))
    }
}

/// Reads the token a provider redirect left in the URL fragment.
///
/// `Ok(None)` when the fragment carries no token; an `error` parameter is
/// surfaced as `ApiError::Provider`.
pub fn parse_oauth_callback(fragment: &str) -> ApiResult<Option<OAuthCallback>> {
    let params: Vec<(String, String)> = fragment
        .trim_start_matches('#')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let v = v.replace('+', " ");
            let v = urlencoding::decode(&v).ok()?.into_owned();
            Some((k.to_string(), v))
        })
        .collect();
    let get = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

    if let Some(error) = get("error") {
        return Err(ApiError::Provider(get("error_description").unwrap_or(error)));
    }

    let Some(access_token) = get("access_token").filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let kind = match get("type").as_deref() {
        Some("recovery") => CallbackKind::Recovery,
        Some("signup") => CallbackKind::SignUp,
        _ => CallbackKind::SignIn,
    };

    Ok(Some(OAuthCallback {
        access_token,
        refresh_token: get("refresh_token"),
        expires_in: get("expires_in").and_then(|v| v.parse().ok()),
        kind,
    }))
}

#[cfg(test)]
mod tests;
