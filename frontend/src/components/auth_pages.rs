//! Sign-in, sign-up and password recovery pages.
//!
//! All four talk to the auth backend directly. Only a successful sign-in
//! touches the session, through `AuthContext::login`.

use crate::api::{AUTH_NOT_CONFIGURED, auth_backend, use_config};
use crate::auth::use_auth;
use crate::components::icons::{Eye, EyeOff, Lock, Mail, UserIcon};
use crate::web::router::{Link, absolute_url, clear_fragment, current_fragment, hard_redirect, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;
use tracing::{error, info};
use tutor::auth_backend::{CallbackKind, OAuthProvider, SignUpOutcome, parse_oauth_callback};
use tutor::validation::{
    SignUpForm, validate_email, validate_password_reset, validate_sign_in, validate_sign_up,
};

const REDIRECT_DELAY: Duration = Duration::from_secs(2);
const CONFIRMATION_REDIRECT_DELAY: Duration = Duration::from_secs(6);

/// Token for the reset form: a recovery link wins over the current session.
fn recovery_token(fragment: &str, session_token: Option<String>) -> Option<String> {
    match parse_oauth_callback(fragment) {
        Ok(Some(cb)) if cb.kind == CallbackKind::Recovery => Some(cb.access_token),
        _ => session_token,
    }
}

#[component]
fn Alert(message: ReadSignal<Option<String>>, #[prop(into)] class: String) -> impl IntoView {
    view! {
        {move || message.get().map(|m| {
            let class = class.clone();
            view! { <div class=class role="alert">{m}</div> }
        })}
    }
}

#[component]
fn PasswordInput(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div class="form-group">
            <label for=id>{label}</label>
            <div class="input-with-icon">
                <Lock attr:class="input-icon" />
                <input
                    id=id
                    type=move || if visible.get() { "text" } else { "password" }
                    placeholder=placeholder
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
                <button
                    type="button"
                    class="password-toggle"
                    aria-label="Toggle password visibility"
                    on:click=move |_| set_visible.update(|v| *v = !*v)
                >
                    {move || if visible.get() {
                        view! { <EyeOff /> }.into_any()
                    } else {
                        view! { <Eye /> }.into_any()
                    }}
                </button>
            </div>
        </div>
    }
}

#[component]
fn EmailInput(value: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for="email">"Email"</label>
            <div class="input-with-icon">
                <Mail attr:class="input-icon" />
                <input
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </div>
        </div>
    }
}

#[component]
fn GoogleButton(set_error: WriteSignal<Option<String>>) -> impl IntoView {
    let config = use_config();

    let on_click = move |_| {
        if !config.auth_enabled() {
            set_error.set(Some(AUTH_NOT_CONFIGURED.to_string()));
            return;
        }
        let url = auth_backend(&config).oauth_authorize_url(OAuthProvider::Google, &absolute_url("/"));
        info!("redirecting to Google sign-in");
        hard_redirect(&url);
    };

    view! {
        <button type="button" class="btn btn-google" on:click=on_click>
            "Continue with Google"
        </button>
    }
}

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = StoredValue::new(use_config());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        if let Err(e) = validate_sign_in(&email, &password) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let Some(backend) = config.with_value(|c| c.auth_enabled().then(|| auth_backend(c))) else {
            set_error.set(Some(AUTH_NOT_CONFIGURED.to_string()));
            return;
        };

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match backend.sign_in_with_password(email.trim(), &password).await {
                Ok(session) => {
                    info!(user_id = %session.user.id, "signed in");
                    match auth.login(session.user, session.token) {
                        Ok(()) => router.navigate("/"),
                        Err(e) => {
                            error!(error = %e, "could not persist session");
                            set_error.set(Some(e.to_string()));
                        }
                    }
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Welcome Back"</h1>
                <p class="auth-subtitle">"Sign in to continue learning"</p>

                <Alert message=error_msg class="alert alert-error" />

                <form class="auth-form" on:submit=on_submit>
                    <EmailInput value=email />
                    <PasswordInput id="password" label="Password" value=password placeholder="Your password" />

                    <div class="form-row">
                        <Link to="/forgot-password" class="forgot-link">"Forgot password?"</Link>
                    </div>

                    <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>

                <div class="auth-divider"><span>"or"</span></div>
                <GoogleButton set_error=set_error />

                <p class="auth-switch">
                    "Don't have an account? "
                    <Link to="/signup">"Sign up"</Link>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = StoredValue::new(use_config());

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (terms, set_terms) = signal(false);
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (pending_email, set_pending_email) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = SignUpForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
            accepted_terms: terms.get_untracked(),
        };
        if let Err(e) = validate_sign_up(&form) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let Some(backend) = config.with_value(|c| c.auth_enabled().then(|| auth_backend(c))) else {
            set_error.set(Some(AUTH_NOT_CONFIGURED.to_string()));
            return;
        };

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = backend.register(&form).await;
            match result {
                Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                    info!("sign-up awaiting email confirmation");
                    set_notice.set(Some(format!(
                        "Account created! Check {} for a confirmation link, then sign in.",
                        email
                    )));
                    set_pending_email.set(Some(email));
                    set_timeout(move || router.navigate("/signin"), CONFIRMATION_REDIRECT_DELAY);
                }
                Ok(SignUpOutcome::SignedIn(session)) => {
                    if let Err(e) = auth.login(session.user, session.token) {
                        error!(error = %e, "could not persist session");
                        set_error.set(Some(e.to_string()));
                    } else {
                        router.navigate("/");
                    }
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_submitting.set(false);
        });
    };

    let on_resend = move |_| {
        let Some(address) = pending_email.get_untracked() else {
            return;
        };
        let backend = config.with_value(auth_backend);
        spawn_local(async move {
            match backend.resend_confirmation(&address).await {
                Ok(()) => set_notice.set(Some(format!("Confirmation email sent again to {}.", address))),
                Err(e) => set_error.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Create Account"</h1>
                <p class="auth-subtitle">"Start learning with your AI tutor"</p>

                <Alert message=error_msg class="alert alert-error" />
                <Show when=move || notice.get().is_some()>
                    <div class="alert alert-success" role="status">
                        <p>{move || notice.get().unwrap_or_default()}</p>
                        <button type="button" class="btn btn-link" on:click=on_resend>
                            "Resend email"
                        </button>
                    </div>
                </Show>

                <form class="auth-form" on:submit=on_submit>
                    <div class="form-group">
                        <label for="name">"Full Name"</label>
                        <div class="input-with-icon">
                            <UserIcon attr:class="input-icon" />
                            <input
                                id="name"
                                type="text"
                                placeholder="Your name"
                                prop:value=name
                                on:input=move |ev| name.set(event_target_value(&ev))
                            />
                        </div>
                    </div>
                    <EmailInput value=email />
                    <PasswordInput id="password" label="Password" value=password placeholder="At least 6 characters" />
                    <PasswordInput id="confirm-password" label="Confirm Password" value=confirm />

                    <label class="checkbox-label">
                        <input
                            type="checkbox"
                            prop:checked=terms
                            on:change=move |ev| set_terms.set(event_target_checked(&ev))
                        />
                        "I agree to the Terms of Service and Privacy Policy"
                    </label>

                    <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>

                <div class="auth-divider"><span>"or"</span></div>
                <GoogleButton set_error=set_error />

                <p class="auth-switch">
                    "Already have an account? "
                    <Link to="/signin">"Sign in"</Link>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let config = StoredValue::new(use_config());
    let email = RwSignal::new(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error) = signal(Option::<String>::None);
    let (sent, set_sent) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get_untracked();
        if let Err(e) = validate_email(&address) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let Some(backend) = config.with_value(|c| c.auth_enabled().then(|| auth_backend(c))) else {
            set_error.set(Some(AUTH_NOT_CONFIGURED.to_string()));
            return;
        };

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match backend
                .request_password_reset(address.trim(), &absolute_url("/reset-password"))
                .await
            {
                Ok(()) => set_sent.set(true),
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Reset Password"</h1>
                <Show
                    when=move || sent.get()
                    fallback=move || view! {
                        <p class="auth-subtitle">"Enter your email and we'll send you a reset link."</p>
                        <Alert message=error_msg class="alert alert-error" />
                        <form class="auth-form" on:submit=on_submit>
                            <EmailInput value=email />
                            <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Sending..." } else { "Send Reset Link" }}
                            </button>
                        </form>
                    }
                >
                    <div class="alert alert-success" role="status">
                        "Check your inbox for a link to reset your password."
                    </div>
                </Show>
                <p class="auth-switch">
                    <Link to="/signin">"Back to Sign In"</Link>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = StoredValue::new(use_config());

    let token = StoredValue::new(recovery_token(&current_fragment(), auth.token_untracked()));
    clear_fragment();

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error) = signal(Option::<String>::None);
    let (done, set_done) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = token.get_value() else {
            return;
        };
        let new_password = password.get_untracked();
        if let Err(e) = validate_password_reset(&new_password, &confirm.get_untracked()) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let Some(backend) = config.with_value(|c| c.auth_enabled().then(|| auth_backend(c))) else {
            set_error.set(Some(AUTH_NOT_CONFIGURED.to_string()));
            return;
        };

        set_submitting.set(true);
        set_error.set(None);
        spawn_local(async move {
            match backend.update_password(&token, &new_password).await {
                Ok(()) => {
                    info!("password updated");
                    set_done.set(true);
                    set_timeout(move || router.navigate("/signin"), REDIRECT_DELAY);
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Choose a New Password"</h1>
                {move || {
                    if token.with_value(Option::is_none) {
                        view! {
                            <div class="alert alert-error" role="alert">
                                "This reset link is invalid or has expired."
                            </div>
                            <Link to="/forgot-password" class="btn btn-primary">"Request a new link"</Link>
                        }
                        .into_any()
                    } else if done.get() {
                        view! {
                            <div class="alert alert-success" role="status">
                                "Password updated. Redirecting to sign in..."
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <Alert message=error_msg class="alert alert-error" />
                            <form class="auth-form" on:submit=on_submit>
                                <PasswordInput id="new-password" label="New Password" value=password />
                                <PasswordInput id="confirm-password" label="Confirm Password" value=confirm />
                                <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                                    {move || if submitting.get() { "Updating..." } else { "Update Password" }}
                                </button>
                            </form>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}
