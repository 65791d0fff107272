use crate::api::{AUTH_NOT_CONFIGURED, auth_backend, use_config};
use crate::auth::{AuthContext, use_auth};
use crate::components::icons::{Calendar, Mail, Pencil, Save, UserIcon};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, info, warn};
use tutor::auth_backend::{ProfilePatch, ProfileRow};
use tutor_shared::UserProfile;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Storage object name for an uploaded avatar. One per user, so uploads replace.
fn avatar_file_name(original: &str) -> String {
    let ext = original
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "png".to_string());
    format!("avatar.{}", ext)
}

/// Up to two initials for the placeholder avatar.
fn initials(label: &str) -> String {
    label
        .split(|c: char| c.is_whitespace() || c == '@' || c == '.')
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Applies a saved row to the session, logging instead of failing the page.
fn sync_session(auth: AuthContext, row: &ProfileRow) {
    if let Some(user) = auth.user_untracked() {
        if let Err(e) = auth.update_user(row.apply_to(&user)) {
            error!(error = %e, "could not update cached profile");
        }
    }
}

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[component]
fn Avatar(user: UserProfile) -> impl IntoView {
    match user.photo_url.clone() {
        Some(url) => view! { <img class="profile-avatar" src=url alt="Profile picture" /> }.into_any(),
        None => view! { <div class="profile-avatar placeholder">{initials(user.label())}</div> }.into_any(),
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let config = StoredValue::new(use_config());
    let user = auth.user();

    let (row, set_row) = signal(Option::<ProfileRow>::None);
    let name = RwSignal::new(String::new());
    let (editing, set_editing) = signal(false);
    let (busy, set_busy) = signal(false);
    let (message, set_message) = signal(Option::<(String, bool)>::None);

    // initial load
    if let (Some(token), Some(current)) = (auth.token_untracked(), auth.user_untracked()) {
        name.set(current.display_name.clone().unwrap_or_default());
        if config.with_value(|c| c.auth_enabled()) {
            let backend = config.with_value(auth_backend);
            spawn_local(async move {
                match backend.fetch_profile(&token, &current.id).await {
                    Ok(Some(fetched)) => {
                        if let Some(full_name) = fetched.full_name.clone().filter(|n| !n.is_empty()) {
                            name.set(full_name);
                        }
                        sync_session(auth, &fetched);
                        set_row.set(Some(fetched));
                    }
                    Ok(None) => info!(user_id = %current.id, "no profile row yet"),
                    Err(e) => warn!(error = %e, "could not load profile"),
                }
            });
        }
    }

    let guarded = move || -> Option<(String, UserProfile)> {
        if !config.with_value(|c| c.auth_enabled()) {
            set_message.set(Some((AUTH_NOT_CONFIGURED.to_string(), true)));
            return None;
        }
        auth.token_untracked().zip(auth.user_untracked())
    };

    let on_save = move |_| {
        let Some((token, current)) = guarded() else {
            return;
        };
        let patch = ProfilePatch {
            full_name: Some(name.get_untracked().trim().to_string()),
            avatar_url: None,
        };
        let backend = config.with_value(auth_backend);
        set_busy.set(true);
        spawn_local(async move {
            match backend.update_profile(&token, &current.id, &patch).await {
                Ok(saved) => {
                    sync_session(auth, &saved);
                    set_row.set(Some(saved));
                    set_editing.set(false);
                    set_message.set(Some(("Profile updated successfully!".to_string(), false)));
                }
                Err(e) => set_message.set(Some((e.user_message(), true))),
            }
            set_busy.set(false);
        });
    };

    let on_avatar = move |ev: web_sys::Event| {
        let Some(file) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };
        if file.size() as usize > MAX_AVATAR_BYTES {
            set_message.set(Some(("Image must be smaller than 2 MB.".to_string(), true)));
            return;
        }
        let Some((token, current)) = guarded() else {
            return;
        };
        let backend = config.with_value(auth_backend);
        set_busy.set(true);
        spawn_local(async move {
            let result = async {
                let bytes = read_file(&file)
                    .await
                    .map_err(|e| format!("Could not read file: {}", e))?;
                let url = backend
                    .upload_avatar(&token, &current.id, &avatar_file_name(&file.name()), &file.type_(), bytes)
                    .await
                    .map_err(|e| e.user_message())?;
                let patch = ProfilePatch {
                    full_name: None,
                    avatar_url: Some(url),
                };
                backend
                    .update_profile(&token, &current.id, &patch)
                    .await
                    .map_err(|e| e.user_message())
            }
            .await;

            match result {
                Ok(saved) => {
                    sync_session(auth, &saved);
                    set_row.set(Some(saved));
                    set_message.set(Some(("Profile picture updated!".to_string(), false)));
                }
                Err(msg) => {
                    error!(error = %msg, "avatar upload failed");
                    set_message.set(Some((msg, true)));
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="page-container profile">
            <h1>"My Profile"</h1>

            {move || message.get().map(|(text, is_error)| {
                let class = if is_error { "alert alert-error" } else { "alert alert-success" };
                view! { <div class=class>{text}</div> }
            })}

            {move || user.get().map(|u| {
                let email = u.email.clone();
                view! {
                    <div class="profile-card">
                        <div class="profile-avatar-section">
                            <Avatar user=u.clone() />
                            <label class="btn btn-secondary upload-btn">
                                "Change photo"
                                <input
                                    type="file"
                                    accept="image/*"
                                    hidden
                                    disabled=move || busy.get()
                                    on:change=on_avatar
                                />
                            </label>
                        </div>

                        <div class="profile-details">
                            <div class="profile-field">
                                <UserIcon attr:class="icon-sm" />
                                <Show
                                    when=move || editing.get()
                                    fallback=move || view! {
                                        <span>{move || {
                                            let n = name.get();
                                            if n.is_empty() { "No name set".to_string() } else { n }
                                        }}</span>
                                        <button class="btn-icon" aria-label="Edit name" on:click=move |_| set_editing.set(true)>
                                            <Pencil />
                                        </button>
                                    }
                                >
                                    <input
                                        type="text"
                                        prop:value=name
                                        on:input=move |ev| name.set(event_target_value(&ev))
                                    />
                                    <button class="btn btn-primary" disabled=move || busy.get() on:click=on_save>
                                        <Save attr:class="icon-sm" />
                                        "Save"
                                    </button>
                                </Show>
                            </div>
                            <div class="profile-field">
                                <Mail attr:class="icon-sm" />
                                <span>{email}</span>
                            </div>
                            {move || row.get().and_then(|r| r.created_at).map(|created| view! {
                                <div class="profile-field">
                                    <Calendar attr:class="icon-sm" />
                                    <span>"Member since " {created.split('T').next().unwrap_or_default().to_string()}</span>
                                </div>
                            })}
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
