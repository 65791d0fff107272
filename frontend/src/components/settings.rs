use crate::auth::use_auth;
use crate::components::icons::{Bell, LogOut, Mail, Palette, Save};
use crate::web::router::use_router;
use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use tutor_shared::STORAGE_SETTINGS_KEY;

/// Account preferences kept in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub notifications: bool,
    pub email_updates: bool,
    pub dark_mode: bool,
    pub auto_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            email_updates: false,
            dark_mode: false,
            auto_save: true,
        }
    }
}

impl Settings {
    pub fn theme(&self) -> &'static str {
        if self.dark_mode { "dark" } else { "light" }
    }

    fn load() -> Self {
        match LocalStorage::get::<Settings>(STORAGE_SETTINGS_KEY) {
            Ok(settings) => settings,
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Settings::default(),
            Err(e) => {
                warn!(error = %e, "stored settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    fn save(&self) -> Result<(), gloo_storage::errors::StorageError> {
        LocalStorage::set(STORAGE_SETTINGS_KEY, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Notifications,
    EmailUpdates,
    DarkMode,
    AutoSave,
}

impl Toggle {
    fn get(self, s: &Settings) -> bool {
        match self {
            Toggle::Notifications => s.notifications,
            Toggle::EmailUpdates => s.email_updates,
            Toggle::DarkMode => s.dark_mode,
            Toggle::AutoSave => s.auto_save,
        }
    }

    fn flip(self, s: &mut Settings) {
        let slot = match self {
            Toggle::Notifications => &mut s.notifications,
            Toggle::EmailUpdates => &mut s.email_updates,
            Toggle::DarkMode => &mut s.dark_mode,
            Toggle::AutoSave => &mut s.auto_save,
        };
        *slot = !*slot;
    }
}

fn apply_theme(settings: &Settings) {
    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        if let Err(e) = root.set_attribute("data-theme", settings.theme()) {
            warn!(error = ?e, "could not apply theme");
        }
    }
}

/// Applies the stored theme before the first page renders.
pub fn apply_saved_theme() {
    apply_theme(&Settings::load());
}

#[component]
fn ToggleRow(
    settings: RwSignal<Settings>,
    toggle: Toggle,
    title: &'static str,
    description: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="setting-item">
            <div class="setting-icon">{children()}</div>
            <div class="setting-info">
                <h3>{title}</h3>
                <p>{description}</p>
            </div>
            <label class="switch">
                <input
                    type="checkbox"
                    prop:checked=move || settings.with(|s| toggle.get(s))
                    on:change=move |_| settings.update(|s| toggle.flip(s))
                />
                <span class="slider"></span>
            </label>
        </div>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let settings = RwSignal::new(Settings::load());
    let (status, set_status) = signal(Option::<(String, bool)>::None);

    let persist = move |s: &Settings| match s.save() {
        Ok(()) => set_status.set(Some(("Settings saved!".to_string(), false))),
        Err(e) => {
            error!(error = %e, "could not save settings");
            set_status.set(Some(("Could not save settings.".to_string(), true)));
        }
    };

    // theme follows the toggle immediately; auto-save persists every change
    Effect::new(move |prev: Option<Settings>| {
        let current = settings.get();
        apply_theme(&current);
        if prev.is_some_and(|p| p != current) && current.auto_save {
            persist(&current);
        }
        current
    });

    let on_sign_out = move |_| {
        auth.logout();
        router.navigate("/");
    };

    view! {
        <div class="page-container settings">
            <h1>"Settings"</h1>

            {move || status.get().map(|(text, is_error)| {
                let class = if is_error { "alert alert-error" } else { "alert alert-success" };
                view! { <div class=class>{text}</div> }
            })}

            <section class="settings-section">
                <h2>"Preferences"</h2>
                <ToggleRow
                    settings=settings
                    toggle=Toggle::Notifications
                    title="Push Notifications"
                    description="Get reminders about study sessions and goals."
                >
                    <Bell />
                </ToggleRow>
                <ToggleRow
                    settings=settings
                    toggle=Toggle::EmailUpdates
                    title="Email Updates"
                    description="Receive weekly progress summaries by email."
                >
                    <Mail />
                </ToggleRow>
                <ToggleRow
                    settings=settings
                    toggle=Toggle::DarkMode
                    title="Dark Mode"
                    description="Use a darker color scheme."
                >
                    <Palette />
                </ToggleRow>
                <ToggleRow
                    settings=settings
                    toggle=Toggle::AutoSave
                    title="Auto-save"
                    description="Save changes to these settings as you make them."
                >
                    <Save />
                </ToggleRow>
            </section>

            <div class="settings-actions">
                <button class="btn btn-primary" on:click=move |_| persist(&settings.get_untracked())>
                    <Save attr:class="icon-sm" />
                    "Save Settings"
                </button>
                <button class="btn btn-danger" on:click=on_sign_out>
                    <LogOut attr:class="icon-sm" />
                    "Sign Out"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_partial_records() {
        let s: Settings = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        assert!(s.dark_mode);
        assert!(s.notifications);
        assert!(s.auto_save);
        assert!(!s.email_updates);
        assert_eq!(s.theme(), "dark");
    }

    #[test]
    fn toggles_flip_one_field() {
        let mut s = Settings::default();
        Toggle::EmailUpdates.flip(&mut s);
        assert!(Toggle::EmailUpdates.get(&s));
        assert_eq!(
            s,
            Settings {
                email_updates: true,
                ..Settings::default()
            }
        );
    }
}
