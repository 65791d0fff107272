//! Router service
//!
//! Owns every `window.history` call. The current route lives in a signal; an
//! effect re-runs the guard whenever the route or the session changes, so a
//! logout on a protected page redirects without the page doing anything.

use leptos::prelude::*;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardState, RouteDecision, evaluate};

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Location fragment without the leading `#`, empty when there is none.
pub fn current_fragment() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .map(|h| h.trim_start_matches('#').to_string())
        .unwrap_or_default()
}

/// `origin + path`, used as the redirect target for provider mails and OAuth.
pub fn absolute_url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}{}", origin, path)
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Drops the fragment from the address bar once its token has been read.
pub fn clear_fragment() {
    replace_history_state(&current_path());
}

/// Full page load of `url`. The app starts over and rehydrates from storage.
pub fn hard_redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    guard: Signal<GuardState>,
}

impl RouterService {
    fn new(guard: Signal<GuardState>) -> Self {
        Self {
            current_route: RwSignal::new(AppRoute::from_path(&current_path())),
            guard,
        }
    }

    pub fn current_route(&self) -> Signal<AppRoute> {
        self.current_route.into()
    }

    /// Pushes `path` and switches the page. The guard effect takes it from there.
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        debug!(%target, "navigate");
        push_history_state(path);
        self.current_route.set(target);
    }

    fn redirect(&self, target: AppRoute) {
        replace_history_state(target.to_path());
        self.current_route.set(target);
    }

    fn init_popstate_listener(&self) {
        let current_route = self.current_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            current_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // listener lives as long as the page
        closure.forget();
    }

    fn setup_title(&self) {
        let current_route = self.current_route;

        Effect::new(move |_| {
            let title = format!("{} | AI Tutor", current_route.get().title());
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.set_title(&title);
            }
        });
    }

    fn setup_guard(&self) {
        let router = *self;

        Effect::new(move |_| {
            let route = router.current_route.get();
            let guard = router.guard.get();

            if let RouteDecision::Redirect(target) = evaluate(route, guard) {
                info!(from = %route, to = %target, ?guard, "route guard redirect");
                router.redirect(target);
            }
        });
    }
}

fn provide_router(guard: Signal<GuardState>) -> RouterService {
    let router = RouterService::new(guard);
    router.init_popstate_listener();
    router.setup_guard();
    router.setup_title();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(guard: Signal<GuardState>, children: Children) -> impl IntoView {
    provide_router(guard);
    children()
}

/// Renders the page for the current route once the guard lets it through.
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let route = router.current_route.get();
        match evaluate(route, router.guard.get()) {
            RouteDecision::Render => matcher(route),
            RouteDecision::Wait | RouteDecision::Redirect(_) => ().into_any(),
        }
    }
}

/// In-app link: pushes history instead of reloading the page.
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: Signal<String>,
    #[prop(optional, into)] on_navigate: Option<Callback<()>>,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
        if let Some(cb) = on_navigate {
            cb.run(());
        }
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
