//! AI Tutor front-end
//!
//! Context-driven layout:
//! - `web::route`: route table and guard rules (pure)
//! - `web::router`: history handling and the guard effect
//! - `auth`: reactive session context over the core `SessionHolder`
//! - `components`: pages and layout

mod api;
mod auth;
mod components {
    pub mod about;
    pub mod auth_pages;
    pub mod chat;
    pub mod home;
    pub mod icons;
    pub mod layout;
    pub mod notifications;
    pub mod profile;
    pub mod quiz;
    pub mod reminders;
    pub mod resources;
    pub mod settings;
}
mod logging;
mod panic_hook;
pub(crate) mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::about::AboutPage;
use crate::components::auth_pages::{
    ForgotPasswordPage, ResetPasswordPage, SignInPage, SignUpPage,
};
use crate::components::home::HomePage;
use crate::components::layout::{Footer, Header};
use crate::components::notifications::NotificationsPage;
use crate::components::profile::ProfilePage;
use crate::components::reminders::RemindersPage;
use crate::components::resources::ResourcesPage;
use crate::components::settings::{SettingsPage, apply_saved_theme};

use leptos::prelude::*;
use tracing::info;
use tutor::ClientConfig;

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::About => view! { <AboutPage /> }.into_any(),
        AppRoute::SignIn => view! { <SignInPage /> }.into_any(),
        AppRoute::SignUp => view! { <SignUpPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword => view! { <ResetPasswordPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
        AppRoute::Notifications => view! { <NotificationsPage /> }.into_any(),
        AppRoute::Reminders => view! { <RemindersPage /> }.into_any(),
        AppRoute::Resources => view! { <ResourcesPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="page-container not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
                <Link to="/" class="btn btn-primary">"Back to home"</Link>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(config.clone());

    init_auth(&auth_ctx, &config);
    apply_saved_theme();

    let guard = auth_ctx.guard_state();

    view! {
        <Router guard=guard>
            <div class="App">
                <Header />
                <main class="main-content">
                    <RouterOutlet matcher=route_matcher />
                </main>
                <Footer />
            </div>
        </Router>
    }
}

/// Browser entry point: hooks, logging, then the app.
pub fn start() {
    panic_hook::install();
    let config = api::load_config();
    logging::init(config.log_level);
    info!(api = %config.api_base_url, auth = config.auth_enabled(), "starting AI Tutor");

    mount_to_body(move || view! { <App config=config /> });
}
