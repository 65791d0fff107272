use crate::api::use_tutor_client;
use crate::auth::use_auth;
use crate::components::icons::{Close, LogOut, Menu};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;
use tutor::HealthApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiStatus {
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    fn label(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "Checking tutor service...",
            ApiStatus::Online => "Tutor service online",
            ApiStatus::Offline => "Tutor service unavailable",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "api-status checking",
            ApiStatus::Online => "api-status online",
            ApiStatus::Offline => "api-status offline",
        }
    }
}

/// Header links for the current session state.
pub fn nav_links(signed_in: bool) -> &'static [(&'static str, &'static str)] {
    if signed_in {
        &[
            ("/", "Home"),
            ("/about", "About"),
            ("/profile", "Profile"),
            ("/settings", "Settings"),
        ]
    } else {
        &[
            ("/", "Home"),
            ("/about", "About"),
            ("/signin", "Sign In"),
            ("/signup", "Sign Up"),
        ]
    }
}

#[component]
fn NavList(#[prop(into)] class: String, on_navigate: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let signed_in = auth.is_authenticated();

    let on_logout = move |_| {
        auth.logout();
        on_navigate.run(());
    };

    view! {
        <ul class=class>
            {move || {
                nav_links(signed_in.get())
                    .iter()
                    .map(|(path, label)| {
                        let path = *path;
                        let class = Signal::derive(move || {
                            if router.current_route().get().to_path() == path {
                                "active".to_string()
                            } else {
                                String::new()
                            }
                        });
                        view! {
                            <li>
                                <Link to=path class=class on_navigate=on_navigate>
                                    {*label}
                                </Link>
                            </li>
                        }
                    })
                    .collect_view()
            }}
            <Show when=move || signed_in.get()>
                <li>
                    <button class="logout-btn" on:click=on_logout>
                        <LogOut attr:class="icon-sm" />
                        "Logout"
                    </button>
                </li>
            </Show>
        </ul>
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let (menu_open, set_menu_open) = signal(false);
    let close_menu = Callback::new(move |_| set_menu_open.set(false));

    view! {
        <header class="header">
            <div class="header-content">
                <Link to="/" class="logo">"🧠 AI Tutor"</Link>

                <nav class="nav-desktop">
                    <NavList class="nav-links" on_navigate=close_menu />
                </nav>

                <button
                    class="mobile-menu-btn"
                    aria-label="Toggle menu"
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    {move || if menu_open.get() {
                        view! { <Close /> }.into_any()
                    } else {
                        view! { <Menu /> }.into_any()
                    }}
                </button>
            </div>

            <Show when=move || menu_open.get()>
                <nav class="nav-mobile">
                    <NavList class="nav-links-mobile" on_navigate=close_menu />
                </nav>
            </Show>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let (status, set_status) = signal(ApiStatus::Checking);

    let client = use_tutor_client();
    spawn_local(async move {
        let next = match HealthApi::new(&client).check().await {
            Ok(health) if health.is_healthy() => ApiStatus::Online,
            Ok(health) => {
                warn!(status = %health.status, "tutor service reports degraded health");
                ApiStatus::Offline
            }
            Err(e) => {
                warn!(error = %e, "health check failed");
                ApiStatus::Offline
            }
        };
        set_status.set(next);
    });

    view! {
        <footer class="footer">
            <div class="footer-content">
                <div class="footer-section">
                    <h3>"🧠 AI Tutor"</h3>
                    <p>"Your intelligent learning companion"</p>
                </div>

                <div class="footer-section">
                    <h4>"Quick Links"</h4>
                    <ul>
                        <li><Link to="/">"Home"</Link></li>
                        <li><Link to="/about">"About"</Link></li>
                        <li><Link to="/resources">"Resources"</Link></li>
                        <li><Link to="/signin">"Sign In"</Link></li>
                        <li><Link to="/signup">"Sign Up"</Link></li>
                    </ul>
                </div>

                <div class="footer-section">
                    <h4>"Study Tools"</h4>
                    <ul>
                        <li><Link to="/reminders">"Reminders & Goals"</Link></li>
                        <li><Link to="/notifications">"Notifications"</Link></li>
                    </ul>
                </div>
            </div>

            <div class="footer-bottom">
                <p>"© 2024 AI Tutor"</p>
                <p class=move || status.get().class()>
                    {move || status.get().label()}
                </p>
            </div>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_links_follow_session() {
        let out: Vec<_> = nav_links(false).iter().map(|(_, l)| *l).collect();
        assert_eq!(out, ["Home", "About", "Sign In", "Sign Up"]);

        let signed_in: Vec<_> = nav_links(true).iter().map(|(p, _)| *p).collect();
        assert_eq!(signed_in, ["/", "/about", "/profile", "/settings"]);
    }
}
