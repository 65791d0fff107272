use crate::auth::use_auth;
use crate::components::chat::ChatWidget;
use crate::components::icons::{BookOpen, Bot, Brain, Target};
use crate::components::quiz::QuizWidget;
use crate::web::router::Link;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Chat,
    Quiz,
}

#[component]
fn FeatureCard(title: &'static str, text: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="feature-card">
            <div class="feature-icon">{children()}</div>
            <h3>{title}</h3>
            <p>{text}</p>
        </div>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let (tab, set_tab) = signal(Tab::Chat);

    let tab_class = move |t: Tab| {
        if tab.get() == t { "tab-btn active" } else { "tab-btn" }
    };

    let greeting = move || {
        auth.user()
            .get()
            .map(|u| format!("Welcome back, {}!", u.label()))
    };

    view! {
        <div class="home">
            <section class="hero">
                <h1>"Learn Smarter with Your AI Tutor"</h1>
                <p class="hero-subtitle">
                    "Ask questions, get clear explanations and test yourself with quizzes generated for your level."
                </p>
                {move || match greeting() {
                    Some(text) => view! { <p class="hero-greeting">{text}</p> }.into_any(),
                    None => view! {
                        <div class="hero-actions">
                            <Link to="/signup" class="btn btn-primary">"Get Started"</Link>
                            <Link to="/about" class="btn btn-secondary">"Learn More"</Link>
                        </div>
                    }
                    .into_any(),
                }}
            </section>

            <section class="features">
                <FeatureCard title="AI Chat" text="Ask anything and get step-by-step explanations.">
                    <Bot />
                </FeatureCard>
                <FeatureCard title="Smart Quizzes" text="Practice with quizzes tuned to your subject and difficulty.">
                    <Brain />
                </FeatureCard>
                <FeatureCard title="Study Resources" text="Browse curated material for every level.">
                    <BookOpen />
                </FeatureCard>
                <FeatureCard title="Goals & Reminders" text="Plan sessions and track your progress.">
                    <Target />
                </FeatureCard>
            </section>

            <section class="learning-area">
                <div class="tabs">
                    <button class=move || tab_class(Tab::Chat) on:click=move |_| set_tab.set(Tab::Chat)>
                        "Chat with Tutor"
                    </button>
                    <button class=move || tab_class(Tab::Quiz) on:click=move |_| set_tab.set(Tab::Quiz)>
                        "Take a Quiz"
                    </button>
                </div>
                {move || match tab.get() {
                    Tab::Chat => view! { <ChatWidget /> }.into_any(),
                    Tab::Quiz => view! { <QuizWidget /> }.into_any(),
                }}
            </section>
        </div>
    }
}
