use crate::components::icons::{BookOpen, Bot, Brain, Shield};
use crate::web::router::Link;
use leptos::prelude::*;

const VALUES: [(&str, &str); 3] = [
    (
        "Personalized",
        "Explanations adapt to the questions you ask and the level you pick.",
    ),
    (
        "Always available",
        "Study whenever it suits you. The tutor never sleeps.",
    ),
    (
        "Private",
        "Your account data stays yours. Sign out at any time from Settings.",
    ),
];

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="page-container about">
            <section class="about-hero">
                <h1>"About AI Tutor"</h1>
                <p>
                    "AI Tutor is a study companion that answers questions in plain language and \
                     turns any subject into a short practice quiz."
                </p>
            </section>

            <section class="about-how">
                <h2>"How it works"</h2>
                <div class="about-steps">
                    <div class="about-step">
                        <Bot />
                        <h3>"Ask"</h3>
                        <p>"Type a question in the chat and get an explanation back."</p>
                    </div>
                    <div class="about-step">
                        <Brain />
                        <h3>"Practice"</h3>
                        <p>"Generate a five-question quiz on a subject and difficulty of your choice."</p>
                    </div>
                    <div class="about-step">
                        <BookOpen />
                        <h3>"Review"</h3>
                        <p>"See which answers were right and read why."</p>
                    </div>
                </div>
            </section>

            <section class="about-values">
                <h2>"What we care about"</h2>
                <ul>
                    {VALUES
                        .iter()
                        .map(|(title, text)| view! {
                            <li>
                                <Shield attr:class="icon-sm" />
                                <strong>{*title}</strong>
                                " "
                                {*text}
                            </li>
                        })
                        .collect_view()}
                </ul>
            </section>

            <section class="about-cta">
                <Link to="/signup" class="btn btn-primary">"Create a free account"</Link>
            </section>
        </div>
    }
}
