use crate::api::{tutor_client, use_config};
use crate::auth::use_auth;
use crate::components::icons::{Brain, CheckCircle, RotateCcw, XCircle};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tutor::QuizApi;
use tutor::quiz::{QuizAttempt, QuizSession, QuizStage, SUBJECTS};
use tutor_shared::Difficulty;

/// Headline under the score.
fn result_message(percentage: u32) -> &'static str {
    match percentage {
        80.. => "Excellent work!",
        60..80 => "Good job! Keep it up.",
        _ => "Keep practicing, you'll get there!",
    }
}

#[component]
fn QuizSetup(session: RwSignal<QuizSession>, on_generate: Callback<()>) -> impl IntoView {
    let loading = move || session.with(|s| s.is_loading());

    view! {
        <div class="quiz-setup">
            <div class="form-group">
                <label for="quiz-subject">"Subject"</label>
                <select
                    id="quiz-subject"
                    on:change=move |ev| session.update(|s| s.set_subject(&event_target_value(&ev)))
                >
                    <option value="" selected=move || session.with(|s| s.subject.is_empty())>
                        "Select a subject"
                    </option>
                    {SUBJECTS
                        .iter()
                        .map(|name| {
                            let value = name.to_lowercase();
                            let current = value.clone();
                            view! {
                                <option
                                    value=value
                                    selected=move || session.with(|s| s.subject == current)
                                >
                                    {*name}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="form-group">
                <label for="quiz-difficulty">"Difficulty"</label>
                <select
                    id="quiz-difficulty"
                    on:change=move |ev| {
                        if let Ok(d) = event_target_value(&ev).parse::<Difficulty>() {
                            session.update(|s| s.difficulty = d);
                        }
                    }
                >
                    {Difficulty::ALL
                        .into_iter()
                        .map(|d| view! {
                            <option
                                value=d.as_str()
                                selected=move || session.with(|s| s.difficulty == d)
                            >
                                {d.label()}
                            </option>
                        })
                        .collect_view()}
                </select>
            </div>

            {move || session.with(|s| s.error().map(|e| view! {
                <div class="alert alert-error">{e.to_string()}</div>
            }))}

            <button
                class="btn btn-primary"
                disabled=loading
                on:click=move |_| on_generate.run(())
            >
                {move || if loading() { "Generating..." } else { "Generate Quiz" }}
            </button>
        </div>
    }
}

#[component]
fn QuizQuestionView(session: RwSignal<QuizSession>) -> impl IntoView {
    let attempt = move |f: fn(&QuizAttempt) -> bool| session.with(|s| s.attempt().is_some_and(f));

    view! {
        <div class="quiz-question">
            <p class="quiz-progress">
                {move || session.with(|s| s.attempt().map(|a| a.progress_label()).unwrap_or_default())}
            </p>
            <h3>
                {move || session.with(|s| {
                    s.attempt()
                        .and_then(|a| a.current_question())
                        .map(|q| q.question.clone())
                        .unwrap_or_default()
                })}
            </h3>

            <div class="quiz-options">
                {move || {
                    let options = session.with(|s| {
                        s.attempt()
                            .and_then(|a| a.current_question())
                            .map(|q| q.options.clone())
                            .unwrap_or_default()
                    });
                    options
                        .into_iter()
                        .map(|option| {
                            let chosen = option.clone();
                            let picked = option.clone();
                            let class = move || {
                                let selected = session.with(|s| {
                                    s.attempt()
                                        .and_then(|a| a.selection(a.current_index()))
                                        .is_some_and(|sel| sel == chosen)
                                });
                                if selected { "quiz-option selected" } else { "quiz-option" }
                            };
                            view! {
                                <button
                                    class=class
                                    on:click=move |_| session.update(|s| {
                                        if let Some(a) = s.attempt_mut() {
                                            a.select_current(&picked);
                                        }
                                    })
                                >
                                    {option}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="quiz-nav">
                <button
                    class="btn btn-secondary"
                    disabled=move || attempt(|a| a.is_first())
                    on:click=move |_| session.update(|s| {
                        if let Some(a) = s.attempt_mut() {
                            a.previous();
                        }
                    })
                >
                    "Previous"
                </button>
                <Show
                    when=move || attempt(|a| a.is_last())
                    fallback=move || view! {
                        <button
                            class="btn btn-primary"
                            on:click=move |_| session.update(|s| {
                                if let Some(a) = s.attempt_mut() {
                                    a.next();
                                }
                            })
                        >
                            "Next"
                        </button>
                    }
                >
                    <button
                        class="btn btn-primary"
                        disabled=move || !attempt(|a| a.can_submit())
                        on:click=move |_| session.update(|s| {
                            if let Some(a) = s.attempt_mut() {
                                a.submit();
                            }
                        })
                    >
                        "Submit Quiz"
                    </button>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn QuizResults(session: RwSignal<QuizSession>, on_generate: Callback<()>) -> impl IntoView {
    let score_line = move || {
        session.with(|s| {
            s.attempt()
                .map(|a| format!("{} / {}", a.score().unwrap_or(0), a.len()))
                .unwrap_or_default()
        })
    };
    let pct = move || session.with(|s| s.attempt().and_then(|a| a.percentage()).unwrap_or(0));

    view! {
        <div class="quiz-results">
            <h3>"Quiz Complete!"</h3>
            <div class="score-display">
                <span class="score">{score_line}</span>
                <span class="percentage">{move || format!("{}%", pct())}</span>
            </div>
            <p class="result-message">{move || result_message(pct())}</p>

            <div class="quiz-review">
                {move || session.with(|s| {
                    s.attempt()
                        .map(|a| a.review())
                        .unwrap_or_default()
                        .into_iter()
                        .map(|item| {
                            let class = if item.is_correct { "review-item correct" } else { "review-item incorrect" };
                            view! {
                                <div class=class>
                                    <div class="review-header">
                                        {if item.is_correct {
                                            view! { <CheckCircle /> }.into_any()
                                        } else {
                                            view! { <XCircle /> }.into_any()
                                        }}
                                        <span>{format!("{}. {}", item.number, item.question)}</span>
                                    </div>
                                    <p>"Your answer: " {item.selected_label().to_string()}</p>
                                    <p>"Correct answer: " {item.correct_answer.clone()}</p>
                                    {item.explanation.clone().map(|e| view! {
                                        <p class="explanation">{e}</p>
                                    })}
                                </div>
                            }
                        })
                        .collect_view()
                })}
            </div>

            <div class="quiz-actions">
                <button
                    class="btn btn-secondary"
                    on:click=move |_| session.update(|s| {
                        if let Some(a) = s.attempt_mut() {
                            a.retake();
                        }
                    })
                >
                    <RotateCcw />
                    "Retake Quiz"
                </button>
                <button class="btn btn-primary" on:click=move |_| on_generate.run(())>
                    "New Quiz"
                </button>
            </div>
        </div>
    }
}

/// Quiz generator: setup, one question at a time, then the scored review.
#[component]
pub fn QuizWidget() -> impl IntoView {
    let auth = use_auth();
    let config = StoredValue::new(use_config());
    let session = RwSignal::new(QuizSession::new());

    let on_generate = Callback::new(move |_| {
        let Some(req) = session.try_update(|s| s.begin_generation()).flatten() else {
            return;
        };
        let client = config.with_value(|c| tutor_client(c, auth));
        spawn_local(async move {
            let result = QuizApi::new(&client)
                .generate(&req.topic, req.difficulty, req.num_questions)
                .await;
            session.update(|s| s.finish_generation(result));
        });
    });

    view! {
        <div class="quiz-container">
            <div class="quiz-header">
                <Brain attr:class="icon" />
                <h2>"Quiz Generator"</h2>
            </div>
            {move || match session.with(|s| s.stage()) {
                QuizStage::Setup => view! { <QuizSetup session=session on_generate=on_generate /> }.into_any(),
                QuizStage::InProgress => view! { <QuizQuestionView session=session /> }.into_any(),
                QuizStage::Results => view! { <QuizResults session=session on_generate=on_generate /> }.into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_message_bands() {
        assert_eq!(result_message(100), "Excellent work!");
        assert_eq!(result_message(80), "Excellent work!");
        assert_eq!(result_message(60), "Good job! Keep it up.");
        assert_eq!(result_message(40), "Keep practicing, you'll get there!");
    }
}
