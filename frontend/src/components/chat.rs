use crate::api::{tutor_client, use_config};
use crate::auth::use_auth;
use crate::components::icons::{Bot, SendArrow, UserIcon};
use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tutor::ChatApi;
use tutor::chat::ChatTranscript;
use tutor_shared::{ChatFailure, ChatMessage, Role};

fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

fn failure_tag(failure: ChatFailure) -> &'static str {
    match failure {
        ChatFailure::Offline => "offline",
        ChatFailure::Server => "server error",
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let is_user = message.role == Role::User;
    let class = if is_user { "message user" } else { "message assistant" };

    view! {
        <div class=class>
            <div class="message-avatar">
                {if is_user {
                    view! { <UserIcon /> }.into_any()
                } else {
                    view! { <Bot /> }.into_any()
                }}
            </div>
            <div class="message-body">
                <p class="message-content">{message.content}</p>
                <div class="message-meta">
                    <span class="message-time">{format_time(message.timestamp)}</span>
                    {message.failure.map(|f| view! {
                        <span class="message-failure">{failure_tag(f)}</span>
                    })}
                </div>
            </div>
        </div>
    }
}

/// Chat with the tutor. One question in flight at a time.
#[component]
pub fn ChatWidget() -> impl IntoView {
    let auth = use_auth();
    let config = StoredValue::new(use_config());
    let transcript = RwSignal::new(ChatTranscript::new());
    let (input, set_input) = signal(String::new());

    let can_send = move || transcript.with(|t| t.can_send(&input.get()));

    let send = move || {
        let Some(question) = transcript.try_update(|t| t.begin(&input.get_untracked())).flatten()
        else {
            return;
        };
        set_input.set(String::new());

        let user_id = auth.user_untracked().map(|u| u.id);
        let client = config.with_value(|c| tutor_client(c, auth));
        spawn_local(async move {
            let result = ChatApi::new(&client)
                .ask(&question, None, user_id.as_deref())
                .await;
            transcript.update(|t| {
                t.resolve(result);
            });
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        send();
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="chat-container">
            <div class="chat-header">
                <Bot attr:class="icon" />
                <h2>"AI Tutor Chat"</h2>
            </div>

            <div class="chat-messages">
                <For
                    each=move || transcript.with(|t| t.messages().to_vec())
                    key=|m| m.id
                    children=|m| view! { <MessageBubble message=m /> }
                />
                <Show when=move || transcript.with(|t| t.is_pending())>
                    <div class="message assistant typing">
                        <div class="message-avatar"><Bot /></div>
                        <p class="message-content">"Thinking..."</p>
                    </div>
                </Show>
            </div>

            <form class="chat-input-form" on:submit=on_submit>
                <textarea
                    class="chat-input"
                    rows="2"
                    placeholder="Ask me anything about your studies..."
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=move || transcript.with(|t| t.is_pending())
                ></textarea>
                <button type="submit" class="btn btn-primary send-btn" disabled=move || !can_send()>
                    <SendArrow />
                </button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_tags_are_distinct() {
        assert_ne!(failure_tag(ChatFailure::Offline), failure_tag(ChatFailure::Server));
    }
}
