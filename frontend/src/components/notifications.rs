use crate::components::icons::{Bell, Calendar, CheckCircle, Star, Trash};
use chrono::{DateTime, Duration, Utc};
use leptos::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Reminder,
    Achievement,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    All,
    Unread,
    Reminder,
    Achievement,
}

impl NotificationFilter {
    pub const ALL: [NotificationFilter; 4] = [
        NotificationFilter::All,
        NotificationFilter::Unread,
        NotificationFilter::Reminder,
        NotificationFilter::Achievement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NotificationFilter::All => "All",
            NotificationFilter::Unread => "Unread",
            NotificationFilter::Reminder => "Reminders",
            NotificationFilter::Achievement => "Achievements",
        }
    }

    pub fn matches(&self, n: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !n.read,
            NotificationFilter::Reminder => n.kind == NotificationKind::Reminder,
            NotificationFilter::Achievement => n.kind == NotificationKind::Achievement,
        }
    }
}

/// The notification list and its operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inbox {
    items: Vec<Notification>,
}

impl Inbox {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn filtered(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.items.iter().filter(|n| filter.matches(n)).cloned().collect()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: Uuid) {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        self.items.iter_mut().for_each(|n| n.read = true);
    }

    pub fn delete(&mut self, id: Uuid) {
        self.items.retain(|n| n.id != id);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// "Just now", "5 minutes ago", "3 hours ago", "2 days ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let plural = |n: i64, unit: &str| {
        format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
    };
    if elapsed < Duration::minutes(1) {
        "Just now".to_string()
    } else if elapsed < Duration::hours(1) {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed < Duration::days(1) {
        plural(elapsed.num_hours(), "hour")
    } else {
        plural(elapsed.num_days(), "day")
    }
}

fn sample(now: DateTime<Utc>) -> Vec<Notification> {
    let item = |kind, title: &str, message: &str, ago: Duration, read| Notification {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        created_at: now - ago,
        read,
    };
    vec![
        item(
            NotificationKind::Reminder,
            "Study Session Reminder",
            "Your Mathematics session starts in 30 minutes.",
            Duration::minutes(5),
            false,
        ),
        item(
            NotificationKind::Achievement,
            "Quiz Master!",
            "You scored 100% on a Physics quiz. Keep it up!",
            Duration::hours(2),
            false,
        ),
        item(
            NotificationKind::Update,
            "New Resources Available",
            "Fresh Chemistry material has been added to the library.",
            Duration::days(1),
            true,
        ),
        item(
            NotificationKind::Achievement,
            "7-Day Streak",
            "You studied every day this week.",
            Duration::days(2),
            true,
        ),
        item(
            NotificationKind::Reminder,
            "Goal Deadline Approaching",
            "\"Finish Biology chapter 4\" is due tomorrow.",
            Duration::days(3),
            false,
        ),
    ]
}

#[component]
fn KindIcon(kind: NotificationKind) -> impl IntoView {
    match kind {
        NotificationKind::Reminder => view! { <Calendar /> }.into_any(),
        NotificationKind::Achievement => view! { <Star /> }.into_any(),
        NotificationKind::Update => view! { <Bell /> }.into_any(),
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let inbox = RwSignal::new(Inbox::new(sample(Utc::now())));
    let (filter, set_filter) = signal(NotificationFilter::All);

    view! {
        <div class="page-container notifications">
            <div class="page-header">
                <h1>
                    "Notifications "
                    <span class="badge">{move || inbox.with(|i| i.unread_count())}</span>
                </h1>
                <button
                    class="btn btn-secondary"
                    disabled=move || inbox.with(|i| i.unread_count() == 0)
                    on:click=move |_| inbox.update(|i| i.mark_all_read())
                >
                    <CheckCircle attr:class="icon-sm" />
                    "Mark all as read"
                </button>
            </div>

            <div class="filter-tabs">
                {NotificationFilter::ALL
                    .into_iter()
                    .map(|f| view! {
                        <button
                            class=move || if filter.get() == f { "filter-btn active" } else { "filter-btn" }
                            on:click=move |_| set_filter.set(f)
                        >
                            {f.label()}
                        </button>
                    })
                    .collect_view()}
            </div>

            <div class="notification-list">
                <For
                    each=move || inbox.with(|i| i.filtered(filter.get()))
                    key=|n| (n.id, n.read)
                    children=move |n| {
                        let id = n.id;
                        let class = if n.read { "notification-item" } else { "notification-item unread" };
                        view! {
                            <div class=class on:click=move |_| inbox.update(|i| i.mark_read(id))>
                                <div class="notification-icon"><KindIcon kind=n.kind /></div>
                                <div class="notification-content">
                                    <h3>{n.title}</h3>
                                    <p>{n.message}</p>
                                    <span class="notification-time">{relative_time(n.created_at, Utc::now())}</span>
                                </div>
                                <button
                                    class="btn-icon"
                                    aria-label="Delete notification"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        inbox.update(|i| i.delete(id));
                                    }
                                >
                                    <Trash />
                                </button>
                            </div>
                        }
                    }
                />
                <Show when=move || inbox.with(|i| i.filtered(filter.get()).is_empty())>
                    <p class="empty-state">"No notifications here."</p>
                </Show>
            </div>
        </div>
    }
}
