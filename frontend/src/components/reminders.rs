use crate::components::icons::{Calendar, CheckCircle, Plus, Target, Trash};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use leptos::prelude::*;
use uuid::Uuid;

const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub due: NaiveDateTime,
    pub completed: bool,
}

impl Reminder {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub deadline: NaiveDate,
    /// Percent complete, 0..=100.
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderFilter {
    All,
    Pending,
    Overdue,
    Completed,
}

impl ReminderFilter {
    pub const ALL: [ReminderFilter; 4] = [
        ReminderFilter::All,
        ReminderFilter::Pending,
        ReminderFilter::Overdue,
        ReminderFilter::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderFilter::All => "All",
            ReminderFilter::Pending => "Pending",
            ReminderFilter::Overdue => "Overdue",
            ReminderFilter::Completed => "Completed",
        }
    }

    pub fn matches(&self, r: &Reminder, now: NaiveDateTime) -> bool {
        match self {
            ReminderFilter::All => true,
            ReminderFilter::Pending => !r.completed && !r.is_overdue(now),
            ReminderFilter::Overdue => r.is_overdue(now),
            ReminderFilter::Completed => r.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("Please enter a title")]
    MissingTitle,
    #[error("Please pick a valid date")]
    InvalidDate,
}

/// Reminders and study goals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Planner {
    reminders: Vec<Reminder>,
    goals: Vec<Goal>,
}

impl Planner {
    pub fn reminders(&self, filter: ReminderFilter, now: NaiveDateTime) -> Vec<Reminder> {
        let mut out: Vec<_> = self
            .reminders
            .iter()
            .filter(|r| filter.matches(r, now))
            .cloned()
            .collect();
        out.sort_by_key(|r| r.due);
        out
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Parses the form values and appends a reminder.
    pub fn add_reminder(&mut self, title: &str, subject: &str, due: &str) -> Result<Uuid, PlannerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::MissingTitle);
        }
        let due = NaiveDateTime::parse_from_str(due.trim(), DATETIME_INPUT_FORMAT)
            .map_err(|_| PlannerError::InvalidDate)?;
        let id = Uuid::new_v4();
        self.reminders.push(Reminder {
            id,
            title: title.to_string(),
            subject: subject.trim().to_string(),
            due,
            completed: false,
        });
        Ok(id)
    }

    pub fn add_goal(&mut self, title: &str, deadline: &str) -> Result<Uuid, PlannerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::MissingTitle);
        }
        let deadline = NaiveDate::parse_from_str(deadline.trim(), "%Y-%m-%d")
            .map_err(|_| PlannerError::InvalidDate)?;
        let id = Uuid::new_v4();
        self.goals.push(Goal {
            id,
            title: title.to_string(),
            deadline,
            progress: 0,
        });
        Ok(id)
    }

    pub fn toggle_reminder(&mut self, id: Uuid) {
        if let Some(r) = self.reminders.iter_mut().find(|r| r.id == id) {
            r.completed = !r.completed;
        }
    }

    pub fn delete_reminder(&mut self, id: Uuid) {
        self.reminders.retain(|r| r.id != id);
    }

    pub fn set_goal_progress(&mut self, id: Uuid, progress: u8) {
        if let Some(g) = self.goals.iter_mut().find(|g| g.id == id) {
            g.progress = progress.min(100);
        }
    }

    pub fn delete_goal(&mut self, id: Uuid) {
        self.goals.retain(|g| g.id != id);
    }

    /// Mean goal progress, rounded. Zero without goals.
    pub fn average_progress(&self) -> u8 {
        if self.goals.is_empty() {
            return 0;
        }
        let total: u32 = self.goals.iter().map(|g| u32::from(g.progress)).sum();
        (total as f64 / self.goals.len() as f64).round() as u8
    }

    pub fn count(&self, filter: ReminderFilter, now: NaiveDateTime) -> usize {
        self.reminders.iter().filter(|r| filter.matches(r, now)).count()
    }
}

fn sample(now: NaiveDateTime) -> Planner {
    let reminder = |title: &str, subject: &str, due, completed| Reminder {
        id: Uuid::new_v4(),
        title: title.to_string(),
        subject: subject.to_string(),
        due,
        completed,
    };
    let goal = |title: &str, days: i64, progress| Goal {
        id: Uuid::new_v4(),
        title: title.to_string(),
        deadline: (now + Duration::days(days)).date(),
        progress,
    };
    Planner {
        reminders: vec![
            reminder("Review algebra notes", "Mathematics", now + Duration::hours(3), false),
            reminder("Physics problem set", "Physics", now - Duration::days(1), false),
            reminder("Read history chapter 5", "History", now - Duration::days(2), true),
            reminder("Practice essay outline", "English", now + Duration::days(2), false),
        ],
        goals: vec![
            goal("Finish calculus unit", 14, 60),
            goal("Score 80% on chemistry quizzes", 30, 35),
        ],
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[component]
fn AddReminderForm(planner: RwSignal<Planner>) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let due = RwSignal::new(String::new());
    let (error_msg, set_error) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let result = planner
            .try_update(|p| p.add_reminder(&title.get_untracked(), &subject.get_untracked(), &due.get_untracked()))
            .unwrap_or(Err(PlannerError::MissingTitle));
        match result {
            Ok(_) => {
                title.set(String::new());
                subject.set(String::new());
                due.set(String::new());
                set_error.set(None);
            }
            Err(e) => set_error.set(Some(e.to_string())),
        }
    };

    view! {
        <form class="planner-form" on:submit=on_submit>
            <h3>"New Reminder"</h3>
            {move || error_msg.get().map(|e| view! { <div class="alert alert-error">{e}</div> })}
            <input
                type="text"
                placeholder="What do you need to do?"
                prop:value=title
                on:input=move |ev| title.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Subject"
                prop:value=subject
                on:input=move |ev| subject.set(event_target_value(&ev))
            />
            <input
                type="datetime-local"
                prop:value=due
                on:input=move |ev| due.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-primary">
                <Plus attr:class="icon-sm" />
                "Add Reminder"
            </button>
        </form>
    }
}

#[component]
fn AddGoalForm(planner: RwSignal<Planner>) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let deadline = RwSignal::new(String::new());
    let (error_msg, set_error) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let result = planner
            .try_update(|p| p.add_goal(&title.get_untracked(), &deadline.get_untracked()))
            .unwrap_or(Err(PlannerError::MissingTitle));
        match result {
            Ok(_) => {
                title.set(String::new());
                deadline.set(String::new());
                set_error.set(None);
            }
            Err(e) => set_error.set(Some(e.to_string())),
        }
    };

    view! {
        <form class="planner-form" on:submit=on_submit>
            <h3>"New Goal"</h3>
            {move || error_msg.get().map(|e| view! { <div class="alert alert-error">{e}</div> })}
            <input
                type="text"
                placeholder="What do you want to achieve?"
                prop:value=title
                on:input=move |ev| title.set(event_target_value(&ev))
            />
            <input
                type="date"
                prop:value=deadline
                on:input=move |ev| deadline.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-primary">
                <Plus attr:class="icon-sm" />
                "Add Goal"
            </button>
        </form>
    }
}

#[component]
pub fn RemindersPage() -> impl IntoView {
    let planner = RwSignal::new(sample(now()));
    let (filter, set_filter) = signal(ReminderFilter::All);

    view! {
        <div class="page-container reminders">
            <h1>"Reminders & Goals"</h1>

            <div class="stats-row">
                <div class="stat-card">
                    <span class="stat-value">{move || planner.with(|p| p.count(ReminderFilter::Pending, now()))}</span>
                    <span class="stat-label">"Pending"</span>
                </div>
                <div class="stat-card">
                    <span class="stat-value">{move || planner.with(|p| p.count(ReminderFilter::Overdue, now()))}</span>
                    <span class="stat-label">"Overdue"</span>
                </div>
                <div class="stat-card">
                    <span class="stat-value">{move || format!("{}%", planner.with(|p| p.average_progress()))}</span>
                    <span class="stat-label">"Avg. goal progress"</span>
                </div>
            </div>

            <section class="reminder-section">
                <h2><Calendar attr:class="icon" />" Reminders"</h2>
                <div class="filter-tabs">
                    {ReminderFilter::ALL
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

                <ul class="reminder-list">
                    {move || {
                        let at = now();
                        planner.with(|p| p.reminders(filter.get(), at))
                            .into_iter()
                            .map(|r| {
                                let id = r.id;
                                let class = if r.completed {
                                    "reminder-item completed"
                                } else if r.is_overdue(at) {
                                    "reminder-item overdue"
                                } else {
                                    "reminder-item"
                                };
                                view! {
                                    <li class=class>
                                        <button
                                            class="btn-icon"
                                            aria-label="Toggle complete"
                                            on:click=move |_| planner.update(|p| p.toggle_reminder(id))
                                        >
                                            <CheckCircle />
                                        </button>
                                        <div class="reminder-info">
                                            <h3>{r.title}</h3>
                                            <p>{r.subject} " · " {r.due.format("%b %-d, %H:%M").to_string()}</p>
                                        </div>
                                        <button
                                            class="btn-icon"
                                            aria-label="Delete reminder"
                                            on:click=move |_| planner.update(|p| p.delete_reminder(id))
                                        >
                                            <Trash />
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
                <AddReminderForm planner=planner />
            </section>

            <section class="goal-section">
                <h2><Target attr:class="icon" />" Study Goals"</h2>
                <ul class="goal-list">
                    {move || planner.with(|p| p.goals().to_vec())
                        .into_iter()
                        .map(|g| {
                            let id = g.id;
                            view! {
                                <li class="goal-item">
                                    <div class="goal-info">
                                        <h3>{g.title}</h3>
                                        <p>"Due " {g.deadline.format("%b %-d, %Y").to_string()}</p>
                                    </div>
                                    <input
                                        type="range"
                                        min="0"
                                        max="100"
                                        step="5"
                                        prop:value=g.progress.to_string()
                                        on:change=move |ev| {
                                            if let Ok(v) = event_target_value(&ev).parse::<u8>() {
                                                planner.update(|p| p.set_goal_progress(id, v));
                                            }
                                        }
                                    />
                                    <span class="goal-progress">{format!("{}%", g.progress)}</span>
                                    <button
                                        class="btn-icon"
                                        aria-label="Delete goal"
                                        on:click=move |_| planner.update(|p| p.delete_goal(id))
                                    >
                                        <Trash />
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <AddGoalForm planner=planner />
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    #[test]
    fn filters_split_pending_overdue_completed() {
        let now = at(2024, 3, 10, 12);
        let planner = sample(now);
        assert_eq!(planner.count(ReminderFilter::All, now), 4);
        assert_eq!(planner.count(ReminderFilter::Pending, now), 2);
        assert_eq!(planner.count(ReminderFilter::Overdue, now), 1);
        assert_eq!(planner.count(ReminderFilter::Completed, now), 1);

        let pending = planner.reminders(ReminderFilter::Pending, now);
        assert!(pending[0].due <= pending[1].due);
    }

    #[test]
    fn toggling_moves_overdue_to_completed() {
        let now = at(2024, 3, 10, 12);
        let mut planner = sample(now);
        let overdue = planner.reminders(ReminderFilter::Overdue, now)[0].id;
        planner.toggle_reminder(overdue);
        assert_eq!(planner.count(ReminderFilter::Overdue, now), 0);
        assert_eq!(planner.count(ReminderFilter::Completed, now), 2);

        planner.delete_reminder(overdue);
        assert_eq!(planner.count(ReminderFilter::All, now), 3);
    }

    #[test]
    fn add_forms_validate_input() {
        let mut planner = Planner::default();
        assert_eq!(planner.add_reminder("  ", "Math", "2024-03-11T09:30"), Err(PlannerError::MissingTitle));
        assert_eq!(planner.add_reminder("Quiz prep", "Math", "tomorrow"), Err(PlannerError::InvalidDate));
        assert!(planner.add_reminder("Quiz prep", "Math", "2024-03-11T09:30").is_ok());

        let now = at(2024, 3, 10, 12);
        assert_eq!(planner.count(ReminderFilter::Pending, now), 1);

        assert_eq!(planner.add_goal("Read", "2024-13-01"), Err(PlannerError::InvalidDate));
        assert!(planner.add_goal("Read", "2024-04-01").is_ok());
        assert_eq!(planner.goals()[0].progress, 0);
    }

    #[test]
    fn average_progress_rounds_and_clamps() {
        let mut planner = Planner::default();
        assert_eq!(planner.average_progress(), 0);

        let a = planner.add_goal("A", "2024-04-01").unwrap();
        let b = planner.add_goal("B", "2024-04-01").unwrap();
        planner.set_goal_progress(a, 150);
        planner.set_goal_progress(b, 25);
        assert_eq!(planner.average_progress(), 63);

        planner.delete_goal(a);
        assert_eq!(planner.average_progress(), 25);
    }
}
