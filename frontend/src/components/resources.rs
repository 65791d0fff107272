use crate::components::icons::{ArrowRight, BookOpen, Search, Star};
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub level: Level,
    pub kind: &'static str,
    pub url: &'static str,
    pub featured: bool,
}

pub const CATEGORIES: [&str; 6] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Computer Science",
    "History",
];

const fn resource(
    title: &'static str,
    description: &'static str,
    category: &'static str,
    level: Level,
    kind: &'static str,
    url: &'static str,
    featured: bool,
) -> Resource {
    Resource { title, description, category, level, kind, url, featured }
}

pub static CATALOGUE: [Resource; 8] = [
    resource(
        "Algebra Foundations",
        "Equations, inequalities and functions from the ground up.",
        "Mathematics",
        Level::Beginner,
        "Course",
        "https://www.khanacademy.org/math/algebra",
        true,
    ),
    resource(
        "Calculus Problem Bank",
        "Worked problems on limits, derivatives and integrals.",
        "Mathematics",
        Level::Advanced,
        "Practice",
        "https://openstax.org/details/books/calculus-volume-1",
        false,
    ),
    resource(
        "Mechanics Explained",
        "Newton's laws, energy and momentum with interactive demos.",
        "Physics",
        Level::Intermediate,
        "Video",
        "https://phet.colorado.edu/",
        true,
    ),
    resource(
        "Periodic Table Deep Dive",
        "Trends, bonding and reactions across the elements.",
        "Chemistry",
        Level::Beginner,
        "Article",
        "https://openstax.org/details/books/chemistry-2e",
        false,
    ),
    resource(
        "Cell Biology Essentials",
        "Organelles, membranes and the cell cycle.",
        "Biology",
        Level::Intermediate,
        "Course",
        "https://openstax.org/details/books/biology-2e",
        false,
    ),
    resource(
        "Intro to Programming",
        "Variables, loops and functions for first-time coders.",
        "Computer Science",
        Level::Beginner,
        "Course",
        "https://cs50.harvard.edu/x/",
        true,
    ),
    resource(
        "Algorithms in Depth",
        "Sorting, graphs and dynamic programming.",
        "Computer Science",
        Level::Advanced,
        "Book",
        "https://algs4.cs.princeton.edu/",
        false,
    ),
    resource(
        "World History Timeline",
        "Key events from ancient civilizations to the modern era.",
        "History",
        Level::Intermediate,
        "Article",
        "https://www.worldhistory.org/",
        false,
    ),
];

/// Filter state of the catalogue page. `None` means any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub search: String,
    pub category: Option<String>,
    pub level: Option<Level>,
}

impl ResourceQuery {
    pub fn matches(&self, r: &Resource) -> bool {
        let needle = self.search.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || r.title.to_lowercase().contains(&needle)
            || r.description.to_lowercase().contains(&needle);
        let category_ok = self.category.as_deref().is_none_or(|c| c == r.category);
        let level_ok = self.level.is_none_or(|l| l == r.level);
        text_ok && category_ok && level_ok
    }
}

pub fn search(catalogue: &[Resource], query: &ResourceQuery) -> Vec<Resource> {
    catalogue.iter().filter(|r| query.matches(r)).cloned().collect()
}

pub fn featured(catalogue: &[Resource]) -> Vec<Resource> {
    catalogue.iter().filter(|r| r.featured).cloned().collect()
}

fn parse_level(value: &str) -> Option<Level> {
    match value {
        "beginner" => Some(Level::Beginner),
        "intermediate" => Some(Level::Intermediate),
        "advanced" => Some(Level::Advanced),
        _ => None,
    }
}

#[component]
fn ResourceCard(resource: Resource) -> impl IntoView {
    view! {
        <div class="resource-card">
            <div class="resource-meta">
                <span class="resource-kind">{resource.kind}</span>
                <span class="resource-level">{resource.level.label()}</span>
            </div>
            <h3>{resource.title}</h3>
            <p>{resource.description}</p>
            <span class="resource-category">{resource.category}</span>
            <a class="resource-link" href=resource.url target="_blank" rel="noopener noreferrer">
                "Open"
                <ArrowRight attr:class="icon-sm" />
            </a>
        </div>
    }
}

#[component]
pub fn ResourcesPage() -> impl IntoView {
    let query = RwSignal::new(ResourceQuery::default());
    let results = move || query.with(|q| search(&CATALOGUE, q));

    view! {
        <div class="page-container resources">
            <div class="page-header">
                <h1><BookOpen attr:class="icon" />" Study Resources"</h1>
                <p>"Curated material to go further on every subject."</p>
            </div>

            <section class="featured-resources">
                <h2><Star attr:class="icon" />" Featured"</h2>
                <div class="resource-grid">
                    {featured(&CATALOGUE)
                        .into_iter()
                        .map(|r| view! { <ResourceCard resource=r /> })
                        .collect_view()}
                </div>
            </section>

            <section class="resource-filters">
                <div class="input-with-icon">
                    <Search attr:class="input-icon" />
                    <input
                        type="search"
                        placeholder="Search resources..."
                        prop:value=move || query.with(|q| q.search.clone())
                        on:input=move |ev| query.update(|q| q.search = event_target_value(&ev))
                    />
                </div>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    query.update(|q| q.category = (!value.is_empty()).then_some(value));
                }>
                    <option value="">"All categories"</option>
                    {CATEGORIES.iter().map(|c| view! { <option value=*c>{*c}</option> }).collect_view()}
                </select>
                <select on:change=move |ev| query.update(|q| q.level = parse_level(&event_target_value(&ev)))>
                    <option value="">"All levels"</option>
                    <option value="beginner">"Beginner"</option>
                    <option value="intermediate">"Intermediate"</option>
                    <option value="advanced">"Advanced"</option>
                </select>
            </section>

            <section class="resource-results">
                <p class="result-count">{move || format!("{} resources", results().len())}</p>
                <div class="resource-grid">
                    {move || {
                        let found = results();
                        if found.is_empty() {
                            view! { <p class="empty-state">"No resources match your filters."</p> }.into_any()
                        } else {
                            found
                                .into_iter()
                                .map(|r| view! { <ResourceCard resource=r /> })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </div>
            </section>
        </div>
    }
}
