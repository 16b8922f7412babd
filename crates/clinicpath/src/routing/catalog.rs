use serde::Serialize;
use utoipa::ToSchema;

/// A known, navigable destination on the site.
///
/// Entries are defined once at startup and never mutated. Paths are expected
/// to be unique but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RouteEntry {
    pub path: String,
    /// Human-readable label shown in suggestion lists (e.g., "Find My Clinic").
    pub label: String,
    /// Synonyms a visitor might type instead of the label (e.g., ["quiz", "match"]).
    pub keywords: Vec<String>,
}

impl RouteEntry {
    pub fn new(path: &str, label: &str, keywords: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            label: label.to_string(),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }
}

/// The site's route catalog in display order.
pub fn default_catalog() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new("/", "Home", &["home", "start", "main"]),
        RouteEntry::new(
            "/clinics",
            "Browse Clinics",
            &["clinics", "providers", "listings", "list"],
        ),
        RouteEntry::new("/quiz", "Find My Clinic", &["quiz", "match", "find", "recommend"]),
        RouteEntry::new(
            "/compare",
            "Compare Clinics",
            &["compare", "comparison", "versus", "prices"],
        ),
        RouteEntry::new("/how-it-works", "How It Works", &["process", "steps", "guide", "how"]),
        RouteEntry::new(
            "/eligibility",
            "Check Eligibility",
            &["eligible", "qualify", "requirements", "criteria"],
        ),
        RouteEntry::new(
            "/conditions",
            "Conditions",
            &["conditions", "pain", "anxiety", "insomnia"],
        ),
        RouteEntry::new("/costs", "Costs & Pricing", &["cost", "price", "fees", "pricing"]),
        RouteEntry::new("/faq", "FAQ", &["faq", "questions", "help", "answers"]),
        RouteEntry::new("/about", "About Us", &["about", "company", "team", "mission"]),
        RouteEntry::new("/contact", "Contact Us", &["contact", "email", "support", "phone"]),
        RouteEntry::new("/guides", "Guides", &["guides", "articles", "blog", "learn"]),
    ]
}
