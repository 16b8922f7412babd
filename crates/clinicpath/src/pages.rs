//! Static informational pages.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::routing::RouteEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSection {
    pub heading: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub path: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub sections: &'static [PageSection],
}

/// Links rendered in every page header.
pub const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/clinics", "Clinics"),
    ("/compare", "Compare"),
    ("/quiz", "Find My Clinic"),
    ("/eligibility", "Eligibility"),
    ("/faq", "FAQ"),
];

pub const PAGES: &[Page] = &[
    Page {
        path: "/",
        title: "Compare Medical Cannabis Clinics",
        summary: "Independent comparisons of licensed medical cannabis clinics.",
        sections: &[
            PageSection {
                heading: "Start here",
                body: "Answer a few questions and we will match you with clinics that treat your condition.",
            },
            PageSection {
                heading: "Why compare",
                body: "Consultation fees, prescription costs and waiting times vary widely between clinics.",
            },
        ],
    },
    Page {
        path: "/how-it-works",
        title: "How It Works",
        summary: "From first consultation to your prescription being dispensed.",
        sections: &[
            PageSection {
                heading: "1. Check eligibility",
                body: "You need a diagnosed condition and at least two previously tried treatments.",
            },
            PageSection {
                heading: "2. Book a consultation",
                body: "A specialist doctor reviews your medical records and discusses options.",
            },
            PageSection {
                heading: "3. Receive your prescription",
                body: "Approved prescriptions are sent to a partner pharmacy and delivered to you.",
            },
        ],
    },
    Page {
        path: "/eligibility",
        title: "Check Eligibility",
        summary: "Who can be prescribed medical cannabis.",
        sections: &[
            PageSection {
                heading: "Requirements",
                body: "Adults with a qualifying diagnosis who have tried at least two conventional treatments.",
            },
            PageSection {
                heading: "Medical records",
                body: "Clinics ask for a summary of care record from your GP before the consultation.",
            },
        ],
    },
    Page {
        path: "/conditions",
        title: "Conditions",
        summary: "Conditions commonly treated by specialist clinics.",
        sections: &[PageSection {
            heading: "Common conditions",
            body: "Chronic pain, anxiety, insomnia, multiple sclerosis, migraine and PTSD.",
        }],
    },
    Page {
        path: "/costs",
        title: "Costs & Pricing",
        summary: "What a private prescription typically costs.",
        sections: &[
            PageSection {
                heading: "Consultation fees",
                body: "Initial consultations range from free to around 200 pounds depending on the clinic.",
            },
            PageSection {
                heading: "Medication",
                body: "Monthly medication costs depend on product type and dosage.",
            },
        ],
    },
    Page {
        path: "/faq",
        title: "Frequently Asked Questions",
        summary: "Answers to the questions patients ask most.",
        sections: &[
            PageSection {
                heading: "Is medical cannabis legal?",
                body: "Yes, when prescribed by a specialist doctor on the specialist register.",
            },
            PageSection {
                heading: "Can my GP prescribe it?",
                body: "No, only specialist doctors can initiate a prescription.",
            },
        ],
    },
    Page {
        path: "/about",
        title: "About Us",
        summary: "An independent comparison service run by patients and clinicians.",
        sections: &[PageSection {
            heading: "Our mission",
            body: "Make it easy to find a safe, affordable clinic.",
        }],
    },
    Page {
        path: "/contact",
        title: "Contact Us",
        summary: "Get in touch with our support team.",
        sections: &[PageSection {
            heading: "Email",
            body: "We answer every message within two working days.",
        }],
    },
    Page {
        path: "/clinics",
        title: "Browse Clinics",
        summary: "Every licensed clinic we list, with fees and specialties.",
        sections: &[PageSection {
            heading: "Listings",
            body: "Clinics are listed alphabetically; use Compare to see them side by side.",
        }],
    },
    Page {
        path: "/compare",
        title: "Compare Clinics",
        summary: "Side-by-side comparison of fees, waiting times and specialties.",
        sections: &[PageSection {
            heading: "How we compare",
            body: "Prices are checked monthly against each clinic's published fees.",
        }],
    },
    Page {
        path: "/quiz",
        title: "Find My Clinic",
        summary: "A short questionnaire that recommends clinics for you.",
        sections: &[PageSection {
            heading: "Before you start",
            body: "Have your diagnosis and previous treatments to hand.",
        }],
    },
    Page {
        path: "/guides",
        title: "Guides",
        summary: "Plain-language articles about medical cannabis treatment.",
        sections: &[PageSection {
            heading: "Getting a prescription",
            body: "A step-by-step guide to your first consultation.",
        }],
    },
    Page {
        path: "/privacy",
        title: "Privacy Policy",
        summary: "How we handle your data.",
        sections: &[PageSection {
            heading: "Analytics",
            body: "We record anonymous page views to improve the site.",
        }],
    },
];

pub fn find_page(path: &str) -> Option<&'static Page> {
    let trimmed = path.trim_end_matches('/');
    let lookup = if trimmed.is_empty() { "/" } else { trimmed };
    PAGES.iter().find(|page| page.path == lookup)
}

/// Every path a visitor can reach: page paths plus catalog paths, sorted.
pub fn known_paths(catalog: &[RouteEntry]) -> Vec<String> {
    let mut paths: BTreeSet<String> = PAGES.iter().map(|page| page.path.to_string()).collect();
    paths.extend(catalog.iter().map(|entry| entry.path.clone()));
    paths.into_iter().collect()
}

pub fn render(page: &Page) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        escape_html(page.title)
    );
    html.push_str("<nav>");
    for (href, label) in NAV_LINKS {
        let _ = write!(html, "<a href=\"{href}\">{}</a>", escape_html(label));
    }
    html.push_str("</nav><main>");
    let _ = write!(
        html,
        "<h1>{}</h1><p>{}</p>",
        escape_html(page.title),
        escape_html(page.summary)
    );
    for section in page.sections {
        let _ = write!(
            html,
            "<section><h2>{}</h2><p>{}</p></section>",
            escape_html(section.heading),
            escape_html(section.body)
        );
    }
    html.push_str(
        "</main><footer><a href=\"/about\">About</a><a href=\"/contact\">Contact</a><a href=\"/privacy\">Privacy</a></footer></body></html>",
    );
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::default_catalog;

    #[test]
    fn finds_pages_with_trailing_slash() {
        assert_eq!(find_page("/faq/").map(|p| p.path), Some("/faq"));
        assert_eq!(find_page("/").map(|p| p.path), Some("/"));
        assert!(find_page("/nope").is_none());
    }

    #[test]
    fn every_catalog_route_has_a_page() {
        for entry in default_catalog() {
            assert!(find_page(&entry.path).is_some(), "no page for {}", entry.path);
        }
    }

    #[test]
    fn known_paths_are_sorted_and_unique() {
        let paths = known_paths(&default_catalog());
        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(paths, sorted);
        assert!(paths.contains(&"/privacy".to_string()));
        assert!(paths.contains(&"/quiz".to_string()));
    }

    #[test]
    fn render_escapes_text() {
        let page = find_page("/costs").expect("costs page");
        let html = render(page);
        assert!(html.contains("<title>Costs &amp; Pricing</title>"));
        assert!(html.contains("<a href=\"/faq\">FAQ</a>"));
    }
}
