use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::diagnostics::deferred::DeferredTask;

/// Result of checking one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub page_path: String,
    /// Internal links that were checked.
    pub checked: usize,
    /// Internal links with no matching known path, in document order.
    pub broken: Vec<String>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }
}

static HREF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|[\s<])href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`=]+))"#)
        .expect("Invalid href regex pattern")
});

/// Every `href` attribute value in `html`, in document order.
///
/// Attribute names match case-insensitively, whitespace may surround `=` and
/// values may be double-quoted, single-quoted or bare.
pub fn extract_links(html: &str) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(html)
        .filter_map(|captures| {
            captures
                .get(1)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(3))
        })
        .map(|value| value.as_str().to_string())
        .collect()
}

/// Checks internal links on rendered pages against the known path set.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    known_paths: BTreeSet<String>,
    delay: Duration,
}

impl LinkChecker {
    pub fn new(known_paths: impl IntoIterator<Item = String>, delay: Duration) -> Self {
        Self {
            known_paths: known_paths.into_iter().collect(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn check(&self, page_path: &str, html: &str) -> LinkReport {
        let mut checked = 0;
        let mut broken = Vec::new();
        for link in extract_links(html) {
            let Some(path) = internal_path(&link) else {
                continue;
            };
            checked += 1;
            if !self.known_paths.contains(path) {
                broken.push(link);
            }
        }
        LinkReport {
            page_path: page_path.to_string(),
            checked,
            broken,
        }
    }

    /// Check `html` after the configured delay and hand the report to
    /// `on_report`, unless the returned task is cancelled or dropped first.
    pub fn schedule<F>(
        &self,
        parent: &CancellationToken,
        page_path: &str,
        html: String,
        on_report: F,
    ) -> DeferredTask
    where
        F: FnOnce(LinkReport) + Send + 'static,
    {
        let checker = self.clone();
        let page_path = page_path.to_string();
        DeferredTask::spawn(self.delay, parent, move || {
            on_report(checker.check(&page_path, &html));
        })
    }
}

/// Path portion of a site-internal link, or `None` for external, anchor,
/// `mailto:` and `tel:` links.
fn internal_path(link: &str) -> Option<&str> {
    if !link.starts_with('/') || link.starts_with("//") {
        return None;
    }
    let path = link.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/" } else { trimmed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn checker(delay_ms: u64) -> LinkChecker {
        LinkChecker::new(
            ["/", "/faq", "/quiz"].iter().map(|p| p.to_string()),
            Duration::from_millis(delay_ms),
        )
    }

    #[test]
    fn extracts_single_and_double_quoted_links() {
        let html = r#"<a href="/faq">FAQ</a><a href='/quiz?x=1'>Quiz</a><a data-href=x>bad</a>"#;
        assert_eq!(extract_links(html), vec!["/faq", "/quiz?x=1"]);
    }

    #[test]
    fn extracts_uppercase_spaced_and_bare_links() {
        let html = concat!(
            r#"<A HREF="/faq">FAQ</A>"#,
            r#"<a href = "/quiz">Quiz</a>"#,
            r#"<a href=/faq#top>Top</a>"#,
            "<a\nHref\t=\t'/no-such-page'>Broken</a>",
        );
        assert_eq!(
            extract_links(html),
            vec!["/faq", "/quiz", "/faq#top", "/no-such-page"]
        );

        let report = checker(0).check("/", html);
        assert_eq!(report.checked, 4);
        assert_eq!(report.broken, vec!["/no-such-page"]);
    }

    #[test]
    fn unterminated_attribute_stops_extraction() {
        assert_eq!(extract_links(r#"<a href="/faq">a</a><a href="/broken"#), vec!["/faq"]);
    }

    #[test]
    fn reports_unknown_internal_links_only() {
        let html = concat!(
            r#"<a href="/faq#top">FAQ</a>"#,
            r#"<a href="/no-such-page">Broken</a>"#,
            r#"<a href="https://example.com/">External</a>"#,
            r#"<a href="//cdn.example.com/x.js">Protocol relative</a>"#,
            r##"<a href="#main">Skip</a>"##,
            r#"<a href="mailto:help@example.com">Mail</a>"#,
            r#"<a href="tel:+440000000">Call</a>"#,
            r#"<a href="/">Home</a>"#,
        );
        let report = checker(0).check("/faq", html);
        assert_eq!(report.checked, 3);
        assert_eq!(report.broken, vec!["/no-such-page"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn rendered_pages_are_clean() {
        let catalog = crate::routing::default_catalog();
        let checker = LinkChecker::new(crate::pages::known_paths(&catalog), Duration::ZERO);
        for page in crate::pages::PAGES {
            let report = checker.check(page.path, &crate::pages::render(page));
            assert!(report.is_clean(), "{} has broken links: {:?}", page.path, report.broken);
        }
    }

    #[tokio::test]
    async fn scheduled_check_delivers_report() {
        let parent = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        let _task = checker(10).schedule(
            &parent,
            "/faq",
            r#"<a href="/gone">x</a>"#.to_string(),
            move |report| {
                let _ = tx.send(report);
            },
        );

        let report = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("timeout")
            .expect("report");
        assert_eq!(report.page_path, "/faq");
        assert_eq!(report.broken, vec!["/gone"]);
    }

    #[tokio::test]
    async fn dropped_schedule_never_reports() {
        let parent = CancellationToken::new();
        let (tx, rx) = oneshot::channel::<LinkReport>();
        let task = checker(30).schedule(&parent, "/faq", String::new(), move |report| {
            let _ = tx.send(report);
        });
        drop(task);

        // The sender is dropped without sending once the task is cancelled.
        let result = tokio::time::timeout(Duration::from_millis(200), rx)
            .await
            .expect("task should finish promptly");
        assert!(result.is_err());
    }
}
