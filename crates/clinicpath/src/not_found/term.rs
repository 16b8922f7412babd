use std::borrow::Cow;

/// Derive a free-text search term from an unmatched path.
///
/// Uses the last non-empty `/` segment with hyphens turned into spaces, after
/// dropping any query string or fragment and percent-decoding the segment.
/// `/clinics/old-slug-name` becomes `"old slug name"`; `/` becomes `""`.
pub fn search_term_from_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let Some(segment) = path.split('/').filter(|segment| !segment.is_empty()).last() else {
        return String::new();
    };
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    decoded.replace('-', " ")
}
