//! Path-similarity suggestions over the set of known valid paths.

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Suggester failed: {0}")]
    Failed(String),
}

/// Finds known paths similar to an unmatched one.
pub trait AlternativeSuggester: Send + Sync {
    fn suggest_alternatives(&self, unmatched_path: &str) -> Result<Vec<String>, SuggestError>;
}

/// Suggests known paths that are a parent of, or a small edit away from, the
/// unmatched path.
pub struct KnownPathSuggester {
    known_paths: Vec<String>,
    limit: usize,
}

impl KnownPathSuggester {
    pub fn new(known_paths: Vec<String>) -> Self {
        Self::with_limit(known_paths, 3)
    }

    pub fn with_limit(known_paths: Vec<String>, limit: usize) -> Self {
        Self {
            known_paths: known_paths.into_iter().map(|p| normalize_path(&p)).collect(),
            limit: limit.max(1),
        }
    }
}

impl AlternativeSuggester for KnownPathSuggester {
    fn suggest_alternatives(&self, unmatched_path: &str) -> Result<Vec<String>, SuggestError> {
        if !unmatched_path.starts_with('/') {
            return Err(SuggestError::InvalidPath(unmatched_path.to_string()));
        }
        let unmatched = normalize_path(unmatched_path);
        if unmatched == "/" {
            return Ok(Vec::new());
        }
        let allowed = max_allowed_distance(&unmatched);

        let mut scored: Vec<(&str, usize)> = self
            .known_paths
            .iter()
            .filter(|candidate| candidate.as_str() != unmatched)
            .filter_map(|candidate| {
                if candidate != "/" && unmatched.starts_with(&format!("{candidate}/")) {
                    return Some((candidate.as_str(), 0));
                }
                let distance = levenshtein(&unmatched, candidate);
                (distance <= allowed).then_some((candidate.as_str(), distance))
            })
            .collect();

        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        Ok(scored
            .into_iter()
            .take(self.limit)
            .map(|(path, _)| path.to_string())
            .collect())
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim().trim_end_matches('/').to_lowercase();
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed
    }
}

fn max_allowed_distance(path: &str) -> usize {
    let len = path.chars().count();
    if len <= 5 {
        return 1;
    }
    if len <= 9 {
        return 2;
    }
    (len as f32 * 0.35).floor().max(3.0) as usize
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b_chars: Vec<char> = b.chars().collect();
    let m = b_chars.len();
    if a.is_empty() {
        return m;
    }
    if m == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0; m + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[m]
}
