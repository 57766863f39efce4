//! Fuzzy menu-name filtering of the view tree

use crate::config::EngineConfig;
use crate::view::PermissionNodeView;

/// Fuzzy text matcher
pub trait FuzzyMatcher {
    fn is_match(&self, text: &str, pattern: &str) -> bool;
}

/// Approximate substring matcher, location agnostic.
///
/// Scores a match as `errors / pattern length`, where errors is the
/// smallest edit distance between the pattern and any substring of the
/// text. A match needs a score at or below `threshold` and at least
/// `min_match_chars` pattern characters matched in the text (pattern
/// length less errors). Case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMatcher {
    pub threshold: f64,
    pub min_match_chars: usize,
}

impl Default for ApproximateMatcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ApproximateMatcher {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { threshold: config.search_threshold, min_match_chars: config.search_min_match_chars }
    }

    /// Smallest edit distance of `pattern` against any substring of `text`
    pub fn best_errors(text: &[char], pattern: &[char]) -> usize {
        // column over pattern prefixes; row 0 is free so a match may start anywhere
        let mut col: Vec<usize> = (0..=pattern.len()).collect();
        let mut best = col[pattern.len()];
        for &t in text {
            let mut diag = col[0];
            col[0] = 0;
            for i in 1..=pattern.len() {
                let up = col[i];
                let cost = if pattern[i - 1] == t { 0 } else { 1 };
                col[i] = (diag + cost).min(up + 1).min(col[i - 1] + 1);
                diag = up;
            }
            best = best.min(col[pattern.len()]);
        }
        best
    }
}

impl FuzzyMatcher for ApproximateMatcher {
    fn is_match(&self, text: &str, pattern: &str) -> bool {
        let pattern: Vec<char> = pattern.trim().to_lowercase().chars().collect();
        if pattern.is_empty() {
            return false;
        }
        let text: Vec<char> = text.to_lowercase().chars().collect();
        let errors = Self::best_errors(&text, &pattern);
        let matched = pattern.len().saturating_sub(errors);
        matched >= self.min_match_chars && (errors as f64 / pattern.len() as f64) <= self.threshold
    }
}

/// Pruned copy of the tree keeping nodes whose menu name matches `term`
/// and the ancestors of such nodes. A blank term keeps everything.
pub fn filter_tree<M: FuzzyMatcher>(pages: &[PermissionNodeView], term: &str, matcher: &M) -> Vec<PermissionNodeView> {
    if term.trim().is_empty() {
        return pages.to_vec();
    }
    pages.iter().filter_map(|p| prune(p, term, matcher)).collect()
}

fn prune<M: FuzzyMatcher>(node: &PermissionNodeView, term: &str, matcher: &M) -> Option<PermissionNodeView> {
    let children: Vec<_> = node.children.iter().filter_map(|c| prune(c, term, matcher)).collect();
    if children.is_empty() && !matcher.is_match(&node.menu_name, term) {
        return None;
    }
    Some(PermissionNodeView { children, ..node.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_substring_matches() {
        let m = ApproximateMatcher::default();
        assert!(m.is_match("Billing", "bill"));
        assert!(m.is_match("Account Billing History", "BILLING"));
        assert!(!m.is_match("Shipping", "bill"));
        assert!(!m.is_match("Orders", "bill"));
    }

    #[test]
    fn tolerates_one_typo_in_five_chars() {
        let m = ApproximateMatcher::default();
        assert!(m.is_match("Invoices", "invoce"));
        // one error in four characters is over the threshold
        assert!(!m.is_match("Invoices", "invx"));
    }

    #[test]
    fn min_match_chars_counts_matched_text() {
        let m = ApproximateMatcher { threshold: 1.0, min_match_chars: 3 };
        assert!(m.is_match("Billing", "bil"));
        // every character wrong: within threshold, nothing matched
        assert!(!m.is_match("Billing", "xyz"));
        // four characters typed, only two found in the text
        assert!(!m.is_match("Billing", "bixx"));
    }

    #[test]
    fn blank_pattern_never_matches() {
        let m = ApproximateMatcher::default();
        assert!(!m.is_match("Billing", "   "));
    }
}
