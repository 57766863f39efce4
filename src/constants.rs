//! Claim names, timings and search defaults

use std::time::Duration;

/// Claim that excludes every sibling claim on the same node
pub const DEALER_PRINCIPAL: &str = "Dealer Principal";

/// Suffix of the synthetic claim-signature key in change-detection maps
pub const CLAIM_KEY_SUFFIX: &str = "c";

/// Separator joining selected claim names in a claim signature
pub const CLAIM_SEPARATOR: &str = "|";

// Validation debounce window for access and claim changes
pub const VALIDATION_DEBOUNCE: Duration = Duration::from_millis(50);

// Fuzzy search defaults (menu names only)
pub const SEARCH_THRESHOLD: f64 = 0.2;
pub const SEARCH_MIN_MATCH_CHARS: usize = 1;

// Environment variables read by EngineConfig::from_env
pub const ENV_STRICT_CASCADE: &str = "PERMTREE_STRICT_CASCADE";
pub const ENV_HIDE_PARTIAL: &str = "PERMTREE_HIDE_UNLESS_ALL_CHILDREN_SUPPORT";
pub const ENV_DEBOUNCE_MS: &str = "PERMTREE_VALIDATION_DEBOUNCE_MS";
pub const ENV_SEARCH_THRESHOLD: &str = "PERMTREE_SEARCH_THRESHOLD";
pub const ENV_SEARCH_MIN_CHARS: &str = "PERMTREE_SEARCH_MIN_MATCH_CHARS";
