//! Init-time normalization
//!
//! Depth-first over the freshly built view, paired with the domain tree
//! it came from. Leaves holding a level their node does not support are
//! downgraded; aggregates are then recomputed from their children.

use tracing::{debug, warn};

use crate::claims::ClaimRules;
use crate::config::EngineConfig;
use crate::levels::{level_for_child, uniform_level};
use crate::model::{AccessControlLevel, PageAccessoryCategory, PermissionPage, Permissions};
use crate::scheduler::Scheduler;
use crate::view::{PermissionNodeView, PermissionsViewModel};

/// Normalize the whole view against `domain`. Returns the number of nodes
/// whose access value changed.
pub fn normalize(
    vm: &mut PermissionsViewModel,
    domain: &Permissions,
    config: &EngineConfig,
    scheduler: &mut Scheduler,
) -> usize {
    let PermissionsViewModel { pages, page_access_categories, claims } = vm;
    let categories: &[PageAccessoryCategory] = page_access_categories;
    let mut rules = ClaimRules { registry: claims, scheduler, debounce: config.validation_debounce() };
    let mut changed = 0;
    for node in pages.iter_mut() {
        match domain.pages.iter().find(|p| p.content_id == node.content_id) {
            Some(page) => changed += normalize_node(node, page, categories, config, &mut rules),
            None => warn!(content_id = node.content_id, "no domain page for view node, skipping"),
        }
    }
    debug!(changed, "normalization complete");
    changed
}

fn normalize_node(
    node: &mut PermissionNodeView,
    page: &PermissionPage,
    categories: &[PageAccessoryCategory],
    config: &EngineConfig,
    rules: &mut ClaimRules<'_>,
) -> usize {
    if node.is_leaf() {
        let current = node.access.unwrap_or(AccessControlLevel::None);
        let supported = page.declared_levels();
        if current == AccessControlLevel::None || supported.contains(&current) {
            return 0;
        }
        let level = level_for_child(current, &supported, categories, config.strict_cascade);
        debug!(content_id = node.content_id, from = %current, to = %level, "unsupported level downgraded");
        node.access = Some(level);
        rules.for_level(node, level);
        return 1;
    }

    let mut changed = 0;
    for child in node.children.iter_mut() {
        match page.children.iter().find(|p| p.content_id == child.content_id) {
            Some(domain_child) => changed += normalize_node(child, domain_child, categories, config, rules),
            None => warn!(content_id = child.content_id, parent = node.content_id, "no domain node for view node, skipping"),
        }
    }

    let level = uniform_level(node.children_state(), categories, config.strict_cascade);
    if level != node.access {
        node.access = level;
        rules.on_access_changed(node);
        changed += 1;
    }
    changed
}
