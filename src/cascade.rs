//! Cascade engine
//!
//! A level selected on a node flows down to every descendant, downgraded
//! per node to what it supports. Children are settled (access, claims,
//! descendants) before the parent's own uniformity is recomputed, and
//! ancestors are recomputed last.

use tracing::debug;

use crate::claims::ClaimRules;
use crate::config::EngineConfig;
use crate::error::{PermissionsError, Result};
use crate::levels::{level_for_child, uniform_level};
use crate::model::{AccessControlLevel, ContentId, PageAccessoryCategory};
use crate::scheduler::Scheduler;
use crate::view::{node_at_mut, PermissionNodeView, PermissionsViewModel};

/// Apply a user selection of `level` on node `id`
pub fn select_level(
    vm: &mut PermissionsViewModel,
    id: ContentId,
    level: AccessControlLevel,
    config: &EngineConfig,
    scheduler: &mut Scheduler,
) -> Result<()> {
    let path = vm.path_of(id).ok_or(PermissionsError::NodeNotFound(id))?;
    let PermissionsViewModel { pages, page_access_categories, claims } = vm;
    let categories: &[PageAccessoryCategory] = page_access_categories;
    let mut rules = ClaimRules { registry: claims, scheduler, debounce: config.validation_debounce() };

    let node = node_at_mut(pages, &path).ok_or(PermissionsError::NodeNotFound(id))?;
    match node.option(level) {
        Some(option) if !option.disabled => {}
        _ => return Err(PermissionsError::LevelUnavailable { content_id: id, level }),
    }

    node.access = Some(level);
    rules.on_access_changed(node);
    if !node.is_leaf() {
        debug!(content_id = id, level = %level, "cascading");
        cascade(node, level, categories, config, &mut rules);
    }

    recompute_ancestors(pages, &path, categories, config, &mut rules);
    Ok(())
}

/// Push `selected` into every child of `node`, then recompute `node`
pub(crate) fn cascade(
    node: &mut PermissionNodeView,
    selected: AccessControlLevel,
    categories: &[PageAccessoryCategory],
    config: &EngineConfig,
    rules: &mut ClaimRules<'_>,
) {
    for child in node.children.iter_mut() {
        let level = level_for_child(selected, &child.supported, categories, config.strict_cascade);
        child.access = Some(level);
        rules.for_level(child, level);
        if !child.is_leaf() {
            cascade(child, level, categories, config, rules);
        }
    }
    recompute(node, categories, config, rules);
}

/// Recompute uniformity along `path`, deepest parent first
pub(crate) fn recompute_ancestors(
    pages: &mut [PermissionNodeView],
    path: &[usize],
    categories: &[PageAccessoryCategory],
    config: &EngineConfig,
    rules: &mut ClaimRules<'_>,
) {
    for depth in (1..path.len()).rev() {
        let Some(parent) = node_at_mut(pages, &path[..depth]) else {
            break;
        };
        // unchanged parent means unchanged grandparents
        if !recompute(parent, categories, config, rules) {
            break;
        }
    }
}

fn recompute(
    node: &mut PermissionNodeView,
    categories: &[PageAccessoryCategory],
    config: &EngineConfig,
    rules: &mut ClaimRules<'_>,
) -> bool {
    let level = uniform_level(node.children_state(), categories, config.strict_cascade);
    if level == node.access {
        return false;
    }
    debug!(content_id = node.content_id, level = ?level, "uniformity recomputed");
    node.access = level;
    rules.on_access_changed(node);
    true
}
