//! Tree builder: domain `Permissions` to a fresh view model
//!
//! Leaves start at their domain access; page and category nodes start
//! unresolved and are settled afterwards by normalization.

use tracing::debug;

use crate::claims::{apply_disable_rule, apply_validation_rule, ClaimsGroup, ClaimsRegistry};
use crate::config::EngineConfig;
use crate::model::{AccessControlLevel, PageAccessoryCategory, PermissionPage, Permissions};
use crate::view::{AccessOption, ClaimOption, NodeKind, PermissionNodeView, PermissionsViewModel};

/// Build the view model. Top-level pages without children are not shown.
pub fn build_view_model(permissions: &Permissions, config: &EngineConfig) -> PermissionsViewModel {
    let categories = &permissions.page_access_categories;
    let mut claims = ClaimsRegistry::default();
    let pages: Vec<_> = permissions
        .pages
        .iter()
        .filter(|p| !p.children.is_empty())
        .map(|p| build_node(p, 0, &p.menu_name, categories, config, &mut claims))
        .collect();
    debug!(pages = pages.len(), claim_groups = claims.len(), "view model built");
    PermissionsViewModel { pages, page_access_categories: categories.clone(), claims }
}

fn build_node(
    page: &PermissionPage,
    depth: usize,
    page_name: &str,
    categories: &[PageAccessoryCategory],
    config: &EngineConfig,
    claims: &mut ClaimsRegistry,
) -> PermissionNodeView {
    let kind = if depth == 0 {
        NodeKind::Page
    } else if page.is_leaf() {
        NodeKind::Leaf
    } else {
        NodeKind::Category
    };
    let access = match kind {
        NodeKind::Leaf => Some(page.access),
        NodeKind::Page | NodeKind::Category => None,
    };

    let access_options = categories
        .iter()
        .map(|c| AccessOption {
            level: c.access,
            label: c.label.clone(),
            disabled: option_disabled(page, c.access, config),
        })
        .collect();

    let claim_options = page
        .additional_claims
        .iter()
        .map(|c| ClaimOption { name: c.name.clone(), value: c.value.clone() })
        .collect();

    let children = page
        .children
        .iter()
        .map(|c| build_node(c, depth + 1, page_name, categories, config, claims))
        .collect();

    let node = PermissionNodeView {
        content_id: page.content_id,
        menu_name: page.menu_name.clone(),
        page_name: page_name.to_string(),
        kind,
        access,
        access_options,
        supported: page.declared_levels(),
        claim_options,
        children,
    };

    if node.has_claims() {
        let mut group = ClaimsGroup::from_claims(&page.additional_claims);
        apply_disable_rule(&mut group, node.access);
        apply_validation_rule(&mut group, node.access);
        claims.insert(node.claims_key(), group);
        claims.sync_report(&node);
    }
    node
}

/// Whether selecting `level` is disabled on this node
fn option_disabled(page: &PermissionPage, level: AccessControlLevel, config: &EngineConfig) -> bool {
    if page.is_leaf() {
        return !page.declared_levels().contains(&level);
    }
    if config.hide_unless_all_children_support {
        !page.children.iter().all(|c| all_support(c, level))
    } else {
        !page.children.iter().any(|c| c.supported_levels().contains(&level))
    }
}

fn all_support(page: &PermissionPage, level: AccessControlLevel) -> bool {
    if page.is_leaf() {
        page.declared_levels().contains(&level)
    } else {
        page.children.iter().all(|c| all_support(c, level))
    }
}
