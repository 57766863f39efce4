//! Reverse mapper: fold the live view back into domain `Permissions`

use std::collections::HashMap;

use crate::claims::ClaimsRegistry;
use crate::model::{ContentId, PermissionPage, Permissions};
use crate::view::{NodeKind, PermissionNodeView, PermissionsViewModel};

/// Rebuild `previous` with the view's current state laid over it.
///
/// Page and leaf nodes take access from their control; a page whose
/// control is unresolved keeps its prior value. Category nodes always keep
/// the prior domain value. Claims take each checkbox's current state and
/// keep the claim's `value`. Domain nodes with no view counterpart (pages
/// filtered out at build time) pass through unchanged.
pub fn to_permissions(vm: &PermissionsViewModel, previous: &Permissions) -> Permissions {
    let index: HashMap<ContentId, &PermissionNodeView> =
        vm.nodes().into_iter().map(|n| (n.content_id, n)).collect();
    let mut out = previous.clone();
    for page in out.pages.iter_mut() {
        fold(page, &index, &vm.claims);
    }
    out
}

fn fold(page: &mut PermissionPage, index: &HashMap<ContentId, &PermissionNodeView>, claims: &ClaimsRegistry) {
    if let Some(node) = index.get(&page.content_id) {
        match node.kind {
            NodeKind::Page | NodeKind::Leaf => {
                if let Some(level) = node.access {
                    page.access = level;
                }
            }
            NodeKind::Category => {}
        }
        if let Some(group) = claims.get(&node.claims_key()) {
            for claim in page.additional_claims.iter_mut() {
                if let Some(control) = group.control(&claim.name) {
                    claim.is_selected = control.selected;
                }
            }
        }
    }
    for child in page.children.iter_mut() {
        fold(child, index, claims);
    }
}
