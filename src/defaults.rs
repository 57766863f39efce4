//! Default permissions derived from department membership

use crate::model::{AccessControlLevel, PermissionPage, Permissions};

/// Copy of `permissions` with every node's access replaced by its default:
/// the strongest supported level when the user shares a department with
/// the node, otherwise `None`. Nodes without departments get `None`.
pub fn default_permissions(permissions: &Permissions, user_departments: &[String]) -> Permissions {
    let mut out = permissions.clone();
    for page in out.pages.iter_mut() {
        apply_defaults(page, user_departments);
    }
    out
}

fn apply_defaults(page: &mut PermissionPage, user_departments: &[String]) {
    let eligible = page.departments.iter().any(|d| user_departments.contains(d));
    page.access = if eligible { highest_supported(page) } else { AccessControlLevel::None };
    for child in page.children.iter_mut() {
        apply_defaults(child, user_departments);
    }
}

fn highest_supported(page: &PermissionPage) -> AccessControlLevel {
    page.declared_levels().into_iter().max().unwrap_or(AccessControlLevel::None)
}
