//! Leaf-level change detection between two permission sets

use std::collections::BTreeMap;

use crate::constants::{CLAIM_KEY_SUFFIX, CLAIM_SEPARATOR};
use crate::model::{PermissionPage, Permissions};

/// Flat leaf map: `contentId` to access, plus `{contentId}c` to the
/// sorted, pipe-joined selected claim names when any claim is selected
pub fn flatten(permissions: &Permissions) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for page in &permissions.pages {
        flatten_into(page, &mut map);
    }
    map
}

fn flatten_into(page: &PermissionPage, map: &mut BTreeMap<String, String>) {
    if !page.is_leaf() {
        for child in &page.children {
            flatten_into(child, map);
        }
        return;
    }
    map.insert(page.content_id.to_string(), page.access.to_string());
    let mut selected: Vec<&str> = page
        .additional_claims
        .iter()
        .filter(|c| c.is_selected)
        .map(|c| c.name.as_str())
        .collect();
    if !selected.is_empty() {
        selected.sort_unstable();
        map.insert(format!("{}{}", page.content_id, CLAIM_KEY_SUFFIX), selected.join(CLAIM_SEPARATOR));
    }
}

/// Equal when every leaf present on both sides carries the same access
/// and claim signature. Leaves missing from either side are not compared.
pub fn are_permissions_equal(a: &Permissions, b: &Permissions) -> bool {
    let (fa, fb) = (flatten(a), flatten(b));
    let equal = leaf_ids(&fa).all(|id| {
        if !fb.contains_key(id) {
            return true;
        }
        let claims = format!("{}{}", id, CLAIM_KEY_SUFFIX);
        fa.get(id) == fb.get(id) && fa.get(&claims) == fb.get(&claims)
    });
    equal
}

fn leaf_ids(map: &BTreeMap<String, String>) -> impl Iterator<Item = &String> {
    map.keys().filter(|k| !k.ends_with(CLAIM_KEY_SUFFIX))
}

/// Change flag between working and original snapshots
pub fn permissions_changed(working: Option<&Permissions>, original: Option<&Permissions>) -> bool {
    match (working, original) {
        (Some(w), Some(o)) => !are_permissions_equal(w, o),
        (None, None) => false,
        _ => true,
    }
}
