#![allow(dead_code)]

use permtree::*;
use permtree::AccessControlLevel::{None as NoAccess, Read, ReadWrite};

pub const ORDERS: ContentId = 1;
pub const BILLING: ContentId = 11;
pub const SHIPPING: ContentId = 12;
pub const SERVICE: ContentId = 2;
pub const PARTS: ContentId = 21;
pub const PARTS_LOOKUP: ContentId = 211;
pub const PARTS_ORDERS: ContentId = 212;
pub const WARRANTY: ContentId = 22;
pub const DASHBOARD: ContentId = 3;

pub fn categories() -> Vec<PageAccessoryCategory> {
    vec![
        PageAccessoryCategory::new(NoAccess, "No Access"),
        PageAccessoryCategory::new(Read, "Read Only"),
        PageAccessoryCategory::new(ReadWrite, "Read/Write"),
    ]
}

pub fn levels(ls: &[AccessControlLevel]) -> Vec<PageAccessoryCategory> {
    categories().into_iter().filter(|c| ls.contains(&c.access)).collect()
}

pub fn full() -> Vec<PageAccessoryCategory> {
    levels(&[NoAccess, Read, ReadWrite])
}

pub fn read_only() -> Vec<PageAccessoryCategory> {
    levels(&[NoAccess, Read])
}

pub fn leaf(id: ContentId, name: &str, available: Vec<PageAccessoryCategory>, access: AccessControlLevel) -> PermissionPage {
    PermissionPage {
        content_id: id,
        menu_name: name.into(),
        access,
        available_page_access_types: available,
        additional_claims: vec![],
        children: vec![],
        departments: vec![],
    }
}

pub fn parent(id: ContentId, name: &str, children: Vec<PermissionPage>) -> PermissionPage {
    PermissionPage { children, ..leaf(id, name, full(), NoAccess) }
}

pub fn claim(name: &str, selected: bool) -> AdditionalClaim {
    AdditionalClaim { name: name.into(), value: format!("claim:{}", name.to_lowercase()), is_selected: selected }
}

pub fn with_departments(mut page: PermissionPage, departments: &[&str]) -> PermissionPage {
    page.departments = departments.iter().map(|d| d.to_string()).collect();
    page
}

/// Orders (Billing, Shipping), Service (Parts (Lookup, Orders), Warranty),
/// and a childless Dashboard page that is never shown.
pub fn dealer_permissions() -> Permissions {
    let mut warranty = leaf(WARRANTY, "Warranty", full(), ReadWrite);
    warranty.additional_claims = vec![claim("Approver", true), claim("Submitter", false), claim(DEALER_PRINCIPAL, false)];

    Permissions {
        pages: vec![
            parent(ORDERS, "Orders", vec![
                with_departments(leaf(BILLING, "Billing", full(), Read), &["Sales"]),
                with_departments(leaf(SHIPPING, "Shipping", read_only(), Read), &["Sales"]),
            ]),
            parent(SERVICE, "Service", vec![
                parent(PARTS, "Parts", vec![
                    with_departments(leaf(PARTS_LOOKUP, "Parts Lookup", full(), NoAccess), &["Service"]),
                    with_departments(leaf(PARTS_ORDERS, "Parts Orders", read_only(), NoAccess), &["Service"]),
                ]),
                with_departments(warranty, &["Service"]),
            ]),
            leaf(DASHBOARD, "Dashboard", full(), Read),
        ],
        page_access_categories: categories(),
    }
}

/// Log output for a failing test: `RUST_LOG=permtree=debug cargo test`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fixture with the Parts category declaring only {None, Read}
pub fn read_only_parts() -> Permissions {
    let mut p = dealer_permissions();
    p.find_mut(PARTS).unwrap().available_page_access_types = read_only();
    p
}

pub fn loaded_editor() -> PermissionsEditor {
    init_tracing();
    let mut editor = PermissionsEditor::default();
    editor.load_original(dealer_permissions());
    editor
}

pub fn access(editor: &PermissionsEditor, id: ContentId) -> Option<AccessControlLevel> {
    editor.node(id).expect("node present").access
}

pub fn claims(editor: &PermissionsEditor, id: ContentId) -> ClaimsGroup {
    editor.view().unwrap().claims.get(&id.to_string()).cloned().expect("claims present")
}

pub fn selected(editor: &PermissionsEditor, id: ContentId, name: &str) -> bool {
    claims(editor, id).is_selected(name)
}
