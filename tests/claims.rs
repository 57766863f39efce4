//! Claim rule tests: disable, validation, exclusivity, scheduling

mod common;

use std::time::Duration;

use common::*;
use permtree::AccessControlLevel::{None as NoAccess, Read, ReadWrite};
use permtree::{
    build_view_model, ClaimsGroup, ClaimsRegistry, EngineConfig, GroupStatus, Permissions, PermissionsError,
    DEALER_PRINCIPAL,
};

const APPROVER: &str = "Approver";
const SUBMITTER: &str = "Submitter";

// ============================================================================
// Exclusivity
// ============================================================================

#[test]
fn dealer_principal_clears_siblings() {
    let mut editor = loaded_editor();
    editor.toggle_claim(WARRANTY, SUBMITTER, true).unwrap();
    editor.toggle_claim(WARRANTY, DEALER_PRINCIPAL, true).unwrap();

    assert!(!selected(&editor, WARRANTY, APPROVER));
    assert!(!selected(&editor, WARRANTY, SUBMITTER));
    assert!(selected(&editor, WARRANTY, DEALER_PRINCIPAL));
}

#[test]
fn sibling_clears_dealer_principal() {
    let mut editor = loaded_editor();
    editor.toggle_claim(WARRANTY, DEALER_PRINCIPAL, true).unwrap();
    editor.toggle_claim(WARRANTY, APPROVER, true).unwrap();

    assert!(selected(&editor, WARRANTY, APPROVER));
    assert!(!selected(&editor, WARRANTY, DEALER_PRINCIPAL));
    assert!(!selected(&editor, WARRANTY, SUBMITTER));
}

#[test]
fn exclusivity_on_a_bare_group() {
    let mut group = ClaimsGroup::from_claims(&[claim("A", false), claim("B", true), claim(DEALER_PRINCIPAL, false)]);
    group.toggle(1, DEALER_PRINCIPAL, true).unwrap();
    assert_eq!(group.selected_names(), vec![DEALER_PRINCIPAL]);

    group.toggle(1, "A", true).unwrap();
    assert_eq!(group.selected_names(), vec!["A"]);
}

#[test]
fn deselecting_does_not_touch_siblings() {
    let mut editor = loaded_editor();
    editor.toggle_claim(WARRANTY, SUBMITTER, true).unwrap();
    editor.toggle_claim(WARRANTY, SUBMITTER, false).unwrap();
    assert!(selected(&editor, WARRANTY, APPROVER));
}

#[test]
fn unknown_claim_is_rejected() {
    let mut editor = loaded_editor();
    let err = editor.toggle_claim(WARRANTY, "Auditor", true).unwrap_err();
    assert!(matches!(err, PermissionsError::ClaimNotFound { content_id: WARRANTY, .. }));
    assert!(editor.toggle_claim(BILLING, APPROVER, true).is_err());
}

// ============================================================================
// Disable rule
// ============================================================================

#[test]
fn none_access_clears_and_disables_claims() {
    let mut editor = loaded_editor();
    editor.set_access(WARRANTY, NoAccess).unwrap();

    let group = claims(&editor, WARRANTY);
    assert!(group.controls.iter().all(|c| c.disabled && !c.selected));
    assert_eq!(group.status(), GroupStatus::Disabled);

    let err = editor.toggle_claim(WARRANTY, APPROVER, true).unwrap_err();
    assert!(matches!(err, PermissionsError::ClaimDisabled { .. }));
}

#[test]
fn restoring_access_enables_claims() {
    let mut editor = loaded_editor();
    editor.set_access(WARRANTY, NoAccess).unwrap();
    editor.set_access(WARRANTY, Read).unwrap();

    let group = claims(&editor, WARRANTY);
    assert!(group.controls.iter().all(|c| !c.disabled));
    editor.toggle_claim(WARRANTY, APPROVER, true).unwrap();
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn validation_is_debounced_after_access_change() {
    let mut editor = loaded_editor();
    editor.set_access(WARRANTY, NoAccess).unwrap();
    editor.settle();
    editor.set_access(WARRANTY, Read).unwrap();
    assert!(editor.claim_errors().is_empty());

    editor.advance(Duration::from_millis(49));
    assert!(editor.claim_errors().is_empty());

    editor.advance(Duration::from_millis(1));
    let errors = editor.claim_errors();
    let error = errors.get(&WARRANTY.to_string()).expect("warranty reported");
    assert_eq!(error.page, "Service");
    assert_eq!(error.category, "Warranty");
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Invalid);
}

#[test]
fn bursts_of_changes_validate_once_settled() {
    let mut editor = loaded_editor();
    editor.set_access(WARRANTY, NoAccess).unwrap();
    editor.advance(Duration::from_millis(30));
    editor.set_access(WARRANTY, ReadWrite).unwrap();
    editor.advance(Duration::from_millis(30));
    // window restarted by the second change
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Valid);
    assert!(editor.claim_errors().is_empty());

    editor.advance(Duration::from_millis(20));
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Invalid);
    assert_eq!(editor.claim_errors().len(), 1);
}

#[test]
fn selecting_a_claim_clears_the_report() {
    let mut editor = loaded_editor();
    editor.set_access(WARRANTY, NoAccess).unwrap();
    editor.set_access(WARRANTY, Read).unwrap();
    editor.settle();
    assert_eq!(editor.claim_errors().len(), 1);

    editor.toggle_claim(WARRANTY, SUBMITTER, true).unwrap();
    assert!(editor.claim_errors().is_empty());
    editor.settle();
    assert!(editor.claim_errors().is_empty());
}

#[test]
fn clearing_the_last_claim_reports_immediately() {
    let mut editor = loaded_editor();
    editor.toggle_claim(WARRANTY, APPROVER, false).unwrap();
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Invalid);
    assert_eq!(editor.claim_errors().len(), 1);
}

#[test]
fn cascade_applies_claims_for_level() {
    let mut editor = loaded_editor();
    editor.set_access(SERVICE, NoAccess).unwrap();
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Disabled);
    assert!(editor.claim_errors().is_empty());

    editor.set_access(SERVICE, Read).unwrap();
    let group = claims(&editor, WARRANTY);
    assert!(group.has_validator());
    assert_eq!(group.status(), GroupStatus::Invalid);
    assert_eq!(editor.claim_errors().len(), 1);

    // deferred revalidation runs on the next tick and agrees
    assert!(editor.pending_tasks() > 0);
    editor.tick();
    assert_eq!(claims(&editor, WARRANTY).status(), GroupStatus::Invalid);
}

#[test]
fn working_permissions_follow_claims() {
    let mut editor = loaded_editor();
    editor.toggle_claim(WARRANTY, DEALER_PRINCIPAL, true).unwrap();

    let working = editor.working().unwrap();
    let warranty = working.find(WARRANTY).unwrap();
    let dp = warranty.additional_claims.iter().find(|c| c.name == DEALER_PRINCIPAL).unwrap();
    assert!(dp.is_selected);
    assert_eq!(dp.value, "claim:dealer principal");
    assert!(!warranty.additional_claims.iter().find(|c| c.name == APPROVER).unwrap().is_selected);
    assert!(editor.permissions_changed());
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn reregistering_a_key_replaces_the_group() {
    let mut registry = ClaimsRegistry::default();
    registry.insert("7".into(), ClaimsGroup::from_claims(&[claim("Old", true)]));
    registry.insert("7".into(), ClaimsGroup::from_claims(&[claim("New", false)]));

    assert_eq!(registry.len(), 1);
    let group = registry.get("7").unwrap();
    assert!(group.control("Old").is_none());
    assert!(!group.is_selected("New"));
}

#[test]
fn duplicate_content_id_keeps_last_built_group() {
    let mut first = leaf(99, "Reports", full(), Read);
    first.additional_claims = vec![claim("Viewer", true)];
    let mut second = leaf(99, "Reports (legacy)", full(), Read);
    second.additional_claims = vec![claim("Exporter", true), claim(DEALER_PRINCIPAL, false)];
    let p = Permissions {
        pages: vec![parent(500, "Analytics", vec![first, second])],
        page_access_categories: categories(),
    };

    let vm = build_view_model(&p, &EngineConfig::default());
    assert_eq!(vm.claims.len(), 1);
    let group = vm.claims.get("99").unwrap();
    assert_eq!(group.selected_names(), vec!["Exporter"]);
    assert!(group.control("Viewer").is_none());
}
