//! Claim checkbox groups and the rules that govern them
//!
//! Rules, in the order they are applied to a claims-bearing node:
//! - disable: `None` access clears and disables every claim, any other
//!   value enables them
//! - validation: `Read`/`ReadWrite` require at least one selected claim
//! - exclusivity: `Dealer Principal` excludes every sibling claim
//!
//! Programmatic updates here are silent: they never re-enter the rules.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::constants::DEALER_PRINCIPAL;
use crate::error::{PermissionsError, Result};
use crate::model::{AccessControlLevel, AdditionalClaim, ContentId};
use crate::scheduler::{Scheduler, Task};
use crate::view::PermissionNodeView;

/// One claim checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimControl {
    pub name: String,
    pub selected: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Valid,
    Invalid,
    /// Every control is disabled; validators do not run
    Disabled,
}

/// Validation error of a claims group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsValidationError {
    AtLeastOneRequired,
}

/// Claim checkboxes of one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimsGroup {
    pub controls: Vec<ClaimControl>,
    require_one: bool,
    error: Option<ClaimsValidationError>,
}

impl ClaimsGroup {
    pub fn from_claims(claims: &[AdditionalClaim]) -> Self {
        Self {
            controls: claims
                .iter()
                .map(|c| ClaimControl { name: c.name.clone(), selected: c.is_selected, disabled: false })
                .collect(),
            require_one: false,
            error: None,
        }
    }

    pub fn control(&self, name: &str) -> Option<&ClaimControl> {
        self.controls.iter().find(|c| c.name == name)
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut ClaimControl> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    #[inline]
    pub fn is_selected(&self, name: &str) -> bool {
        self.control(name).map(|c| c.selected).unwrap_or(false)
    }

    /// Names of selected claims, in declaration order
    pub fn selected_names(&self) -> Vec<&str> {
        self.controls.iter().filter(|c| c.selected).map(|c| c.name.as_str()).collect()
    }

    #[inline]
    pub fn has_validator(&self) -> bool {
        self.require_one
    }

    #[inline]
    pub fn error(&self) -> Option<ClaimsValidationError> {
        self.error
    }

    /// Status as of the last validity update
    pub fn status(&self) -> GroupStatus {
        if !self.controls.is_empty() && self.controls.iter().all(|c| c.disabled) {
            GroupStatus::Disabled
        } else if self.error.is_some() {
            GroupStatus::Invalid
        } else {
            GroupStatus::Valid
        }
    }

    pub fn disable_all(&mut self) {
        for c in &mut self.controls {
            c.selected = false;
            c.disabled = true;
        }
    }

    pub fn enable_all(&mut self) {
        for c in &mut self.controls {
            c.disabled = false;
        }
    }

    pub fn set_require_one(&mut self, on: bool) {
        self.require_one = on;
        if !on {
            self.error = None;
        }
    }

    /// Recompute the error from the current controls
    pub fn update_validity(&mut self) {
        let enabled: Vec<_> = self.controls.iter().filter(|c| !c.disabled).collect();
        self.error = if self.require_one && !enabled.is_empty() && !enabled.iter().any(|c| c.selected) {
            Some(ClaimsValidationError::AtLeastOneRequired)
        } else {
            None
        };
    }

    /// User toggle with the exclusivity rule applied silently
    pub fn toggle(&mut self, content_id: ContentId, name: &str, selected: bool) -> Result<()> {
        let control = self.control_mut(name).ok_or_else(|| PermissionsError::ClaimNotFound {
            content_id,
            claim: name.to_string(),
        })?;
        if control.disabled {
            return Err(PermissionsError::ClaimDisabled { content_id, claim: name.to_string() });
        }
        control.selected = selected;
        if selected {
            self.apply_exclusivity(name);
        }
        self.update_validity();
        Ok(())
    }

    fn apply_exclusivity(&mut self, changed: &str) {
        if changed == DEALER_PRINCIPAL {
            for c in self.controls.iter_mut().filter(|c| c.name != DEALER_PRINCIPAL) {
                c.selected = false;
            }
        } else if let Some(dp) = self.control_mut(DEALER_PRINCIPAL) {
            dp.selected = false;
        }
    }
}

/// Error payload reported for an invalid group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsError {
    pub page: String,
    pub category: String,
}

/// Root claims container plus the external error report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimsRegistry {
    groups: BTreeMap<String, ClaimsGroup>,
    errors: BTreeMap<String, ClaimsError>,
}

impl ClaimsRegistry {
    /// Register a group, replacing any prior entry under the same key
    pub fn insert(&mut self, key: String, group: ClaimsGroup) {
        self.groups.insert(key, group);
    }

    pub fn get(&self, key: &str) -> Option<&ClaimsGroup> {
        self.groups.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ClaimsGroup> {
        self.groups.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, ClaimsError> {
        &self.errors
    }

    /// Report the node while its group is invalid, clear it otherwise
    pub(crate) fn sync_report(&mut self, node: &PermissionNodeView) {
        let key = node.claims_key();
        match self.groups.get(&key).map(|g| g.status()) {
            Some(GroupStatus::Invalid) => {
                self.errors.insert(
                    key,
                    ClaimsError { page: node.page_name.clone(), category: node.menu_name.clone() },
                );
            }
            _ => {
                self.errors.remove(&key);
            }
        }
    }
}

/// Disable rule for `access`
pub fn apply_disable_rule(group: &mut ClaimsGroup, access: Option<AccessControlLevel>) {
    if access == Some(AccessControlLevel::None) {
        group.disable_all();
    } else {
        group.enable_all();
    }
}

/// Validation rule for `access`
pub fn apply_validation_rule(group: &mut ClaimsGroup, access: Option<AccessControlLevel>) {
    let require = matches!(access, Some(AccessControlLevel::Read | AccessControlLevel::ReadWrite));
    group.set_require_one(require);
    group.update_validity();
}

/// Claims state for a level pushed down by a cascade or normalization
pub fn apply_claims_for_level(group: &mut ClaimsGroup, level: AccessControlLevel) {
    if level == AccessControlLevel::None {
        group.disable_all();
        group.set_require_one(false);
    } else {
        group.enable_all();
        group.set_require_one(true);
    }
    group.update_validity();
}

/// Claim rules wired to the scheduler for one editing pass
pub(crate) struct ClaimRules<'a> {
    pub registry: &'a mut ClaimsRegistry,
    pub scheduler: &'a mut Scheduler,
    pub debounce: Duration,
}

impl ClaimRules<'_> {
    /// Rules applied when a node's access value changes
    pub fn on_access_changed(&mut self, node: &PermissionNodeView) {
        let Some(group) = self.registry.get_mut(&node.claims_key()) else {
            return;
        };
        apply_disable_rule(group, node.access);
        self.registry.sync_report(node);
        self.scheduler.debounce(Task::Validate(node.content_id), self.debounce);
    }

    /// Claims-for-level on a node set silently, with deferred revalidation
    pub fn for_level(&mut self, node: &PermissionNodeView, level: AccessControlLevel) {
        let Some(group) = self.registry.get_mut(&node.claims_key()) else {
            return;
        };
        apply_claims_for_level(group, level);
        self.registry.sync_report(node);
        self.scheduler.defer(Task::Revalidate(node.content_id));
    }

    /// Claim toggled by the user
    pub fn on_claim_changed(&mut self, node: &PermissionNodeView) {
        self.registry.sync_report(node);
        self.scheduler.debounce(Task::Validate(node.content_id), self.debounce);
    }
}

/// Run a due task against the node it names
pub(crate) fn run_task(registry: &mut ClaimsRegistry, node: &PermissionNodeView, task: Task) {
    let Some(group) = registry.get_mut(&node.claims_key()) else {
        return;
    };
    match task {
        Task::Validate(_) => apply_validation_rule(group, node.access),
        Task::Revalidate(_) => group.update_validity(),
    }
    debug!(content_id = node.content_id, status = ?group.status(), "claims revalidated");
    registry.sync_report(node);
}
