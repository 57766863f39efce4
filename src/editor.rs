//! Editing session
//!
//! Ties the engine together through explicit update points:
//! - on-load and on-mode-switch: resolve the active snapshot, rebuild
//!   and normalize the view when it changed
//! - on-user-edit: cascade or toggle, then republish working permissions
//! - on-tick: run deferred and debounced claim validation

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::builder::build_view_model;
use crate::cascade::select_level;
use crate::claims::{run_task, ClaimRules, ClaimsError};
use crate::config::EngineConfig;
use crate::error::{PermissionsError, Result};
use crate::mapper::to_permissions;
use crate::mode::{PermissionMode, PermissionModeService};
use crate::model::{AccessControlLevel, ContentId, Permissions};
use crate::normalize::normalize;
use crate::scheduler::Scheduler;
use crate::search::{filter_tree, ApproximateMatcher, FuzzyMatcher};
use crate::store::PermissionsClient;
use crate::view::{PermissionNodeView, PermissionsViewModel};

pub struct PermissionsEditor {
    config: EngineConfig,
    modes: PermissionModeService,
    view: Option<PermissionsViewModel>,
    scheduler: Scheduler,
    matcher: ApproximateMatcher,
}

impl PermissionsEditor {
    pub fn new(config: EngineConfig) -> Self {
        let matcher = ApproximateMatcher::from_config(&config);
        Self { config, modes: PermissionModeService::new(), view: None, scheduler: Scheduler::new(), matcher }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn modes(&self) -> &PermissionModeService {
        &self.modes
    }

    pub fn view(&self) -> Option<&PermissionsViewModel> {
        self.view.as_ref()
    }

    pub fn node(&self, id: ContentId) -> Option<&PermissionNodeView> {
        self.view.as_ref()?.find(id)
    }

    pub fn working(&self) -> Option<&Permissions> {
        self.modes.working()
    }

    pub fn permissions_changed(&self) -> bool {
        self.modes.permissions_changed()
    }

    /// Reported `(page, category)` claim errors keyed by `contentId`
    pub fn claim_errors(&self) -> BTreeMap<String, ClaimsError> {
        self.view.as_ref().map(|v| v.claims.errors().clone()).unwrap_or_default()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    // on-load

    pub fn load_original(&mut self, permissions: Permissions) {
        self.modes.set_original(Some(permissions));
        self.sync();
    }

    pub fn load_copied(&mut self, permissions: Permissions) {
        self.modes.set_copied(Some(permissions));
        self.sync();
    }

    pub fn set_user_departments(&mut self, departments: Vec<String>) {
        self.modes.set_user_departments(departments);
        self.sync();
    }

    pub fn load_from<C: PermissionsClient>(&mut self, client: &C, dealer: &str, user: &str) -> Result<()> {
        let permissions = client.fetch(dealer, user)?;
        self.load_original(permissions);
        Ok(())
    }

    /// Fetch another user's permissions as the copy source
    pub fn copy_from<C: PermissionsClient>(&mut self, client: &C, dealer: &str, other_user: &str) -> Result<()> {
        let permissions = client.fetch(dealer, other_user)?;
        self.load_copied(permissions);
        Ok(())
    }

    // on-mode-switch

    pub fn set_mode(&mut self, mode: Option<PermissionMode>) {
        self.modes.set_mode(mode);
        self.sync();
    }

    /// Rebuild when the active snapshot changed
    fn sync(&mut self) {
        if self.modes.resolve() {
            self.rebuild();
        }
    }

    /// Discard the view and rebuild it from the active snapshot
    pub fn reset(&mut self) {
        self.view = None;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.scheduler.clear();
        let Some(active) = self.modes.active() else {
            return;
        };
        let mut vm = build_view_model(active, &self.config);
        let changed = normalize(&mut vm, active, &self.config, &mut self.scheduler);
        info!(mode = %self.modes.mode(), pages = vm.pages.len(), normalized = changed, "permission view rebuilt");
        self.view = Some(vm);
        self.publish();
    }

    /// Fold the view into the working snapshot
    fn publish(&mut self) {
        let working = match (&self.view, self.modes.active()) {
            (Some(vm), Some(active)) => Some(to_permissions(vm, active)),
            _ => None,
        };
        self.modes.set_working(working);
    }

    // on-user-edit

    pub fn set_access(&mut self, id: ContentId, level: AccessControlLevel) -> Result<()> {
        let vm = self.view.as_mut().ok_or(PermissionsError::NotLoaded)?;
        select_level(vm, id, level, &self.config, &mut self.scheduler)?;
        self.publish();
        Ok(())
    }

    pub fn toggle_claim(&mut self, id: ContentId, claim: &str, selected: bool) -> Result<()> {
        let vm = self.view.as_mut().ok_or(PermissionsError::NotLoaded)?;
        let node = vm.find(id).ok_or(PermissionsError::NodeNotFound(id))?.clone();
        let group = vm
            .claims
            .get_mut(&node.claims_key())
            .ok_or_else(|| PermissionsError::ClaimNotFound { content_id: id, claim: claim.to_string() })?;
        group.toggle(id, claim, selected)?;
        let mut rules = ClaimRules {
            registry: &mut vm.claims,
            scheduler: &mut self.scheduler,
            debounce: self.config.validation_debounce(),
        };
        rules.on_claim_changed(&node);
        self.publish();
        Ok(())
    }

    pub fn search(&self, term: &str) -> Vec<PermissionNodeView> {
        self.search_with(term, &self.matcher)
    }

    pub fn search_with<M: FuzzyMatcher>(&self, term: &str, matcher: &M) -> Vec<PermissionNodeView> {
        match &self.view {
            Some(vm) => filter_tree(&vm.pages, term, matcher),
            None => Vec::new(),
        }
    }

    // on-tick

    /// Run tasks due now (deferred revalidation)
    pub fn tick(&mut self) {
        let Some(vm) = self.view.as_mut() else {
            return;
        };
        loop {
            let due = self.scheduler.drain_due();
            if due.is_empty() {
                break;
            }
            for task in due {
                match vm.find(task.content_id()).cloned() {
                    Some(node) => run_task(&mut vm.claims, &node, task),
                    None => warn!(content_id = task.content_id(), "scheduled task for missing node"),
                }
            }
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.scheduler.advance(by);
        self.tick();
    }

    /// Run every pending task, debounced ones included
    pub fn settle(&mut self) {
        self.tick();
        if let Some(horizon) = self.scheduler.horizon() {
            let wait = horizon.saturating_sub(self.scheduler.now());
            self.advance(wait);
        }
    }

    // save

    /// Send working pages to the update collaborator and promote them to
    /// the original snapshot. Refused while any claim group is invalid.
    pub fn save<C: PermissionsClient>(&mut self, client: &C, dealer: &str, user: &str) -> Result<()> {
        self.settle();
        let errors = self.claim_errors();
        if !errors.is_empty() {
            debug!(invalid = errors.len(), "save refused");
            return Err(PermissionsError::InvalidClaims(errors.len()));
        }
        let working = self.modes.working().cloned().ok_or(PermissionsError::NotLoaded)?;
        client.update(dealer, user, &working.pages)?;
        info!(dealer, user, "permissions saved");
        self.modes.set_original(Some(working));
        self.sync();
        Ok(())
    }
}

impl Default for PermissionsEditor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
