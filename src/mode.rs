//! Permission mode state machine
//!
//! Four snapshot slots feed one active value:
//! - `original`: last fetched or saved truth
//! - `default`: derived from the user's departments and `original`
//! - `copied`: fetched from another user
//! - `working`: the live save candidate, written only by the editor
//!
//! The mode picks which slot becomes active. When that slot is empty the
//! previous active value is kept. Writing the mode, or the slot the mode
//! reads from, always feeds the active value again, even when the new
//! snapshot equals the old one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::defaults::default_permissions;
use crate::diff::permissions_changed;
use crate::model::Permissions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PermissionMode {
    Copy,
    Default,
    /// Also the fallback for unset or unrecognized modes
    #[default]
    Manual,
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PermissionMode::Copy => "Copy",
            PermissionMode::Default => "Default",
            PermissionMode::Manual => "Manual",
        })
    }
}

impl FromStr for PermissionMode {
    type Err = std::convert::Infallible;

    /// Unrecognized names resolve to `Manual`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "copy" => PermissionMode::Copy,
            "default" => PermissionMode::Default,
            _ => PermissionMode::Manual,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionModeService {
    mode: Option<PermissionMode>,
    user_departments: Vec<String>,
    original: Option<Permissions>,
    default: Option<Permissions>,
    copied: Option<Permissions>,
    working: Option<Permissions>,
    active: Option<Permissions>,
    /// Mode or its source slot written since the last resolve
    stale: bool,
}

impl PermissionModeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, `Manual` when unset
    #[inline]
    pub fn mode(&self) -> PermissionMode {
        self.mode.unwrap_or_default()
    }

    pub fn set_mode(&mut self, mode: Option<PermissionMode>) {
        info!(mode = ?mode, "permission mode set");
        self.mode = mode;
        self.stale = true;
    }

    pub fn original(&self) -> Option<&Permissions> {
        self.original.as_ref()
    }

    pub fn default_permissions(&self) -> Option<&Permissions> {
        self.default.as_ref()
    }

    pub fn copied(&self) -> Option<&Permissions> {
        self.copied.as_ref()
    }

    pub fn working(&self) -> Option<&Permissions> {
        self.working.as_ref()
    }

    pub fn active(&self) -> Option<&Permissions> {
        self.active.as_ref()
    }

    pub fn user_departments(&self) -> &[String] {
        &self.user_departments
    }

    /// New fetched or saved truth; defaults follow its structure
    pub fn set_original(&mut self, permissions: Option<Permissions>) {
        self.original = permissions;
        self.refresh_defaults();
        self.mark_if(PermissionMode::Manual);
    }

    pub fn set_copied(&mut self, permissions: Option<Permissions>) {
        self.copied = permissions;
        self.mark_if(PermissionMode::Copy);
    }

    pub fn set_user_departments(&mut self, departments: Vec<String>) {
        self.user_departments = departments;
        self.refresh_defaults();
    }

    pub fn set_working(&mut self, permissions: Option<Permissions>) {
        self.working = permissions;
    }

    fn refresh_defaults(&mut self) {
        self.default = self
            .original
            .as_ref()
            .map(|p| default_permissions(p, &self.user_departments));
        self.mark_if(PermissionMode::Default);
    }

    #[inline]
    fn mark_if(&mut self, source: PermissionMode) {
        if self.mode() == source {
            self.stale = true;
        }
    }

    /// Snapshot the current mode prefers
    pub fn preferred(&self) -> Option<&Permissions> {
        match self.mode() {
            PermissionMode::Copy => self.copied.as_ref(),
            PermissionMode::Default => self.default.as_ref(),
            PermissionMode::Manual => self.original.as_ref(),
        }
    }

    /// Feed the preferred snapshot into the active slot. Returns true when
    /// the view must be rebuilt: the mode or its source slot was written,
    /// or the active value changed.
    pub fn resolve(&mut self) -> bool {
        let stale = std::mem::take(&mut self.stale);
        let next = match self.preferred() {
            Some(p) => p.clone(),
            None => {
                debug!(mode = %self.mode(), "preferred snapshot missing, keeping active permissions");
                return false;
            }
        };
        if !stale && self.active.as_ref() == Some(&next) {
            return false;
        }
        self.active = Some(next);
        true
    }

    /// Whether the working snapshot differs from the original
    pub fn permissions_changed(&self) -> bool {
        permissions_changed(self.working.as_ref(), self.original.as_ref())
    }
}
