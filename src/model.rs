//! Domain permission types
//!
//! `Permissions` is the persistable unit exchanged with the fetch and
//! update collaborators. Field names follow the backend's camelCase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable unique key of a permission node
pub type ContentId = u64;

/// Access level, ordered by strength: `None < Read < ReadWrite`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum AccessControlLevel {
    #[default]
    None,
    Read,
    ReadWrite,
}

impl AccessControlLevel {
    pub const ALL: [AccessControlLevel; 3] =
        [AccessControlLevel::None, AccessControlLevel::Read, AccessControlLevel::ReadWrite];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessControlLevel::None => "None",
            AccessControlLevel::Read => "Read",
            AccessControlLevel::ReadWrite => "ReadWrite",
        }
    }
}

impl fmt::Display for AccessControlLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessControlLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "None" => Ok(AccessControlLevel::None),
            "Read" => Ok(AccessControlLevel::Read),
            "ReadWrite" => Ok(AccessControlLevel::ReadWrite),
            other => Err(format!("unknown access level '{}'", other)),
        }
    }
}

/// One access level plus its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAccessoryCategory {
    pub access: AccessControlLevel,
    #[serde(default)]
    pub label: String,
}

impl PageAccessoryCategory {
    pub fn new(access: AccessControlLevel, label: impl Into<String>) -> Self {
        Self { access, label: label.into() }
    }
}

/// Named boolean sub-permission of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalClaim {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_selected: bool,
}

/// One permission-able menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPage {
    pub content_id: ContentId,
    pub menu_name: String,
    #[serde(default)]
    pub access: AccessControlLevel,
    #[serde(default)]
    pub available_page_access_types: Vec<PageAccessoryCategory>,
    #[serde(default)]
    pub additional_claims: Vec<AdditionalClaim>,
    #[serde(default)]
    pub children: Vec<PermissionPage>,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl PermissionPage {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Levels this node declares for itself
    pub fn declared_levels(&self) -> Vec<AccessControlLevel> {
        let mut levels: Vec<_> = self.available_page_access_types.iter().map(|c| c.access).collect();
        levels.sort();
        levels.dedup();
        levels
    }

    /// Declared levels plus every level a descendant supports
    pub fn supported_levels(&self) -> Vec<AccessControlLevel> {
        let mut levels = self.declared_levels();
        for child in &self.children {
            levels.extend(child.supported_levels());
        }
        levels.sort();
        levels.dedup();
        levels
    }

    /// Depth-first search of this subtree
    pub fn find(&self, id: ContentId) -> Option<&PermissionPage> {
        if self.content_id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ContentId) -> Option<&mut PermissionPage> {
        if self.content_id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

/// Authoritative, persistable permission set of one user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub pages: Vec<PermissionPage>,
    #[serde(default)]
    pub page_access_categories: Vec<PageAccessoryCategory>,
}

impl Permissions {
    pub fn find(&self, id: ContentId) -> Option<&PermissionPage> {
        self.pages.iter().find_map(|p| p.find(id))
    }

    pub fn find_mut(&mut self, id: ContentId) -> Option<&mut PermissionPage> {
        self.pages.iter_mut().find_map(|p| p.find_mut(id))
    }
}
