//! View-model tree mirroring the domain permission tree
//!
//! Built fresh from a `Permissions` value, mutated in place by the
//! normalization, cascade and claim rules, and folded back into the
//! domain by the mapper. Never persisted directly.

use crate::claims::ClaimsRegistry;
use crate::model::{AccessControlLevel, ContentId, PageAccessoryCategory};

/// Position of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Direct child of `Permissions.pages`
    Page,
    /// Nested node with children
    Category,
    Leaf,
}

/// Selectable access choice of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOption {
    pub level: AccessControlLevel,
    pub label: String,
    pub disabled: bool,
}

/// Display data of one claim checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermissionNodeView {
    pub content_id: ContentId,
    pub menu_name: String,
    /// Menu name of the top-level page this node belongs to
    pub page_name: String,
    pub kind: NodeKind,
    /// `None` means mixed (aggregate nodes only)
    pub access: Option<AccessControlLevel>,
    pub access_options: Vec<AccessOption>,
    /// Levels this node declares for itself, ascending
    pub supported: Vec<AccessControlLevel>,
    pub claim_options: Vec<ClaimOption>,
    pub children: Vec<PermissionNodeView>,
}

impl PermissionNodeView {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn has_claims(&self) -> bool {
        !self.claim_options.is_empty()
    }

    /// Key of this node's claim group in the root container
    #[inline]
    pub fn claims_key(&self) -> String {
        self.content_id.to_string()
    }

    pub fn option(&self, level: AccessControlLevel) -> Option<&AccessOption> {
        self.access_options.iter().find(|o| o.level == level)
    }

    /// Options paired with whether each is the current selection
    pub fn option_states(&self) -> impl Iterator<Item = (&AccessOption, bool)> + '_ {
        self.access_options.iter().map(move |o| (o, self.access == Some(o.level)))
    }

    pub fn find(&self, id: ContentId) -> Option<&PermissionNodeView> {
        if self.content_id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Child indices leading from this node to `id`
    fn path_to(&self, id: ContentId, path: &mut Vec<usize>) -> bool {
        if self.content_id == id {
            return true;
        }
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            if child.path_to(id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Every node of this subtree, parents before children
    pub fn walk(&self) -> Vec<&PermissionNodeView> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub(crate) fn children_state(&self) -> impl Iterator<Item = (Option<AccessControlLevel>, &[AccessControlLevel])> + Clone + '_ {
        self.children.iter().map(|c| (c.access, c.supported.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermissionsViewModel {
    pub pages: Vec<PermissionNodeView>,
    pub page_access_categories: Vec<PageAccessoryCategory>,
    /// Root claims container, keyed by `contentId`
    pub claims: ClaimsRegistry,
}

impl PermissionsViewModel {
    pub fn find(&self, id: ContentId) -> Option<&PermissionNodeView> {
        self.pages.iter().find_map(|p| p.find(id))
    }

    /// Index path from the root list to `id`
    pub fn path_of(&self, id: ContentId) -> Option<Vec<usize>> {
        for (i, page) in self.pages.iter().enumerate() {
            let mut path = vec![i];
            if page.path_to(id, &mut path) {
                return Some(path);
            }
        }
        None
    }

    pub fn nodes(&self) -> Vec<&PermissionNodeView> {
        self.pages.iter().flat_map(|p| p.walk()).collect()
    }
}

/// Resolve an index path against a list of nodes
pub(crate) fn node_at_mut<'a>(nodes: &'a mut [PermissionNodeView], path: &[usize]) -> Option<&'a mut PermissionNodeView> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get_mut(*first)?;
    for &i in rest {
        node = node.children.get_mut(i)?;
    }
    Some(node)
}
