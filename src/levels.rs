//! Level picking and uniformity
//!
//! Level picking never escalates: a child receives the strongest level it
//! supports that is not stronger than what its parent granted. Uniformity
//! asks the inverse question: which single parent level, cascaded, would
//! reproduce the children's current values?

use crate::model::{AccessControlLevel, PageAccessoryCategory};

/// Distinct levels present in the categories, strongest first
pub fn ordered_levels(categories: &[PageAccessoryCategory]) -> Vec<AccessControlLevel> {
    let mut levels: Vec<_> = categories.iter().map(|c| c.access).collect();
    levels.sort_by(|a, b| b.cmp(a));
    levels.dedup();
    levels
}

/// Strongest level `supported` allows that is not stronger than `selected`.
/// `None` when nothing matches or there is no child.
pub fn pick_level(
    selected: AccessControlLevel,
    supported: Option<&[AccessControlLevel]>,
    categories: &[PageAccessoryCategory],
) -> AccessControlLevel {
    let Some(supported) = supported else {
        return AccessControlLevel::None;
    };
    ordered_levels(categories)
        .into_iter()
        .filter(|l| *l <= selected)
        .find(|l| supported.contains(l))
        .unwrap_or(AccessControlLevel::None)
}

/// Non-cascading variant: the selected level if supported, otherwise `None`
#[inline]
pub fn pick_level_strict(selected: AccessControlLevel, supported: &[AccessControlLevel]) -> AccessControlLevel {
    if supported.contains(&selected) {
        selected
    } else {
        AccessControlLevel::None
    }
}

/// Level a child receives when its parent is set to `selected`
#[inline]
pub fn level_for_child(
    selected: AccessControlLevel,
    supported: &[AccessControlLevel],
    categories: &[PageAccessoryCategory],
    strict: bool,
) -> AccessControlLevel {
    if strict {
        pick_level_strict(selected, supported)
    } else {
        pick_level(selected, Some(supported), categories)
    }
}

/// Parent summary of its children: the weakest candidate level whose
/// cascade result equals every child's current value, or `None` (mixed).
pub fn uniform_level<'a, I>(children: I, categories: &[PageAccessoryCategory], strict: bool) -> Option<AccessControlLevel>
where
    I: IntoIterator<Item = (Option<AccessControlLevel>, &'a [AccessControlLevel])>,
    I::IntoIter: Clone,
{
    let children = children.into_iter();
    let mut candidates = ordered_levels(categories);
    candidates.reverse();
    candidates.into_iter().find(|&candidate| {
        children
            .clone()
            .all(|(actual, supported)| actual == Some(level_for_child(candidate, supported, categories, strict)))
    })
}
