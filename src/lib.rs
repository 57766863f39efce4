//! permtree - hierarchical permission tree engine
//!
//! A permission tree is loaded from a domain `Permissions` value, mirrored
//! into a view model, normalized once, then edited:
//! - selecting a level on a parent cascades it down, downgraded per node
//! - parents summarize their children (uniformity), `None` when mixed
//! - claim checkboxes follow the node's access and the exclusivity rule
//! - the live view folds back into a working snapshot for change
//!   detection and saving
//!
//! `PermissionsEditor` is the entry point; the pieces are public for
//! callers that drive the engine themselves.

pub mod builder;
pub mod cascade;
pub mod claims;
pub mod config;
pub mod constants;
pub mod defaults;
pub mod diff;
pub mod editor;
pub mod error;
pub mod levels;
pub mod mapper;
pub mod mode;
pub mod model;
pub mod normalize;
pub mod scheduler;
pub mod search;
pub mod store;
pub mod view;

pub use builder::build_view_model;
pub use cascade::select_level;
pub use claims::{ClaimControl, ClaimsError, ClaimsGroup, ClaimsRegistry, ClaimsValidationError, GroupStatus};
pub use config::EngineConfig;
pub use constants::DEALER_PRINCIPAL;
pub use defaults::default_permissions;
pub use diff::{are_permissions_equal, flatten, permissions_changed};
pub use editor::PermissionsEditor;
pub use error::{PermissionsError, Result};
pub use levels::{ordered_levels, pick_level, uniform_level};
pub use mapper::to_permissions;
pub use mode::{PermissionMode, PermissionModeService};
pub use model::{AccessControlLevel, AdditionalClaim, ContentId, PageAccessoryCategory, PermissionPage, Permissions};
pub use normalize::normalize;
pub use scheduler::{Scheduler, Task};
pub use search::{filter_tree, ApproximateMatcher, FuzzyMatcher};
pub use store::{PermissionStore, PermissionsClient};
pub use view::{AccessOption, ClaimOption, NodeKind, PermissionNodeView, PermissionsViewModel};
