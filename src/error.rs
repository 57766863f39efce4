//! Error types for permtree

use crate::model::{AccessControlLevel, ContentId};

/// The main error type for permtree operations
#[derive(Debug, thiserror::Error)]
pub enum PermissionsError {
    #[error("node {0} not found")]
    NodeNotFound(ContentId),

    #[error("claim '{claim}' not found on node {content_id}")]
    ClaimNotFound { content_id: ContentId, claim: String },

    #[error("claim '{claim}' is disabled on node {content_id}")]
    ClaimDisabled { content_id: ContentId, claim: String },

    #[error("access level {level} is not available on node {content_id}")]
    LevelUnavailable { content_id: ContentId, level: AccessControlLevel },

    #[error("no permissions loaded")]
    NotLoaded,

    #[error("no stored permissions for {dealer}/{user}")]
    NotFound { dealer: String, user: String },

    #[error("{0} claim group(s) require at least one selected claim")]
    InvalidClaims(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for permtree operations
pub type Result<T> = std::result::Result<T, PermissionsError>;

/// Convert any storage-layer error to PermissionsError
pub(crate) fn err<E: std::error::Error>(e: E) -> PermissionsError {
    PermissionsError::Storage(e.to_string())
}
