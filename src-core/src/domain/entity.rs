//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities have a unique ID and can be patched in place.

use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Partial update accepted by the repository
    type Patch: Send;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;

    /// Apply a patch in place. The id is never touched.
    fn apply(&mut self, patch: Self::Patch);
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Invalid form input. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("请填写姓名")]
    EmptyName,
    #[error("请填写电话号码")]
    EmptyPhone,
    #[error("请输入有效的电话号码")]
    InvalidPhone(String),
    #[error("缺少参数: {0}")]
    MissingParam(&'static str),
}

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Corrupted data: {0}")]
    Deserialization(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Cannot open dialer: {0}")]
    Dialer(String),
    #[error("Speech failed: {0}")]
    Speech(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Invalid settings: {0}")]
    Config(String),
}

impl DomainError {
    /// Whether the failure came from the persisted data rather than user input
    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::Storage(_) | DomainError::Deserialization(_))
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
