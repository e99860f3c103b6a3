//! Repository port for content idea persistence.

use crate::planner::domain::{ContentIdea, IdeaId, SlotChange};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planner repository operations.
pub type PlannerRepositoryResult<T> = Result<T, PlannerRepositoryError>;

/// Content idea persistence contract.
#[async_trait]
pub trait PlannerRepository: Send + Sync {
    /// Stores a new idea.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerRepositoryError::DuplicateIdea`] when the idea ID
    /// already exists.
    async fn store(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()>;

    /// Persists changes to an existing idea (title, notes, schedule).
    ///
    /// # Errors
    ///
    /// Returns [`PlannerRepositoryError::NotFound`] when the idea does not
    /// exist.
    async fn update(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()>;

    /// Finds an idea by identifier.
    ///
    /// Returns `None` when the idea does not exist.
    async fn find_by_id(&self, id: IdeaId) -> PlannerRepositoryResult<Option<ContentIdea>>;

    /// Returns every idea, placed and warehoused, in creation order.
    async fn list_all(&self) -> PlannerRepositoryResult<Vec<ContentIdea>>;

    /// Applies a batch of slot assignments atomically: either every change
    /// persists or none do.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerRepositoryError::NotFound`] when any referenced idea
    /// does not exist.
    async fn apply_placements(&self, changes: &[SlotChange]) -> PlannerRepositoryResult<()>;

    /// Removes an idea. Deleting a placed idea frees its slot.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerRepositoryError::NotFound`] when the idea does not
    /// exist.
    async fn delete(&self, id: IdeaId) -> PlannerRepositoryResult<()>;
}

/// Errors returned by planner repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlannerRepositoryError {
    /// An idea with the same identifier already exists.
    #[error("duplicate idea identifier: {0}")]
    DuplicateIdea(IdeaId),

    /// The idea was not found.
    #[error("idea not found: {0}")]
    NotFound(IdeaId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlannerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
