//! In-memory repository for planner tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::planner::{
    domain::{ContentIdea, IdeaId, SlotChange},
    ports::{PlannerRepository, PlannerRepositoryError, PlannerRepositoryResult},
};

/// Thread-safe in-memory planner repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlannerRepository {
    state: Arc<RwLock<HashMap<IdeaId, ContentIdea>>>,
}

impl InMemoryPlannerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> PlannerRepositoryError {
    PlannerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PlannerRepository for InMemoryPlannerRepository {
    async fn store(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&idea.id()) {
            return Err(PlannerRepositoryError::DuplicateIdea(idea.id()));
        }
        state.insert(idea.id(), idea.clone());
        Ok(())
    }

    async fn update(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&idea.id()) {
            return Err(PlannerRepositoryError::NotFound(idea.id()));
        }
        state.insert(idea.id(), idea.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IdeaId) -> PlannerRepositoryResult<Option<ContentIdea>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> PlannerRepositoryResult<Vec<ContentIdea>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut ideas: Vec<ContentIdea> = state.values().cloned().collect();
        ideas.sort_by_key(ContentIdea::created_at);
        Ok(ideas)
    }

    async fn apply_placements(&self, changes: &[SlotChange]) -> PlannerRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        // Validate the whole batch before mutating so the application is
        // all-or-nothing.
        for change in changes {
            if !state.contains_key(&change.idea_id) {
                return Err(PlannerRepositoryError::NotFound(change.idea_id));
            }
        }
        for change in changes {
            if let Some(idea) = state.get_mut(&change.idea_id) {
                idea.set_slot(change.slot);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: IdeaId) -> PlannerRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .ok_or(PlannerRepositoryError::NotFound(id))?;
        Ok(())
    }
}
