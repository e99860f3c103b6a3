//! Planner orchestration service.
//!
//! Every placement operation loads the idea collection, replays it into a
//! [`PlannerBoard`], applies one placement rule, and persists the resulting
//! slot changes as a single atomic batch.

use crate::planner::{
    domain::{
        ContentIdea, IdeaDraft, IdeaId, IdeaTitle, PlannerBoard, PlannerDomainError, SlotIndex,
    },
    ports::{PlannerRepository, PlannerRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a content idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIdeaRequest {
    title: String,
    notes: Option<String>,
}

impl CreateIdeaRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: None,
        }
    }

    /// Sets free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Service-level errors for planner operations.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Domain validation or placement rule failure.
    #[error(transparent)]
    Domain(#[from] PlannerDomainError),
    /// Repository operation failure.
    #[error(transparent)]
    Repository(#[from] PlannerRepositoryError),
    /// The idea does not exist.
    #[error("idea not found: {0}")]
    IdeaNotFound(IdeaId),
}

/// Result type for planner service operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Materialised view of the grid and warehouse for clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    slots: Vec<Option<ContentIdea>>,
    warehouse: Vec<ContentIdea>,
}

impl BoardSnapshot {
    /// Returns the grid slots in index order.
    #[must_use]
    pub fn slots(&self) -> &[Option<ContentIdea>] {
        &self.slots
    }

    /// Returns the idea in the given slot, if any.
    #[must_use]
    pub fn slot(&self, slot: SlotIndex) -> Option<&ContentIdea> {
        self.slots
            .get(usize::from(slot.value()))
            .and_then(Option::as_ref)
    }

    /// Returns the warehouse pool in creation order.
    #[must_use]
    pub fn warehouse(&self) -> &[ContentIdea] {
        &self.warehouse
    }
}

/// Planner orchestration service.
pub struct PlannerService<R, C>
where
    R: PlannerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> PlannerService<R, C>
where
    R: PlannerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new planner service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates an idea in the warehouse.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the title is empty or persistence
    /// fails.
    pub async fn create_idea(&self, request: CreateIdeaRequest) -> PlannerResult<ContentIdea> {
        let title = IdeaTitle::new(request.title)?;
        let mut draft = IdeaDraft::new(title);
        if let Some(notes) = request.notes {
            draft = draft.with_notes(notes);
        }
        let idea = ContentIdea::new(draft, &*self.clock);
        self.repository.store(&idea).await?;
        tracing::debug!(idea_id = %idea.id(), "content idea created");
        Ok(idea)
    }

    /// Moves a warehouse idea into a specific slot, displacing any occupant
    /// back to the warehouse; an idea already on the grid is moved with swap
    /// semantics instead.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the idea is missing, a placement rule
    /// rejects the move, or persistence fails.
    pub async fn assign_to_slot(
        &self,
        idea_id: IdeaId,
        target: SlotIndex,
    ) -> PlannerResult<BoardSnapshot> {
        let ideas = self.repository.list_all().await?;
        let mut board = PlannerBoard::from_ideas(&ideas)?;
        ensure_exists(&ideas, idea_id)?;

        // Both arms mutate the board, so this cannot be a combinator chain.
        let changes = match board.slot_of(idea_id) {
            Some(current) => board.move_within(current, target)?,
            None => board.place_from_warehouse(idea_id, target)?,
        };
        self.repository.apply_placements(&changes).await?;
        self.snapshot().await
    }

    /// Moves a warehouse idea into the first empty slot; on a full grid the
    /// occupant of slot 0 is displaced back to the warehouse.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the idea is missing, already placed, or
    /// persistence fails.
    pub async fn auto_assign(&self, idea_id: IdeaId) -> PlannerResult<BoardSnapshot> {
        let ideas = self.repository.list_all().await?;
        let mut board = PlannerBoard::from_ideas(&ideas)?;
        ensure_exists(&ideas, idea_id)?;

        let changes = board.auto_place(idea_id)?;
        self.repository.apply_placements(&changes).await?;
        self.snapshot().await
    }

    /// Moves an idea between grid slots, swapping with any occupant.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the source slot is empty or persistence
    /// fails.
    pub async fn move_within_grid(
        &self,
        from: SlotIndex,
        to: SlotIndex,
    ) -> PlannerResult<BoardSnapshot> {
        let ideas = self.repository.list_all().await?;
        let mut board = PlannerBoard::from_ideas(&ideas)?;

        let changes = board.move_within(from, to)?;
        self.repository.apply_placements(&changes).await?;
        self.snapshot().await
    }

    /// Returns a placed idea to the warehouse, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the idea is missing, not on the grid,
    /// or persistence fails.
    pub async fn return_to_warehouse(&self, idea_id: IdeaId) -> PlannerResult<BoardSnapshot> {
        let ideas = self.repository.list_all().await?;
        let mut board = PlannerBoard::from_ideas(&ideas)?;
        ensure_exists(&ideas, idea_id)?;

        let changes = board.release(idea_id)?;
        self.repository.apply_placements(&changes).await?;
        self.snapshot().await
    }

    /// Sets or clears an idea's scheduled date without touching its slot.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the idea is missing or persistence
    /// fails.
    pub async fn schedule(
        &self,
        idea_id: IdeaId,
        date: Option<NaiveDate>,
    ) -> PlannerResult<ContentIdea> {
        let mut idea = self
            .repository
            .find_by_id(idea_id)
            .await?
            .ok_or(PlannerError::IdeaNotFound(idea_id))?;
        idea.schedule(date, &*self.clock);
        self.repository.update(&idea).await?;
        Ok(idea)
    }

    /// Removes an idea; a placed idea's slot is freed by its removal.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when the idea is missing or persistence
    /// fails.
    pub async fn delete_idea(&self, idea_id: IdeaId) -> PlannerResult<()> {
        match self.repository.delete(idea_id).await {
            Ok(()) => Ok(()),
            Err(PlannerRepositoryError::NotFound(id)) => Err(PlannerError::IdeaNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the current grid and warehouse view.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Repository`] when the lookup fails.
    pub async fn board(&self) -> PlannerResult<BoardSnapshot> {
        self.snapshot().await
    }

    async fn snapshot(&self) -> PlannerResult<BoardSnapshot> {
        let ideas = self.repository.list_all().await?;
        let mut slots: Vec<Option<ContentIdea>> = SlotIndex::all().map(|_| None).collect();
        let mut warehouse = Vec::new();
        for idea in ideas {
            match idea.slot() {
                Some(slot) => {
                    if let Some(cell) = slots.get_mut(usize::from(slot.value())) {
                        *cell = Some(idea);
                    }
                }
                None => warehouse.push(idea),
            }
        }
        Ok(BoardSnapshot { slots, warehouse })
    }
}

fn ensure_exists(ideas: &[ContentIdea], idea_id: IdeaId) -> PlannerResult<()> {
    if !ideas.iter().any(|idea| idea.id() == idea_id) {
        return Err(PlannerError::IdeaNotFound(idea_id));
    }
    Ok(())
}

impl<R, C> Clone for PlannerService<R, C>
where
    R: PlannerRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}
