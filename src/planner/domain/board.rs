//! Grid occupancy and placement rules.

use super::{ContentIdea, IdeaId, PlannerDomainError, SlotIndex};
use std::collections::BTreeSet;

/// One idea's slot assignment produced by a placement operation.
///
/// `slot == None` returns the idea to the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChange {
    /// The idea whose placement changed.
    pub idea_id: IdeaId,
    /// The new slot, or `None` for the warehouse.
    pub slot: Option<SlotIndex>,
}

/// In-memory view of grid occupancy with the placement rules.
///
/// Built from the full idea collection; placement operations mutate the
/// view and return the [`SlotChange`] list the caller persists atomically.
/// An occupied target slot always displaces its occupant back to the
/// warehouse rather than dropping it; auto-placement onto a full grid
/// displaces the occupant of slot 0 specifically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerBoard {
    slots: Vec<Option<IdeaId>>,
    known: BTreeSet<IdeaId>,
}

impl PlannerBoard {
    /// Builds the board view from the idea collection.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::DuplicateOccupancy`] when two ideas
    /// claim the same slot.
    pub fn from_ideas<'a>(
        ideas: impl IntoIterator<Item = &'a ContentIdea>,
    ) -> Result<Self, PlannerDomainError> {
        let mut board = Self {
            slots: SlotIndex::all().map(|_| None).collect(),
            known: BTreeSet::new(),
        };
        for idea in ideas {
            board.known.insert(idea.id());
            if let Some(slot) = idea.slot() {
                if board.occupant(slot).is_some() {
                    return Err(PlannerDomainError::DuplicateOccupancy(slot));
                }
                board.set_occupant(slot, Some(idea.id()));
            }
        }
        Ok(board)
    }

    /// Returns the idea occupying the slot, if any.
    #[must_use]
    pub fn occupant(&self, slot: SlotIndex) -> Option<IdeaId> {
        self.slots
            .get(usize::from(slot.value()))
            .copied()
            .flatten()
    }

    /// Returns the slot currently holding the idea, if it is on the grid.
    #[must_use]
    pub fn slot_of(&self, idea_id: IdeaId) -> Option<SlotIndex> {
        SlotIndex::all().find(|slot| self.occupant(*slot) == Some(idea_id))
    }

    /// Returns the first unoccupied slot, if any.
    #[must_use]
    pub fn first_empty_slot(&self) -> Option<SlotIndex> {
        SlotIndex::all().find(|slot| self.occupant(*slot).is_none())
    }

    /// Returns whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.first_empty_slot().is_none()
    }

    /// Returns the ideas currently in the warehouse.
    #[must_use]
    pub fn warehouse_ids(&self) -> BTreeSet<IdeaId> {
        let placed: BTreeSet<IdeaId> = self.slots.iter().copied().flatten().collect();
        self.known.difference(&placed).copied().collect()
    }

    /// Places a warehouse idea into a specific slot, displacing any
    /// occupant back to the warehouse.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::UnknownIdea`] when the idea is not part
    /// of the board, or [`PlannerDomainError::IdeaAlreadyPlaced`] when it is
    /// already on the grid.
    pub fn place_from_warehouse(
        &mut self,
        idea_id: IdeaId,
        target: SlotIndex,
    ) -> Result<Vec<SlotChange>, PlannerDomainError> {
        self.ensure_known(idea_id)?;
        if let Some(slot) = self.slot_of(idea_id) {
            return Err(PlannerDomainError::IdeaAlreadyPlaced { idea_id, slot });
        }

        let mut changes = Vec::new();
        if let Some(displaced) = self.occupant(target) {
            changes.push(SlotChange {
                idea_id: displaced,
                slot: None,
            });
        }
        self.set_occupant(target, Some(idea_id));
        changes.push(SlotChange {
            idea_id,
            slot: Some(target),
        });
        Ok(changes)
    }

    /// Places a warehouse idea into the first empty slot; on a full grid,
    /// displaces the occupant of slot 0 and takes its place.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::UnknownIdea`] when the idea is not part
    /// of the board, or [`PlannerDomainError::IdeaAlreadyPlaced`] when it is
    /// already on the grid.
    pub fn auto_place(&mut self, idea_id: IdeaId) -> Result<Vec<SlotChange>, PlannerDomainError> {
        let target = self.first_empty_slot().unwrap_or(SlotIndex::ZERO);
        self.place_from_warehouse(idea_id, target)
    }

    /// Moves an idea between grid slots. A move onto an occupied slot swaps
    /// both ideas; a move onto an empty slot relocates the idea. Moving a
    /// slot onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::SlotEmpty`] when the source slot holds
    /// no idea.
    pub fn move_within(
        &mut self,
        from: SlotIndex,
        to: SlotIndex,
    ) -> Result<Vec<SlotChange>, PlannerDomainError> {
        let moving = self
            .occupant(from)
            .ok_or(PlannerDomainError::SlotEmpty(from))?;
        if from == to {
            return Ok(Vec::new());
        }

        let other = self.occupant(to);
        self.set_occupant(to, Some(moving));
        self.set_occupant(from, other);

        let mut changes = vec![SlotChange {
            idea_id: moving,
            slot: Some(to),
        }];
        if let Some(swapped) = other {
            changes.push(SlotChange {
                idea_id: swapped,
                slot: Some(from),
            });
        }
        Ok(changes)
    }

    /// Returns a placed idea to the warehouse, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::UnknownIdea`] when the idea is not part
    /// of the board, or [`PlannerDomainError::IdeaNotOnBoard`] when it is
    /// already in the warehouse.
    pub fn release(&mut self, idea_id: IdeaId) -> Result<Vec<SlotChange>, PlannerDomainError> {
        self.ensure_known(idea_id)?;
        let slot = self
            .slot_of(idea_id)
            .ok_or(PlannerDomainError::IdeaNotOnBoard(idea_id))?;
        self.set_occupant(slot, None);
        Ok(vec![SlotChange {
            idea_id,
            slot: None,
        }])
    }

    fn ensure_known(&self, idea_id: IdeaId) -> Result<(), PlannerDomainError> {
        if !self.known.contains(&idea_id) {
            return Err(PlannerDomainError::UnknownIdea(idea_id));
        }
        Ok(())
    }

    fn set_occupant(&mut self, slot: SlotIndex, value: Option<IdeaId>) {
        if let Some(cell) = self.slots.get_mut(usize::from(slot.value())) {
            *cell = value;
        }
    }
}
