//! `PostgreSQL` repository implementation for planner persistence.

use super::{
    models::{IdeaChangeset, IdeaRow, NewIdeaRow},
    schema::content_ideas,
};
use crate::planner::{
    domain::{ContentIdea, IdeaId, IdeaTitle, PersistedIdeaData, SlotChange, SlotIndex},
    ports::{PlannerRepository, PlannerRepositoryError, PlannerRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by planner adapters.
pub type PlannerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed planner repository.
#[derive(Debug, Clone)]
pub struct PostgresPlannerRepository {
    pool: PlannerPgPool,
}

impl From<DieselError> for PlannerRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresPlannerRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PlannerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PlannerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlannerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PlannerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PlannerRepositoryError::persistence)?
    }
}

#[async_trait]
impl PlannerRepository for PostgresPlannerRepository {
    async fn store(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()> {
        let idea_id = idea.id();
        let new_row = to_new_row(idea);

        self.run_blocking(move |connection| {
            diesel::insert_into(content_ideas::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        PlannerRepositoryError::DuplicateIdea(idea_id)
                    }
                    _ => PlannerRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, idea: &ContentIdea) -> PlannerRepositoryResult<()> {
        let idea_id = idea.id();
        let changeset = to_changeset(idea);

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                content_ideas::table.filter(content_ideas::id.eq(idea_id.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(PlannerRepositoryError::persistence)?;
            if affected == 0 {
                return Err(PlannerRepositoryError::NotFound(idea_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: IdeaId) -> PlannerRepositoryResult<Option<ContentIdea>> {
        self.run_blocking(move |connection| {
            let row = content_ideas::table
                .filter(content_ideas::id.eq(id.into_inner()))
                .select(IdeaRow::as_select())
                .first::<IdeaRow>(connection)
                .optional()
                .map_err(PlannerRepositoryError::persistence)?;
            row.map(row_to_idea).transpose()
        })
        .await
    }

    async fn list_all(&self) -> PlannerRepositoryResult<Vec<ContentIdea>> {
        self.run_blocking(move |connection| {
            let rows = content_ideas::table
                .order(content_ideas::created_at.asc())
                .select(IdeaRow::as_select())
                .load::<IdeaRow>(connection)
                .map_err(PlannerRepositoryError::persistence)?;
            rows.into_iter().map(row_to_idea).collect()
        })
        .await
    }

    async fn apply_placements(&self, changes: &[SlotChange]) -> PlannerRepositoryResult<()> {
        let assignments: Vec<(uuid::Uuid, Option<i16>)> = changes
            .iter()
            .map(|change| {
                (
                    change.idea_id.into_inner(),
                    change.slot.map(|slot| i16::from(slot.value())),
                )
            })
            .collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, PlannerRepositoryError, _>(|transaction| {
                for (id, assigned_slot) in &assignments {
                    let affected =
                        diesel::update(content_ideas::table.filter(content_ideas::id.eq(*id)))
                            .set(content_ideas::slot.eq(*assigned_slot))
                            .execute(transaction)?;
                    if affected == 0 {
                        return Err(PlannerRepositoryError::NotFound(IdeaId::from_uuid(*id)));
                    }
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: IdeaId) -> PlannerRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(
                content_ideas::table.filter(content_ideas::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(PlannerRepositoryError::persistence)?;
            if affected == 0 {
                return Err(PlannerRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(idea: &ContentIdea) -> NewIdeaRow {
    NewIdeaRow {
        id: idea.id().into_inner(),
        title: idea.title().as_str().to_owned(),
        notes: idea.notes().map(str::to_owned),
        slot: idea.slot().map(|slot| i16::from(slot.value())),
        scheduled_date: idea.scheduled_date(),
        created_at: idea.created_at(),
        updated_at: idea.updated_at(),
    }
}

fn to_changeset(idea: &ContentIdea) -> IdeaChangeset {
    IdeaChangeset {
        title: idea.title().as_str().to_owned(),
        notes: idea.notes().map(str::to_owned),
        scheduled_date: idea.scheduled_date(),
        updated_at: idea.updated_at(),
    }
}

fn row_to_idea(row: IdeaRow) -> PlannerRepositoryResult<ContentIdea> {
    let IdeaRow {
        id,
        title,
        notes,
        slot: persisted_slot,
        scheduled_date,
        created_at,
        updated_at,
    } = row;

    let slot = persisted_slot
        .map(|raw| {
            let value = u8::try_from(raw).map_err(PlannerRepositoryError::persistence)?;
            SlotIndex::new(value).map_err(PlannerRepositoryError::persistence)
        })
        .transpose()?;

    let data = PersistedIdeaData {
        id: IdeaId::from_uuid(id),
        title: IdeaTitle::new(title).map_err(PlannerRepositoryError::persistence)?,
        notes,
        slot,
        scheduled_date,
        created_at,
        updated_at,
    };
    Ok(ContentIdea::from_persisted(data))
}
