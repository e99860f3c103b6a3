//! `PostgreSQL` repository implementation for task persistence.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        PersistedTaskData, ReviewStatus, Task, TaskId, TaskPriority, TaskStatus, TaskTitle, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let task_id = task.id();
        let expected =
            i64::try_from(task.version()).map_err(TaskRepositoryError::persistence)?;
        let bumped = expected.saturating_add(1);
        let changeset = to_changeset(task, bumped)?;
        let mut updated = task.clone();
        updated.set_version(task.version().saturating_add(1));

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::version.eq(expected)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if affected == 0 {
                // Distinguish a missing row from a version that moved on.
                let exists = tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .count()
                    .get_result::<i64>(connection)
                    .map_err(TaskRepositoryError::persistence)?;
                if exists == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                return Err(TaskRepositoryError::VersionConflict {
                    task_id,
                    expected: u64::try_from(expected)
                        .map_err(TaskRepositoryError::persistence)?,
                });
            }
            Ok(())
        })
        .await?;

        Ok(updated)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_assigned_to(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let needle =
            serde_json::to_value(vec![user_id]).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.contains(needle))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        created_by: task.created_by().into_inner(),
        assigned_to: serde_json::to_value(task.assigned_to())
            .map_err(TaskRepositoryError::persistence)?,
        reviewers: serde_json::to_value(task.reviewers())
            .map_err(TaskRepositoryError::persistence)?,
        status: task.status().as_str().to_owned(),
        review_status: task.review_status().as_str().to_owned(),
        todo_checklist: serde_json::to_value(task.todo_checklist())
            .map_err(TaskRepositoryError::persistence)?,
        revision_history: serde_json::to_value(task.revision_history())
            .map_err(TaskRepositoryError::persistence)?,
        comments: serde_json::to_value(task.comments())
            .map_err(TaskRepositoryError::persistence)?,
        last_nudged_at: task.last_nudged_at(),
        version: i64::try_from(task.version()).map_err(TaskRepositoryError::persistence)?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task, bumped_version: i64) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        assigned_to: serde_json::to_value(task.assigned_to())
            .map_err(TaskRepositoryError::persistence)?,
        reviewers: serde_json::to_value(task.reviewers())
            .map_err(TaskRepositoryError::persistence)?,
        status: task.status().as_str().to_owned(),
        review_status: task.review_status().as_str().to_owned(),
        todo_checklist: serde_json::to_value(task.todo_checklist())
            .map_err(TaskRepositoryError::persistence)?,
        revision_history: serde_json::to_value(task.revision_history())
            .map_err(TaskRepositoryError::persistence)?,
        comments: serde_json::to_value(task.comments())
            .map_err(TaskRepositoryError::persistence)?,
        last_nudged_at: task.last_nudged_at(),
        version: bumped_version,
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        priority,
        due_date,
        created_by,
        assigned_to,
        reviewers,
        status,
        review_status,
        todo_checklist,
        revision_history,
        comments,
        last_nudged_at,
        version,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        due_date,
        created_by: UserId::from_uuid(created_by),
        assigned_to: serde_json::from_value(assigned_to)
            .map_err(TaskRepositoryError::persistence)?,
        reviewers: serde_json::from_value(reviewers).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        review_status: ReviewStatus::try_from(review_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        todo_checklist: serde_json::from_value(todo_checklist)
            .map_err(TaskRepositoryError::persistence)?,
        revision_history: serde_json::from_value(revision_history)
            .map_err(TaskRepositoryError::persistence)?,
        comments: serde_json::from_value(comments).map_err(TaskRepositoryError::persistence)?,
        last_nudged_at,
        version: u64::try_from(version).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };

    Ok(Task::from_persisted(data))
}
