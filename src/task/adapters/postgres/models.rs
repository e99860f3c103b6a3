//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Optional free-text description.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    /// Display priority.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Optional due date.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub due_date: Option<DateTime<Utc>>,
    /// Creator and final approver.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub created_by: uuid::Uuid,
    /// Assignee user ids as a JSON array.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub assigned_to: Value,
    /// Reviewer user ids as a JSON array.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub reviewers: Value,
    /// Derived display status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Review workflow state.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub review_status: String,
    /// Checklist payload.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub todo_checklist: Value,
    /// Revision history payload.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub revision_history: Value,
    /// Comment thread payload.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub comments: Value,
    /// Timestamp of the most recent accepted nudge.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Timestamptz>)]
    pub last_nudged_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version.
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub version: i64,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Display priority.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creator and final approver.
    pub created_by: uuid::Uuid,
    /// Assignee user ids as a JSON array.
    pub assigned_to: Value,
    /// Reviewer user ids as a JSON array.
    pub reviewers: Value,
    /// Derived display status.
    pub status: String,
    /// Review workflow state.
    pub review_status: String,
    /// Checklist payload.
    pub todo_checklist: Value,
    /// Revision history payload.
    pub revision_history: Value,
    /// Comment thread payload.
    pub comments: Value,
    /// Timestamp of the most recent accepted nudge.
    pub last_nudged_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model applied by the compare-and-swap update.
///
/// `treat_none_as_null` so cleared optional fields are written back as NULL
/// rather than skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Display priority.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Assignee user ids as a JSON array.
    pub assigned_to: Value,
    /// Reviewer user ids as a JSON array.
    pub reviewers: Value,
    /// Derived display status.
    pub status: String,
    /// Review workflow state.
    pub review_status: String,
    /// Checklist payload.
    pub todo_checklist: Value,
    /// Revision history payload.
    pub revision_history: Value,
    /// Comment thread payload.
    pub comments: Value,
    /// Timestamp of the most recent accepted nudge.
    pub last_nudged_at: Option<DateTime<Utc>>,
    /// Bumped optimistic-concurrency version.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
