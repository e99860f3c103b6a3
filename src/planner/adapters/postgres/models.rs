//! Diesel row models for planner persistence.

use super::schema::content_ideas;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for content ideas.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = content_ideas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IdeaRow {
    /// Idea identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Idea title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Optional free-text notes.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub notes: Option<String>,
    /// Grid slot, NULL for the warehouse.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Int2>)]
    pub slot: Option<i16>,
    /// Optional scheduled calendar date.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Date>)]
    pub scheduled_date: Option<NaiveDate>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for content ideas.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = content_ideas)]
pub struct NewIdeaRow {
    /// Idea identifier.
    pub id: uuid::Uuid,
    /// Idea title.
    pub title: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Grid slot, NULL for the warehouse.
    pub slot: Option<i16>,
    /// Optional scheduled calendar date.
    pub scheduled_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for idea metadata and schedule changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = content_ideas)]
#[diesel(treat_none_as_null = true)]
pub struct IdeaChangeset {
    /// Idea title.
    pub title: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional scheduled calendar date.
    pub scheduled_date: Option<NaiveDate>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
