//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with review workflow state and embedded collections.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Display priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Creator and final approver.
        created_by -> Uuid,
        /// Assignee user ids as a JSON array.
        assigned_to -> Jsonb,
        /// Reviewer user ids as a JSON array.
        reviewers -> Jsonb,
        /// Derived display status.
        #[max_length = 50]
        status -> Varchar,
        /// Review workflow state.
        #[max_length = 50]
        review_status -> Varchar,
        /// Checklist payload.
        todo_checklist -> Jsonb,
        /// Revision history payload.
        revision_history -> Jsonb,
        /// Comment thread payload.
        comments -> Jsonb,
        /// Timestamp of the most recent accepted nudge.
        last_nudged_at -> Nullable<Timestamptz>,
        /// Optimistic-concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
