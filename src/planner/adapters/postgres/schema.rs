//! Diesel schema for planner persistence.

diesel::table! {
    /// Content ideas with optional grid placement and schedule.
    content_ideas (id) {
        /// Idea identifier.
        id -> Uuid,
        /// Idea title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text notes.
        notes -> Nullable<Text>,
        /// Grid slot, NULL for the warehouse.
        slot -> Nullable<Int2>,
        /// Optional scheduled calendar date.
        scheduled_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
