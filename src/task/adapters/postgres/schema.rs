//! Diesel schema for task persistence.

diesel::table! {
    /// Task records owned by users.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Display title.
        #[max_length = 100]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Task priority.
        #[max_length = 16]
        priority -> Varchar,
        /// Optional label.
        #[max_length = 50]
        label -> Nullable<Varchar>,
        /// Completion flag.
        is_done -> Bool,
        /// Armed reminder time; `NULL` when no reminder is scheduled.
        reminder_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
