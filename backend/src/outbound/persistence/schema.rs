//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login name, unique.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Private notes; `slug` is unique across all authors.
    notes (id) {
        /// Primary key, increasing in creation order.
        id -> Int8,
        /// Title, at most 100 characters.
        title -> Varchar,
        /// Body text.
        text -> Text,
        /// URL slug, at most 100 characters.
        slug -> Varchar,
        /// Owning user.
        author_id -> Uuid,
    }
}

diesel::table! {
    /// Published news items.
    news (id) {
        /// Primary key.
        id -> Int8,
        /// Headline.
        title -> Varchar,
        /// Body text.
        text -> Text,
        /// Publication date.
        date -> Date,
    }
}

diesel::table! {
    /// Reader comments on news items.
    comments (id) {
        /// Primary key.
        id -> Int8,
        /// Commented news item; cascades on delete.
        news_id -> Int8,
        /// Writer; cascades on delete.
        author_id -> Uuid,
        /// Moderated body text.
        text -> Text,
        /// Creation timestamp.
        created -> Timestamptz,
    }
}

diesel::joinable!(notes -> users (author_id));
diesel::joinable!(comments -> news (news_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, notes, news, comments);
