//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{comments, news, notes, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Row struct for reading from the notes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: Uuid,
}

/// Insertable and changeset struct for note content.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NoteValues<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub slug: &'a str,
    pub author_id: Uuid,
}

// ---------------------------------------------------------------------------
// News and comments
// ---------------------------------------------------------------------------

/// Row struct for reading from the news table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = news)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NewsRow {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: NaiveDate,
}

/// Insertable struct for publishing news.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = news)]
pub(crate) struct NewNewsRow<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub date: NaiveDate,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub news_id: i64,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Insertable struct for new comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub news_id: i64,
    pub author_id: Uuid,
    pub text: &'a str,
    pub created: DateTime<Utc>,
}
