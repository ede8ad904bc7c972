//! PostgreSQL-backed `NoteRepository` implementation using Diesel ORM.
//!
//! Slug uniqueness is enforced by a unique index; a violation surfaces as
//! `NoteRepositoryError::DuplicateSlug` so concurrent writers see the same
//! form error as the pre-check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{Note, NoteDraft, NoteId, Slug, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NoteRow, NoteValues};
use super::pool::{DbPool, PoolError};
use super::schema::notes;

/// Diesel-backed implementation of the [`NoteRepository`] port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    map_basic_pool_error(error, NoteRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NoteRepositoryError {
    map_basic_diesel_error(
        error,
        NoteRepositoryError::query,
        NoteRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, draft: &NoteDraft) -> NoteRepositoryError {
    if is_unique_violation(&error) {
        NoteRepositoryError::duplicate_slug(draft.slug.as_str())
    } else {
        map_diesel_error(error)
    }
}

fn row_to_note(row: NoteRow) -> Result<Note, NoteRepositoryError> {
    let slug = Slug::new(row.slug).map_err(|err| {
        warn!(note_id = row.id, error = %err, "stored slug failed validation");
        NoteRepositoryError::query("stored slug is invalid")
    })?;
    Ok(Note::new(
        NoteId::new(row.id),
        NoteDraft {
            title: row.title,
            text: row.text,
            slug,
            author: UserId::from_uuid(row.author_id),
        },
    ))
}

fn values(draft: &NoteDraft) -> NoteValues<'_> {
    NoteValues {
        title: &draft.title,
        text: &draft.text,
        slug: draft.slug.as_str(),
        author_id: *draft.author.as_uuid(),
    }
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn list_for_author(&self, author: &UserId) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NoteRow> = notes::table
            .filter(notes::author_id.eq(author.as_uuid()))
            .order(notes::id.asc())
            .select(NoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_note).collect()
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NoteRow> = notes::table
            .filter(notes::slug.eq(slug.as_str()))
            .select(NoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        excluding: Option<NoteId>,
    ) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = notes::table
            .filter(notes::slug.eq(slug.as_str()))
            .select(notes::id)
            .into_boxed();
        if let Some(id) = excluding {
            query = query.filter(notes::id.ne(id.get()));
        }

        let found: Option<i64> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(found.is_some())
    }

    async fn insert(&self, draft: &NoteDraft) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: NoteRow = diesel::insert_into(notes::table)
            .values(&values(draft))
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, draft))?;

        row_to_note(row)
    }

    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NoteRow> = diesel::update(notes::table.find(id.get()))
            .set(&values(draft))
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, draft))?;

        row.map_or_else(|| Err(NoteRepositoryError::missing(id.get())), row_to_note)
    }

    async fn delete(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(notes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(NoteRepositoryError::missing(id.get()));
        }
        Ok(())
    }
}
