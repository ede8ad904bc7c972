//! Port abstraction for note persistence.
use async_trait::async_trait;

use crate::domain::{Note, NoteDraft, NoteId, Slug, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "note repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "note repository query failed: {message}",
        /// The slug is already used by another note.
        DuplicateSlug { slug: String } => "slug {slug} is already in use",
        /// The note disappeared between lookup and mutation.
        Missing { id: i64 } => "note {id} does not exist",
    }
}

/// Storage for notes. Slugs are unique across all authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Notes written by `author`, oldest first.
    async fn list_for_author(&self, author: &UserId) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Look a note up by slug regardless of its author.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Note>, NoteRepositoryError>;

    /// Whether any note other than `excluding` uses `slug`.
    async fn slug_exists(
        &self,
        slug: &Slug,
        excluding: Option<NoteId>,
    ) -> Result<bool, NoteRepositoryError>;

    /// Persist a new note.
    async fn insert(&self, draft: &NoteDraft) -> Result<Note, NoteRepositoryError>;

    /// Overwrite title, text and slug of an existing note.
    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, NoteRepositoryError>;

    /// Remove a note.
    async fn delete(&self, id: NoteId) -> Result<(), NoteRepositoryError>;
}
