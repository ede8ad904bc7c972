//! Driving port for the notes site.
//!
//! Every operation takes the authenticated caller; anonymous requests are
//! turned away by the inbound adapter before they reach this port. Notes
//! owned by someone else are reported as not found.

use async_trait::async_trait;

use crate::domain::{Error, FormOutcome, Note, NoteInput, UserId};

/// Use-cases exposed to the notes HTTP adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesService: Send + Sync {
    /// The caller's notes, oldest first.
    async fn list(&self, caller: &UserId) -> Result<Vec<Note>, Error>;

    /// A note the caller owns.
    async fn get_owned(&self, caller: &UserId, slug: &str) -> Result<Note, Error>;

    /// Validate and store a new note authored by the caller.
    async fn create(&self, caller: &UserId, input: NoteInput) -> Result<FormOutcome<Note>, Error>;

    /// Validate and apply changes to a note the caller owns.
    async fn edit(
        &self,
        caller: &UserId,
        slug: &str,
        input: NoteInput,
    ) -> Result<FormOutcome<Note>, Error>;

    /// Delete a note the caller owns.
    async fn delete(&self, caller: &UserId, slug: &str) -> Result<(), Error>;
}
