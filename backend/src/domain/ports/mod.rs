//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters; driving ports (`*Service`) are implemented by the domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod news_repository;
mod news_service;
mod note_repository;
mod notes_service;
mod password_hasher;
mod user_repository;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
pub use news_repository::{
    CommentRepository, CommentRepositoryError, NewsRepository, NewsRepositoryError,
};
#[cfg(test)]
pub use news_repository::{MockCommentRepository, MockNewsRepository};
#[cfg(test)]
pub use news_service::MockNewsService;
pub use news_service::NewsService;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NoteRepository, NoteRepositoryError};
#[cfg(test)]
pub use notes_service::MockNotesService;
pub use notes_service::NotesService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserPersistenceError, UserRepository};
