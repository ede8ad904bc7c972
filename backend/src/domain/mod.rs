//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters, plus the services that implement the notes, news
//! and account use-cases against the ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - User, UserId, Username: account identity.
//! - Principal, Access: who is calling and whether they may proceed.
//! - Note and NotesServiceImpl: private notes with global slugs.
//! - News, Comment and NewsServiceImpl: public news with moderated comments.
//! - BoundForm, FormOutcome: re-renderable form state.

pub mod access;
pub mod accounts;
pub mod auth;
pub mod error;
pub mod form;
pub mod news;
pub mod notes;
pub mod ports;
pub mod slug;
mod trace_id;
pub mod user;

pub use self::access::{Access, Principal, authorize_owner, require_authenticated};
pub use self::accounts::{
    AccountServiceImpl, INVALID_LOGIN, LoginInput, SignupInput, USERNAME_TAKEN,
};
pub use self::auth::{NewPassword, PASSWORD_MIN_LEN, PasswordPolicyError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::form::{BoundForm, FormErrors, FormOutcome, NON_FIELD_ERRORS};
pub use self::news::{
    BAD_WORDS, Comment, CommentDraft, CommentId, CommentInput, CommentText, CommentTextError,
    News, NewsDetail, NewsDraft, NewsId, NewsServiceImpl, WARNING,
};
pub use self::notes::{
    NOTE_TITLE_MAX, Note, NoteDraft, NoteId, NoteInput, NotesServiceImpl, SLUG_TAKEN_WARNING,
};
pub use self::slug::{SLUG_MAX, Slug, SlugValidationError, slugify};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ya_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("note not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
