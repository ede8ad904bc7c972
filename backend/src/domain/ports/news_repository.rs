//! Port abstractions for news items and their comments.
use async_trait::async_trait;

use crate::domain::{Comment, CommentDraft, CommentId, CommentText, News, NewsDraft, NewsId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by news repository adapters.
    pub enum NewsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "news repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "news repository query failed: {message}",
    }
}

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The comment disappeared between lookup and mutation.
        Missing { id: i64 } => "comment {id} does not exist",
    }
}

/// Read and publish news items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Items ordered by date, newest first (ties broken by id, newest first),
    /// skipping `offset` and returning at most `limit`.
    async fn list_latest(&self, offset: usize, limit: usize)
    -> Result<Vec<News>, NewsRepositoryError>;

    /// Fetch a single item.
    async fn find_by_id(&self, id: NewsId) -> Result<Option<News>, NewsRepositoryError>;

    /// Publish a new item.
    async fn insert(&self, draft: &NewsDraft) -> Result<News, NewsRepositoryError>;
}

/// Storage for comments attached to news items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments under `news`, oldest first.
    async fn list_for_news(&self, news: NewsId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Fetch a single comment.
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Persist a new comment.
    async fn insert(&self, draft: &CommentDraft) -> Result<Comment, CommentRepositoryError>;

    /// Replace the text of a comment, keeping its creation time.
    async fn update_text(
        &self,
        id: CommentId,
        text: &CommentText,
    ) -> Result<Comment, CommentRepositoryError>;

    /// Remove a comment.
    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError>;
}
