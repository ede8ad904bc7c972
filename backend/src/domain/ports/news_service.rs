//! Driving port for the news site.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Comment, CommentId, CommentInput, Error, FormOutcome, News, NewsDetail, NewsDraft, NewsId,
    UserId,
};

/// Use-cases exposed to the news HTTP adapter and the publishing tool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsService: Send + Sync {
    /// One page of the home listing, newest first.
    async fn home(&self, page: PageRequest) -> Result<Page<News>, Error>;

    /// A news item with its comments, oldest comment first.
    async fn detail(&self, id: NewsId) -> Result<NewsDetail, Error>;

    /// Moderate and store a comment by the caller.
    async fn add_comment(
        &self,
        caller: &UserId,
        news: NewsId,
        input: CommentInput,
    ) -> Result<FormOutcome<Comment>, Error>;

    /// A comment the caller wrote.
    async fn get_owned_comment(&self, caller: &UserId, id: CommentId) -> Result<Comment, Error>;

    /// Moderate and apply new text to a comment the caller wrote.
    async fn edit_comment(
        &self,
        caller: &UserId,
        id: CommentId,
        input: CommentInput,
    ) -> Result<FormOutcome<Comment>, Error>;

    /// Delete a comment the caller wrote, returning it.
    async fn delete_comment(&self, caller: &UserId, id: CommentId) -> Result<Comment, Error>;

    /// Publish a news item; a missing date defaults to today.
    async fn publish(&self, draft: NewsDraft) -> Result<News, Error>;
}
