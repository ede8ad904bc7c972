//! News items, reader comments and comment moderation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::form::REQUIRED;
use super::ports::{
    CommentRepository, CommentRepositoryError, NewsRepository, NewsRepositoryError, NewsService,
};
use super::{BoundForm, Error, FormOutcome, Principal, UserId, authorize_owner};

/// Substrings that may not appear in a comment. Matching is case-sensitive.
pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];

/// Error shown on the `text` field when a comment contains a banned word.
pub const WARNING: &str = "Не ругайтесь!";

/// Database identifier of a news item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct NewsId(i64);

impl NewsId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Database identifier of a comment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A published news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct News {
    id: NewsId,
    title: String,
    text: String,
    date: NaiveDate,
}

impl News {
    /// Assemble a news item from stored parts.
    pub fn new(id: NewsId, title: impl Into<String>, text: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            date,
        }
    }

    /// Identifier.
    pub fn id(&self) -> NewsId {
        self.id
    }

    /// Headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Publication date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A news item to publish. `date` defaults to today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    /// Headline.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Publication date.
    pub date: Option<NaiveDate>,
}

/// A news item with its comments, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewsDetail {
    #[serde(flatten)]
    news: News,
    comments: Vec<Comment>,
}

impl NewsDetail {
    /// Pair an item with its comments.
    pub fn new(news: News, comments: Vec<Comment>) -> Self {
        Self { news, comments }
    }

    /// The item.
    pub fn news(&self) -> &News {
        &self.news
    }

    /// Comments in creation order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

/// Rejections raised by [`CommentText::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentTextError {
    /// No text after trimming.
    #[error("{REQUIRED}")]
    Empty,
    /// Contains an entry of [`BAD_WORDS`].
    #[error("{WARNING}")]
    BannedWord,
}

/// Comment body that passed moderation.
///
/// # Examples
/// ```
/// use ya_backend::domain::{CommentText, CommentTextError};
///
/// assert!(CommentText::new("Отличная новость").is_ok());
/// assert_eq!(
///     CommentText::new("Какой-то текст, редиска, еще текст"),
///     Err(CommentTextError::BannedWord)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Trim and moderate a comment body.
    pub fn new(text: &str) -> Result<Self, CommentTextError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentTextError::Empty);
        }
        if BAD_WORDS.iter().any(|word| text.contains(word)) {
            return Err(CommentTextError::BannedWord);
        }
        Ok(Self(text.to_owned()))
    }

    /// The moderated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A reader comment on a news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Comment {
    id: CommentId,
    news: NewsId,
    #[schema(value_type = String)]
    author: UserId,
    #[schema(value_type = String)]
    text: CommentText,
    created: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment from stored parts.
    pub fn new(id: CommentId, draft: CommentDraft) -> Self {
        let CommentDraft {
            news,
            author,
            text,
            created,
        } = draft;
        Self {
            id,
            news,
            author,
            text,
            created,
        }
    }

    /// Identifier.
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// News item the comment belongs to.
    pub fn news(&self) -> NewsId {
        self.news
    }

    /// Writer.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Body.
    pub fn text(&self) -> &CommentText {
        &self.text
    }

    /// Creation time.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Return the comment with different text, keeping everything else.
    pub fn with_text(mut self, text: CommentText) -> Self {
        self.text = text;
        self
    }

    /// Edit form pre-filled with the current text.
    pub fn to_form(&self) -> BoundForm {
        BoundForm::empty().with_value("text", self.text.as_str())
    }
}

/// Comment content ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    /// News item being commented on.
    pub news: NewsId,
    /// Writer.
    pub author: UserId,
    /// Moderated body.
    pub text: CommentText,
    /// Creation time.
    pub created: DateTime<Utc>,
}

/// Raw comment form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CommentInput {
    /// Comment body.
    pub text: Option<String>,
}

impl CommentInput {
    fn moderate(&self) -> Result<CommentText, BoundForm> {
        let raw = self.text.as_deref().unwrap_or_default();
        CommentText::new(raw).map_err(|err| {
            let form = match &self.text {
                Some(text) => BoundForm::empty().with_value("text", text.clone()),
                None => BoundForm::empty(),
            };
            form.with_error("text", err.to_string())
        })
    }
}

fn map_news_error(error: NewsRepositoryError) -> Error {
    match error {
        NewsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("news repository unavailable: {message}"))
        }
        NewsRepositoryError::Query { message } => {
            Error::internal(format!("news repository error: {message}"))
        }
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Missing { .. } => Error::not_found("comment not found"),
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

/// News use-cases backed by news and comment repositories.
#[derive(Clone)]
pub struct NewsServiceImpl<N: ?Sized, C: ?Sized> {
    news: Arc<N>,
    comments: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<N: ?Sized, C: ?Sized> NewsServiceImpl<N, C> {
    /// Create a service; `clock` stamps comments and default news dates.
    pub fn new(news: Arc<N>, comments: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            news,
            comments,
            clock,
        }
    }
}

impl<N, C> NewsServiceImpl<N, C>
where
    N: NewsRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    async fn find_news(&self, id: NewsId) -> Result<News, Error> {
        self.news
            .find_by_id(id)
            .await
            .map_err(map_news_error)?
            .ok_or_else(|| Error::not_found("news not found"))
    }

    async fn find_owned_comment(&self, caller: &UserId, id: CommentId) -> Result<Comment, Error> {
        let comment = self
            .comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found("comment not found"))?;
        authorize_owner(&Principal::User(*caller), comment.author()).into_result("comment")?;
        Ok(comment)
    }
}

#[async_trait]
impl<N, C> NewsService for NewsServiceImpl<N, C>
where
    N: NewsRepository + ?Sized,
    C: CommentRepository + ?Sized,
{
    async fn home(&self, page: PageRequest) -> Result<Page<News>, Error> {
        // Row positions past `i64::MAX` cannot exist in any store.
        if i64::try_from(page.offset().saturating_add(page.fetch_limit())).is_err() {
            return Err(Error::not_found("page not found"));
        }
        let rows = self
            .news
            .list_latest(page.offset(), page.fetch_limit())
            .await
            .map_err(map_news_error)?;
        Ok(Page::from_probe(&page, rows))
    }

    async fn detail(&self, id: NewsId) -> Result<NewsDetail, Error> {
        let news = self.find_news(id).await?;
        let comments = self
            .comments
            .list_for_news(id)
            .await
            .map_err(map_comment_error)?;
        Ok(NewsDetail::new(news, comments))
    }

    async fn add_comment(
        &self,
        caller: &UserId,
        news: NewsId,
        input: CommentInput,
    ) -> Result<FormOutcome<Comment>, Error> {
        let news = self.find_news(news).await?;
        let text = match input.moderate() {
            Ok(text) => text,
            Err(form) => return Ok(FormOutcome::Invalid(form)),
        };
        let draft = CommentDraft {
            news: news.id(),
            author: *caller,
            text,
            created: self.clock.utc(),
        };
        let comment = self
            .comments
            .insert(&draft)
            .await
            .map_err(map_comment_error)?;
        info!(
            comment_id = comment.id().get(),
            news_id = news.id().get(),
            "comment added"
        );
        Ok(FormOutcome::Saved(comment))
    }

    async fn get_owned_comment(&self, caller: &UserId, id: CommentId) -> Result<Comment, Error> {
        self.find_owned_comment(caller, id).await
    }

    async fn edit_comment(
        &self,
        caller: &UserId,
        id: CommentId,
        input: CommentInput,
    ) -> Result<FormOutcome<Comment>, Error> {
        let comment = self.find_owned_comment(caller, id).await?;
        let text = match input.moderate() {
            Ok(text) => text,
            Err(form) => return Ok(FormOutcome::Invalid(form)),
        };
        let updated = self
            .comments
            .update_text(comment.id(), &text)
            .await
            .map_err(map_comment_error)?;
        Ok(FormOutcome::Saved(updated))
    }

    async fn delete_comment(&self, caller: &UserId, id: CommentId) -> Result<Comment, Error> {
        let comment = self.find_owned_comment(caller, id).await?;
        self.comments
            .delete(comment.id())
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = comment.id().get(), "comment deleted");
        Ok(comment)
    }

    async fn publish(&self, draft: NewsDraft) -> Result<News, Error> {
        if draft.title.trim().is_empty() || draft.text.trim().is_empty() {
            return Err(Error::invalid_request("news title and text are required"));
        }
        let draft = NewsDraft {
            date: Some(draft.date.unwrap_or_else(|| self.clock.local().date_naive())),
            ..draft
        };
        let news = self.news.insert(&draft).await.map_err(map_news_error)?;
        info!(news_id = news.id().get(), date = %news.date(), "news published");
        Ok(news)
    }
}

#[cfg(test)]
#[path = "news_tests.rs"]
mod tests;
