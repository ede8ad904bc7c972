//! News site pages.
//!
//! The listing and detail pages are public. Posting, editing and deleting
//! comments requires a logged-in user, and only a comment's author may edit
//! or delete it.

use actix_web::{HttpResponse, get, post, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::guard::{CurrentUser, Viewer};
use super::render::{redirect, render};
use super::state::HttpState;
use crate::domain::{
    ApiResult, BoundForm, Comment, CommentId, CommentInput, Error, FormOutcome, News, NewsDetail,
    NewsId,
};

/// `?page=N` on the home listing, 1-based.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number; defaults to the first page.
    pub page: Option<usize>,
}

/// Position of the listed page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number.
    pub number: usize,
    /// Configured page size.
    pub size: usize,
    /// Whether a following page exists.
    pub has_next: bool,
}

/// Home listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct NewsHomeContext {
    /// News on this page, newest first.
    pub object_list: Vec<News>,
    /// Page position.
    pub page: PageInfo,
}

/// Detail page; `form` is present only for logged-in users.
#[derive(Debug, Serialize, ToSchema)]
pub struct NewsDetailContext {
    /// The item with its comments.
    pub news: NewsDetail,
    /// Comment form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<BoundForm>,
}

/// Comment edit or delete page.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentContext {
    /// The comment.
    pub comment: Comment,
    /// Edit form; absent on the delete page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<BoundForm>,
}

/// Fragment-anchored URL of the comment section of a news item.
pub fn comments_url(news: NewsId) -> String {
    format!("/news/{}/#comments", news.get())
}

/// Paginated listing, newest first.
#[utoipa::path(
    get,
    path = "/",
    tags = ["news"],
    params(PageQuery),
    responses(
        (status = 200, body = NewsHomeContext),
        (status = 404, description = "No such page", body = Error)
    )
)]
#[get("/")]
pub async fn home(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let number = query.page.unwrap_or(1);
    let request = PageRequest::new(number, state.news_per_page)
        .map_err(|_| Error::not_found("page not found"))?;
    let page = state.news.home(request).await?;
    if page.items().is_empty() && page.number() > 1 {
        return Err(Error::not_found("page not found"));
    }

    let info = PageInfo {
        number: page.number(),
        size: page.size(),
        has_next: page.has_next(),
    };
    Ok(render(&NewsHomeContext {
        object_list: page.into_items(),
        page: info,
    }))
}

/// A news item with its comments.
#[utoipa::path(
    get,
    path = "/news/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "News id")),
    responses(
        (status = 200, body = NewsDetailContext),
        (status = 404, description = "No such news item", body = Error)
    )
)]
#[get("/news/{id}/")]
pub async fn detail(
    viewer: Viewer,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let news = state.news.detail(NewsId::new(id.into_inner())).await?;
    let form = viewer.0.is_authenticated().then(BoundForm::empty);
    Ok(render(&NewsDetailContext { news, form }))
}

/// Post a comment.
#[utoipa::path(
    post,
    path = "/news/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "News id")),
    request_body(content = CommentInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = NewsDetailContext),
        (status = 302, description = "Posted, or login required"),
        (status = 404, description = "No such news item", body = Error)
    )
)]
#[post("/news/{id}/")]
pub async fn comment(
    user: CurrentUser,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    input: web::Form<CommentInput>,
) -> ApiResult<HttpResponse> {
    let news = NewsId::new(id.into_inner());
    match state
        .news
        .add_comment(user.id(), news, input.into_inner())
        .await?
    {
        FormOutcome::Saved(_) => Ok(redirect(comments_url(news))),
        FormOutcome::Invalid(form) => {
            let found = state.news.detail(news).await?;
            Ok(render(&NewsDetailContext {
                news: found,
                form: Some(form),
            }))
        }
    }
}

/// Comment edit form.
#[utoipa::path(
    get,
    path = "/edit_comment/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, body = CommentContext),
        (status = 302, description = "Login required"),
        (status = 404, description = "No such comment by this user", body = Error)
    )
)]
#[get("/edit_comment/{id}/")]
pub async fn edit_comment_form(
    user: CurrentUser,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let owned = state
        .news
        .get_owned_comment(user.id(), CommentId::new(id.into_inner()))
        .await?;
    Ok(render(&CommentContext {
        form: Some(owned.to_form()),
        comment: owned,
    }))
}

/// Apply new comment text.
#[utoipa::path(
    post,
    path = "/edit_comment/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "Comment id")),
    request_body(content = CommentInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = CommentContext),
        (status = 302, description = "Saved, or login required"),
        (status = 404, description = "No such comment by this user", body = Error)
    )
)]
#[post("/edit_comment/{id}/")]
pub async fn edit_comment(
    user: CurrentUser,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    input: web::Form<CommentInput>,
) -> ApiResult<HttpResponse> {
    let id = CommentId::new(id.into_inner());
    let current = state.news.get_owned_comment(user.id(), id).await?;
    match state
        .news
        .edit_comment(user.id(), id, input.into_inner())
        .await?
    {
        FormOutcome::Saved(saved) => Ok(redirect(comments_url(saved.news()))),
        FormOutcome::Invalid(form) => Ok(render(&CommentContext {
            comment: current,
            form: Some(form),
        })),
    }
}

/// Comment delete confirmation.
#[utoipa::path(
    get,
    path = "/delete_comment/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, body = CommentContext),
        (status = 302, description = "Login required"),
        (status = 404, description = "No such comment by this user", body = Error)
    )
)]
#[get("/delete_comment/{id}/")]
pub async fn delete_comment_form(
    user: CurrentUser,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let owned = state
        .news
        .get_owned_comment(user.id(), CommentId::new(id.into_inner()))
        .await?;
    Ok(render(&CommentContext {
        comment: owned,
        form: None,
    }))
}

/// Delete a comment.
#[utoipa::path(
    post,
    path = "/delete_comment/{id}/",
    tags = ["news"],
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 302, description = "Deleted, or login required"),
        (status = 404, description = "No such comment by this user", body = Error)
    )
)]
#[post("/delete_comment/{id}/")]
pub async fn delete_comment(
    user: CurrentUser,
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let removed = state
        .news
        .delete_comment(user.id(), CommentId::new(id.into_inner()))
        .await?;
    Ok(redirect(comments_url(removed.news())))
}

/// Register the news site pages.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(detail)
        .service(comment)
        .service(edit_comment_form)
        .service(edit_comment)
        .service(delete_comment_form)
        .service(delete_comment);
}
