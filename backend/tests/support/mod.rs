//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls this module in with `#[macro_use] mod support;` and uses the subset
//! it needs.
#![allow(dead_code, unused_macros, reason = "each suite uses a subset of the helpers")]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use ya_backend::domain::ports::{CommentRepository, NewsRepository, NoteRepository};
use ya_backend::domain::{
    Comment, CommentDraft, CommentText, News, NewsDraft, Note, NoteDraft, Slug, User, Username,
};
use ya_backend::outbound::memory::InMemoryStore;

/// Log `$user` in through the force-login route and return the session
/// cookie.
macro_rules! login {
    ($app:expr, $user:expr) => {{
        let res = actix_web::test::call_service(
            $app,
            ya_backend::test_support::force_login_request($user).to_request(),
        )
        .await;
        ya_backend::test_support::session_cookie(&res).expect("session cookie")
    }};
}

/// GET `uri`, optionally as the owner of `cookie`.
pub fn get(uri: &str, cookie: Option<&Cookie<'static>>) -> test::TestRequest {
    with_cookie(test::TestRequest::get().uri(uri), cookie)
}

/// POST a form to `uri`, optionally as the owner of `cookie`.
pub fn post_form(
    uri: &str,
    cookie: Option<&Cookie<'static>>,
    fields: &[(&str, &str)],
) -> test::TestRequest {
    let fields: Vec<(String, String)> = fields
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    with_cookie(test::TestRequest::post().uri(uri).set_form(fields), cookie)
}

fn with_cookie(req: test::TestRequest, cookie: Option<&Cookie<'static>>) -> test::TestRequest {
    match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    }
}

/// `Location` header of a redirect.
pub fn location(res: &ServiceResponse) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Response body as JSON.
pub async fn json(res: ServiceResponse) -> Value {
    test::read_body_json(res).await
}

/// Two users and one note written by the first.
pub struct NotesFixture {
    pub store: Arc<InMemoryStore>,
    pub author: User,
    pub reader: User,
    pub note: Note,
}

/// Seed [`NotesFixture`] into a fresh store.
pub async fn notes_fixture() -> NotesFixture {
    let store = Arc::new(InMemoryStore::new());
    let author = store.seed_user(Username::new("Лев Толстой").expect("username"));
    let reader = store.seed_user(Username::new("Читатель простой").expect("username"));
    let note = NoteRepository::insert(
        &*store,
        &NoteDraft {
            title: "Заголовок".to_owned(),
            text: "Текст заметки".to_owned(),
            slug: Slug::new("note-slug").expect("slug"),
            author: *author.id(),
        },
    )
    .await
    .expect("seed note");
    NotesFixture {
        store,
        author,
        reader,
        note,
    }
}

/// Date of the most recent seeded news item.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

/// Seed `count` news items, one per day ending at [`today`], in random-ish
/// insertion order.
pub async fn seed_news(store: &InMemoryStore, count: usize) -> Vec<News> {
    let mut days: Vec<i64> = (0..count as i64).collect();
    // Insert out of date order so listings must sort by date.
    days.reverse();
    days.rotate_left(count / 2);
    let mut items = Vec::with_capacity(count);
    for day in days {
        let news = NewsRepository::insert(
            store,
            &NewsDraft {
                title: format!("Новость {day}"),
                text: "Просто текст.".to_owned(),
                date: Some(today() - Duration::days(day)),
            },
        )
        .await
        .expect("seed news");
        items.push(news);
    }
    items
}

/// Start of the comment timeline.
pub fn comment_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Seed `count` comments by `author` on `news`, one per day, inserted newest
/// first.
pub async fn seed_comments(
    store: &InMemoryStore,
    news: &News,
    author: &User,
    count: usize,
) -> Vec<Comment> {
    let mut comments = Vec::with_capacity(count);
    for index in (0..count as i64).rev() {
        let comment = CommentRepository::insert(
            store,
            &CommentDraft {
                news: news.id(),
                author: *author.id(),
                text: CommentText::new(&format!("Комментарий {index}")).expect("clean text"),
                created: comment_epoch() + Duration::days(index),
            },
        )
        .await
        .expect("seed comment");
        comments.push(comment);
    }
    comments
}

/// A news item with one comment by `author`, plus a `reader`.
pub struct NewsFixture {
    pub store: Arc<InMemoryStore>,
    pub author: User,
    pub reader: User,
    pub news: News,
    pub comment: Comment,
}

/// Seed [`NewsFixture`] into a fresh store.
pub async fn news_fixture() -> NewsFixture {
    let store = Arc::new(InMemoryStore::new());
    let author = store.seed_user(Username::new("Автор").expect("username"));
    let reader = store.seed_user(Username::new("Читатель").expect("username"));
    let news = seed_news(&store, 1)
        .await
        .pop()
        .expect("seeded news item");
    let comment = seed_comments(&store, &news, &author, 1)
        .await
        .pop()
        .expect("seeded comment");
    NewsFixture {
        store,
        author,
        reader,
        news,
        comment,
    }
}
