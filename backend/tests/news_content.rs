//! What the news pages list and in which order.

use std::sync::Arc;

use actix_web::test;
use pagination::PageSize;
use rstest::rstest;
use serde_json::Value;
use ya_backend::inbound::http::state::NEWS_COUNT_ON_HOME_PAGE;
use ya_backend::outbound::memory::InMemoryStore;
use ya_backend::server::Site;
use ya_backend::test_support::site_app;

#[macro_use]
mod support;

use support::{get, json, news_fixture, seed_comments, seed_news};

fn dates(listing: &Value) -> Vec<String> {
    listing
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["date"].as_str().expect("date").to_owned())
        .collect()
}

#[actix_web::test]
async fn home_page_is_limited_to_one_page() {
    let store = Arc::new(InMemoryStore::new());
    seed_news(&store, NEWS_COUNT_ON_HOME_PAGE + 1).await;
    let app = test::init_service(site_app(Site::News, store, PageSize::DEFAULT)).await;

    let body = json(test::call_service(&app, get("/", None).to_request()).await).await;

    assert_eq!(
        body["object_list"].as_array().expect("list").len(),
        NEWS_COUNT_ON_HOME_PAGE
    );
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["hasNext"], true);
}

#[actix_web::test]
async fn second_page_holds_the_remainder() {
    let store = Arc::new(InMemoryStore::new());
    seed_news(&store, NEWS_COUNT_ON_HOME_PAGE + 1).await;
    let app = test::init_service(site_app(Site::News, store, PageSize::DEFAULT)).await;

    let body = json(test::call_service(&app, get("/?page=2", None).to_request()).await).await;

    assert_eq!(body["object_list"].as_array().expect("list").len(), 1);
    assert_eq!(body["page"]["hasNext"], false);
}

#[actix_web::test]
async fn home_page_lists_newest_first() {
    let store = Arc::new(InMemoryStore::new());
    seed_news(&store, 5).await;
    let app = test::init_service(site_app(Site::News, store, PageSize::DEFAULT)).await;

    let body = json(test::call_service(&app, get("/", None).to_request()).await).await;

    let listed = dates(&body["object_list"]);
    let mut sorted = listed.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(listed, sorted);
}

#[actix_web::test]
async fn configured_page_size_is_honoured() {
    let store = Arc::new(InMemoryStore::new());
    seed_news(&store, 5).await;
    let size = PageSize::new(2).expect("page size");
    let app = test::init_service(site_app(Site::News, store, size)).await;

    let body = json(test::call_service(&app, get("/?page=3", None).to_request()).await).await;

    assert_eq!(body["object_list"].as_array().expect("list").len(), 1);
    assert_eq!(body["page"]["size"], 2);
}

#[actix_web::test]
async fn comments_are_listed_oldest_first() {
    let fixture = news_fixture().await;
    seed_comments(&fixture.store, &fixture.news, &fixture.reader, 4).await;
    let uri = format!("/news/{}/", fixture.news.id().get());
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;

    let body = json(test::call_service(&app, get(&uri, None).to_request()).await).await;

    let created: Vec<String> = body["news"]["comments"]
        .as_array()
        .expect("comments")
        .iter()
        .map(|comment| comment["created"].as_str().expect("created").to_owned())
        .collect();
    assert_eq!(created.len(), 5);
    let mut sorted = created.clone();
    sorted.sort();
    assert_eq!(created, sorted);
    assert_eq!(body["news"]["title"], fixture.news.title());
}

#[rstest]
#[case(false)]
#[case(true)]
#[actix_web::test]
async fn comment_form_is_offered_to_logged_in_users_only(#[case] logged_in: bool) {
    let fixture = news_fixture().await;
    let uri = format!("/news/{}/", fixture.news.id().get());
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;
    let cookie = if logged_in {
        Some(login!(&app, fixture.reader.id()))
    } else {
        None
    };

    let body = json(test::call_service(&app, get(&uri, cookie.as_ref()).to_request()).await).await;

    assert_eq!(body.get("form").is_some(), logged_in);
}
