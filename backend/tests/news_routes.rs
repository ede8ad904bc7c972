//! Page availability on the news site.

use actix_web::http::StatusCode;
use actix_web::test;
use pagination::PageSize;
use rstest::rstest;
use ya_backend::server::Site;
use ya_backend::test_support::site_app;

#[macro_use]
mod support;

use support::{get, location, news_fixture, post_form};

#[rstest]
#[case("/")]
#[case("/news/{news}/")]
#[case("/auth/login/")]
#[case("/auth/signup/")]
#[actix_web::test]
async fn public_pages_are_open_to_anonymous_users(#[case] pattern: &str) {
    let fixture = news_fixture().await;
    let uri = pattern.replace("{news}", &fixture.news.id().get().to_string());
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;

    let res = test::call_service(&app, get(&uri, None).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("/edit_comment/{}/", true)]
#[case("/delete_comment/{}/", true)]
#[case("/edit_comment/{}/", false)]
#[case("/delete_comment/{}/", false)]
#[actix_web::test]
async fn comment_pages_are_visible_to_their_author_only(
    #[case] pattern: &str,
    #[case] as_author: bool,
) {
    let fixture = news_fixture().await;
    let uri = pattern.replace("{}", &fixture.comment.id().get().to_string());
    let visitor = if as_author {
        fixture.author.id()
    } else {
        fixture.reader.id()
    };
    let app =
        test::init_service(site_app(Site::News, fixture.store.clone(), PageSize::DEFAULT)).await;
    let cookie = login!(&app, visitor);

    let res = test::call_service(&app, get(&uri, Some(&cookie)).to_request()).await;

    let expected = if as_author {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    assert_eq!(res.status(), expected);
}

#[rstest]
#[case("/edit_comment/{}/")]
#[case("/delete_comment/{}/")]
#[actix_web::test]
async fn anonymous_users_are_sent_to_login(#[case] pattern: &str) {
    let fixture = news_fixture().await;
    let uri = pattern.replace("{}", &fixture.comment.id().get().to_string());
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;

    let res = test::call_service(&app, get(&uri, None).to_request()).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some(format!("/auth/login/?next={uri}")));
}

#[rstest]
#[case("/news/999/")]
#[case("/news/latest/")]
#[case("/?page=0")]
#[case("/?page=2")]
#[case("/?page=18446744073709551615")]
#[actix_web::test]
async fn missing_items_and_pages_are_not_found(#[case] uri: &str) {
    let fixture = news_fixture().await;
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;

    let res = test::call_service(&app, get(uri, None).to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/edit_comment/{}/")]
#[case("/delete_comment/{}/")]
#[actix_web::test]
async fn anonymous_comment_changes_are_sent_to_login(#[case] pattern: &str) {
    let fixture = news_fixture().await;
    let store = fixture.store.clone();
    let uri = pattern.replace("{}", &fixture.comment.id().get().to_string());
    let app = test::init_service(site_app(Site::News, fixture.store, PageSize::DEFAULT)).await;

    let res = test::call_service(
        &app,
        post_form(&uri, None, &[("text", "Исправлено")]).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some(format!("/auth/login/?next={uri}")));
    assert_eq!(store.comments(), vec![fixture.comment]);
}
