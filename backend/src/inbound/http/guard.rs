//! Request guards resolving the session into a principal.
//!
//! [`CurrentUser`] admits only logged-in users; anonymous requests never
//! reach the handler and are answered with a redirect to the login page that
//! remembers the original URL. [`Viewer`] admits everyone and exposes the
//! principal for pages that render differently once logged in.
//!
//! A session naming a user the account store no longer knows resolves to an
//! anonymous principal.

use std::fmt;

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{Access, Error, Principal, UserId, require_authenticated};

/// Path of the login page.
pub const LOGIN_URL: &str = "/auth/login/";

// Characters left verbatim in the `next` parameter.
const NEXT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Login URL that returns to `original` afterwards.
///
/// # Examples
/// ```
/// use ya_backend::inbound::http::guard::login_url;
///
/// assert_eq!(login_url("/edit/my-note/"), "/auth/login/?next=/edit/my-note/");
/// assert_eq!(login_url("/?page=2"), "/auth/login/?next=/%3Fpage%3D2");
/// ```
pub fn login_url(original: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(original, NEXT_ESCAPE))
}

/// Redirect issued when an anonymous user reaches a protected page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    location: String,
}

impl LoginRedirect {
    /// Redirect back to the path and query of `req` after login.
    pub fn for_request(req: &HttpRequest) -> Self {
        let original = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path(), |pq| pq.as_str());
        Self {
            location: login_url(original),
        }
    }

    /// Target of the redirect.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "login required; redirecting to {}", self.location)
    }
}

impl ResponseError for LoginRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, self.location.clone()))
            .finish()
    }
}

async fn resolve_principal(
    req: &HttpRequest,
    session: SessionContext,
) -> Result<Principal, Error> {
    let Some(id) = session.user_id()? else {
        return Ok(Principal::Anonymous);
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let known = state.accounts.find_user(&id).await?.map(|user| *user.id());
    if known.is_none() {
        debug!(user_id = %id, "session names an unknown user; treating as anonymous");
    }
    Ok(Principal::from(known))
}

/// The logged-in user making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    /// The user's id.
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move {
            let principal = resolve_principal(&req, session.await?).await?;
            match require_authenticated(&principal) {
                Access::Proceed(id) => Ok(Self(id)),
                Access::LoginRequired | Access::NotFound => {
                    debug!(path = req.path(), "anonymous request redirected to login");
                    Err(LoginRedirect::for_request(&req).into())
                }
            }
        })
    }
}

/// Whoever is making the request, logged in or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Principal);

impl FromRequest for Viewer {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move { Ok(Self(resolve_principal(&req, session.await?).await?)) })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test as actix_test};
    use pagination::PageSize;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockAccountService, MockNewsService, MockNotesService};
    use crate::test_support::{
        accounts_knowing_everyone, configure_force_login, force_login_request, session_cookie,
        test_session_middleware,
    };

    #[rstest]
    #[case("/notes/", "/auth/login/?next=/notes/")]
    #[case("/note/zametka/", "/auth/login/?next=/note/zametka/")]
    #[case("/add/?a=1&b=2", "/auth/login/?next=/add/%3Fa%3D1%26b%3D2")]
    #[case("/заметка/", "/auth/login/?next=/%D0%B7%D0%B0%D0%BC%D0%B5%D1%82%D0%BA%D0%B0/")]
    fn login_url_keeps_slashes_and_escapes_the_rest(#[case] original: &str, #[case] expected: &str) {
        assert_eq!(login_url(original), expected);
    }

    fn app(
        accounts: MockAccountService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(MockNotesService::new()),
            Arc::new(MockNewsService::new()),
            Arc::new(accounts),
            PageSize::DEFAULT,
        );
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .configure(configure_force_login)
            .route(
                "/private/",
                web::get().to(|user: CurrentUser| async move {
                    HttpResponse::Ok().body(user.id().to_string())
                }),
            )
            .route(
                "/public/",
                web::get().to(|viewer: Viewer| async move {
                    HttpResponse::Ok().body(viewer.0.is_authenticated().to_string())
                }),
            )
    }

    fn no_lookups() -> MockAccountService {
        let mut accounts = MockAccountService::new();
        accounts.expect_find_user().never();
        accounts
    }

    #[actix_web::test]
    async fn anonymous_users_are_redirected_with_next() {
        let app = actix_test::init_service(app(no_lookups())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/private/?draft=1").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login/?next=/private/%3Fdraft%3D1")
        );
    }

    #[actix_web::test]
    async fn logged_in_users_reach_the_handler() {
        let app = actix_test::init_service(app(accounts_knowing_everyone())).await;
        let user = UserId::random();
        let login = actix_test::call_service(&app, force_login_request(&user).to_request()).await;
        let cookie = session_cookie(&login).expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/private/").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, user.to_string());
    }

    #[actix_web::test]
    async fn viewer_admits_anonymous_users() {
        let app = actix_test::init_service(app(no_lookups())).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/public/").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "false");
    }

    #[rstest]
    #[case("/private/", StatusCode::FOUND, "")]
    #[case("/public/", StatusCode::OK, "false")]
    #[actix_web::test]
    async fn sessions_of_unknown_users_are_anonymous(
        #[case] uri: &str,
        #[case] status: StatusCode,
        #[case] body: &str,
    ) {
        let stranger = UserId::random();
        let mut accounts = MockAccountService::new();
        accounts
            .expect_find_user()
            .withf(move |id| *id == stranger)
            .returning(|_| Ok(None));
        let app = actix_test::init_service(app(accounts)).await;
        let login =
            actix_test::call_service(&app, force_login_request(&stranger).to_request()).await;
        let cookie = session_cookie(&login).expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), status);
        if status == StatusCode::FOUND {
            assert_eq!(
                res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
                Some(login_url(uri).as_str())
            );
        } else {
            assert_eq!(actix_test::read_body(res).await, body);
        }
    }
}
