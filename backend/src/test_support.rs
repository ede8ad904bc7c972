//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and with the `test-support` feature only.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use pagination::PageSize;

use crate::domain::{Error, UserId};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::session::SessionContext;
use crate::outbound::memory::InMemoryStore;
use crate::server::{AppDependencies, Repositories, Site, build_app};

/// Route that logs a user in without a password.
pub const FORCE_LOGIN_PATH: &str = "/__test__/force-login/{user_id}/";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`, detached from the response.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

async fn force_login(
    session: SessionContext,
    path: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    session.persist_user(&path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount [`FORCE_LOGIN_PATH`].
pub fn configure_force_login(cfg: &mut web::ServiceConfig) {
    cfg.route(FORCE_LOGIN_PATH, web::post().to(force_login));
}

/// Request that logs `user` in through [`configure_force_login`].
pub fn force_login_request(user: &UserId) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/__test__/force-login/{user}/"))
}

/// A full site over `store`, plus the force-login route.
pub fn site_app(
    site: Site,
    store: Arc<InMemoryStore>,
    news_per_page: PageSize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(Repositories::in_memory(store).into_http_state(news_per_page)),
        site,
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    })
    .configure(configure_force_login)
}

/// Account service that knows every user id a session presents.
#[cfg(test)]
pub(crate) fn accounts_knowing_everyone() -> crate::domain::ports::MockAccountService {
    let mut accounts = crate::domain::ports::MockAccountService::new();
    accounts.expect_find_user().returning(|id| {
        let username = crate::domain::Username::new("Лев Толстой").expect("username");
        Ok(Some(crate::domain::User::new(*id, username)))
    });
    accounts
}
