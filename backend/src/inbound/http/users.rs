//! Account pages shared by both sites.
//!
//! ```text
//! GET|POST /auth/login/?next=/notes/
//! POST     /auth/logout/
//! GET|POST /auth/signup/
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use zeroize::Zeroizing;

use super::guard::LOGIN_URL;
use super::render::{redirect, render};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{ApiResult, BoundForm, FormOutcome, LoginInput, SignupInput};

/// Where to go after logging in.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextQuery {
    /// Local path to return to.
    pub next: Option<String>,
}

/// Login form submission.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    /// Login name.
    pub username: Option<String>,
    /// Password.
    #[schema(value_type = Option<String>)]
    pub password: Option<Zeroizing<String>>,
    /// Local path to return to; overrides the query string.
    pub next: Option<String>,
}

/// Login or sign-up page.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountFormContext {
    /// Bound form.
    pub form: BoundForm,
    /// Return path carried through the login form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// `next` when it names a path on this site, else `/`.
///
/// Paths with control characters are rejected; browsers strip tabs and line
/// breaks, so `/\t/host` would resolve as `//host`.
///
/// # Examples
/// ```
/// use ya_backend::inbound::http::users::safe_next;
///
/// assert_eq!(safe_next(Some("/notes/")), "/notes/");
/// assert_eq!(safe_next(Some("//evil.example/")), "/");
/// assert_eq!(safe_next(Some("https://evil.example/")), "/");
/// assert_eq!(safe_next(Some("/\t/evil.example/")), "/");
/// assert_eq!(safe_next(None), "/");
/// ```
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_ascii_control()) =>
        {
            path
        }
        _ => "/",
    }
}

/// Login form.
#[utoipa::path(
    get,
    path = "/auth/login/",
    tags = ["users"],
    params(NextQuery),
    responses((status = 200, body = AccountFormContext))
)]
#[get("/auth/login/")]
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    render(&AccountFormContext {
        form: BoundForm::empty(),
        next: query.into_inner().next,
    })
}

/// Check credentials and bind the session.
#[utoipa::path(
    post,
    path = "/auth/login/",
    tags = ["users"],
    params(NextQuery),
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = AccountFormContext),
        (status = 302, description = "Logged in", headers(("Set-Cookie" = String, description = "Session cookie")))
    )
)]
#[post("/auth/login/")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm {
        username,
        password,
        next,
    } = form.into_inner();
    let next = next.or_else(|| query.into_inner().next);

    match state.accounts.login(LoginInput { username, password }).await? {
        FormOutcome::Saved(user) => {
            session.persist_user(user.id())?;
            info!(user_id = %user.id(), "user logged in");
            Ok(redirect(safe_next(next.as_deref())))
        }
        FormOutcome::Invalid(form) => Ok(render(&AccountFormContext { form, next })),
    }
}

/// End the session.
#[utoipa::path(
    post,
    path = "/auth/logout/",
    tags = ["users"],
    responses((status = 200, description = "Logged out"))
)]
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    render(&serde_json::json!({}))
}

/// Sign-up form.
#[utoipa::path(
    get,
    path = "/auth/signup/",
    tags = ["users"],
    responses((status = 200, body = AccountFormContext))
)]
#[get("/auth/signup/")]
pub async fn signup_form() -> HttpResponse {
    render(&AccountFormContext {
        form: BoundForm::empty(),
        next: None,
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/signup/",
    tags = ["users"],
    request_body(content = SignupInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = AccountFormContext),
        (status = 302, description = "Registered; continue to login")
    )
)]
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<HttpState>,
    input: web::Form<SignupInput>,
) -> ApiResult<HttpResponse> {
    match state.accounts.signup(input.into_inner()).await? {
        FormOutcome::Saved(user) => {
            info!(user_id = %user.id(), "user signed up");
            Ok(redirect(LOGIN_URL))
        }
        FormOutcome::Invalid(form) => Ok(render(&AccountFormContext { form, next: None })),
    }
}

/// Register the account pages.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login)
        .service(logout)
        .service(signup_form)
        .service(signup);
}
