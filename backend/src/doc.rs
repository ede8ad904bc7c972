//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] covers what every site serves: accounts and health probes.
//! [`NotesApiDoc`] and [`NewsApiDoc`] describe the site-specific pages; both
//! mount a home page at `/`, so they are merged into the shared document
//! per site with [`ApiDoc::for_site`] rather than listed together.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    BoundForm, Comment, CommentInput, Error, ErrorCode, News, NewsDetail, Note, NoteInput,
    SignupInput, User,
};
use crate::inbound::http::news::{CommentContext, NewsDetailContext, NewsHomeContext, PageInfo};
use crate::inbound::http::notes::{
    NoteContext, NoteFormContext, NoteListContext, NotesHomeContext,
};
use crate::inbound::http::users::{AccountFormContext, LoginForm};
use crate::server::Site;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /auth/login/.",
            ))),
        );
    }
}

/// Accounts and health probes, shared by both sites.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ya backend",
        description = "Session-authenticated notes and news sites. Pages render JSON contexts.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::login_form,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::signup_form,
        crate::inbound::http::users::signup,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        BoundForm,
        User,
        LoginForm,
        SignupInput,
        AccountFormContext
    )),
    tags(
        (name = "users", description = "Sign-up, login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Shared document merged with the pages of `site`.
    ///
    /// # Examples
    /// ```
    /// use ya_backend::ApiDoc;
    /// use ya_backend::server::Site;
    ///
    /// let doc = ApiDoc::for_site(Site::News);
    /// assert!(doc.paths.paths.contains_key("/news/{id}/"));
    /// assert!(!doc.paths.paths.contains_key("/notes/"));
    /// ```
    #[must_use]
    pub fn for_site(site: Site) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        doc.merge(match site {
            Site::Notes => NotesApiDoc::openapi(),
            Site::News => NewsApiDoc::openapi(),
        });
        doc
    }
}

/// Pages of the notes site.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::notes::home,
        crate::inbound::http::notes::list,
        crate::inbound::http::notes::add_form,
        crate::inbound::http::notes::add,
        crate::inbound::http::notes::success,
        crate::inbound::http::notes::detail,
        crate::inbound::http::notes::edit_form,
        crate::inbound::http::notes::edit,
        crate::inbound::http::notes::delete_form,
        crate::inbound::http::notes::delete,
    ),
    components(schemas(
        Note,
        NoteInput,
        NotesHomeContext,
        NoteListContext,
        NoteFormContext,
        NoteContext
    )),
    security(("SessionCookie" = [])),
    tags((name = "notes", description = "Private notes with global slugs"))
)]
pub struct NotesApiDoc;

/// Pages of the news site.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::news::home,
        crate::inbound::http::news::detail,
        crate::inbound::http::news::comment,
        crate::inbound::http::news::edit_comment_form,
        crate::inbound::http::news::edit_comment,
        crate::inbound::http::news::delete_comment_form,
        crate::inbound::http::news::delete_comment,
    ),
    components(schemas(
        News,
        NewsDetail,
        Comment,
        CommentInput,
        PageInfo,
        NewsHomeContext,
        NewsDetailContext,
        CommentContext
    )),
    tags((name = "news", description = "Public news with moderated comments"))
)]
pub struct NewsApiDoc;
