//! Notes site pages.
//!
//! Everything except the home page requires a logged-in user. Notes are
//! addressed by slug; a note owned by someone else answers exactly like a
//! missing one.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use super::guard::{CurrentUser, Viewer};
use super::render::{redirect, render};
use super::state::HttpState;
use crate::domain::{ApiResult, BoundForm, FormOutcome, Note, NoteInput};

/// Where successful note submissions land.
pub const SUCCESS_URL: &str = "/done/";

/// Home page context.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotesHomeContext {
    /// Whether the visitor is logged in.
    pub authenticated: bool,
}

/// The caller's notes.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteListContext {
    /// Notes owned by the caller, oldest first.
    pub object_list: Vec<Note>,
}

/// Add or edit form.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteFormContext {
    /// Bound form.
    pub form: BoundForm,
    /// The note being edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

/// A single note.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteContext {
    /// The note.
    pub note: Note,
}

fn form_page(outcome: FormOutcome<Note>, note: Option<Note>) -> HttpResponse {
    match outcome {
        FormOutcome::Saved(_) => redirect(SUCCESS_URL),
        FormOutcome::Invalid(form) => render(&NoteFormContext { form, note }),
    }
}

/// Landing page.
#[utoipa::path(
    get,
    path = "/",
    tags = ["notes"],
    responses((status = 200, body = NotesHomeContext))
)]
#[get("/")]
pub async fn home(viewer: Viewer) -> HttpResponse {
    render(&NotesHomeContext {
        authenticated: viewer.0.is_authenticated(),
    })
}

/// The caller's notes.
#[utoipa::path(
    get,
    path = "/notes/",
    tags = ["notes"],
    responses(
        (status = 200, body = NoteListContext),
        (status = 302, description = "Login required")
    )
)]
#[get("/notes/")]
pub async fn list(user: CurrentUser, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let object_list = state.notes.list(user.id()).await?;
    Ok(render(&NoteListContext { object_list }))
}

/// Empty add form.
#[utoipa::path(
    get,
    path = "/add/",
    tags = ["notes"],
    responses(
        (status = 200, body = NoteFormContext),
        (status = 302, description = "Login required")
    )
)]
#[get("/add/")]
pub async fn add_form(_user: CurrentUser) -> HttpResponse {
    render(&NoteFormContext {
        form: BoundForm::empty(),
        note: None,
    })
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/add/",
    tags = ["notes"],
    request_body(content = NoteInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = NoteFormContext),
        (status = 302, description = "Saved, or login required")
    )
)]
#[post("/add/")]
pub async fn add(
    user: CurrentUser,
    state: web::Data<HttpState>,
    input: web::Form<NoteInput>,
) -> ApiResult<HttpResponse> {
    let outcome = state.notes.create(user.id(), input.into_inner()).await?;
    Ok(form_page(outcome, None))
}

/// Confirmation page after a successful change.
#[utoipa::path(
    get,
    path = "/done/",
    tags = ["notes"],
    responses(
        (status = 200, description = "Change saved"),
        (status = 302, description = "Login required")
    )
)]
#[get("/done/")]
pub async fn success(_user: CurrentUser) -> HttpResponse {
    render(&serde_json::json!({}))
}

/// A note the caller owns.
#[utoipa::path(
    get,
    path = "/note/{slug}/",
    tags = ["notes"],
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, body = NoteContext),
        (status = 302, description = "Login required"),
        (status = 404, description = "No such note for this user", body = crate::domain::Error)
    )
)]
#[get("/note/{slug}/")]
pub async fn detail(
    user: CurrentUser,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let note = state.notes.get_owned(user.id(), &slug).await?;
    Ok(render(&NoteContext { note }))
}

/// Edit form prefilled from the note.
#[utoipa::path(
    get,
    path = "/edit/{slug}/",
    tags = ["notes"],
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, body = NoteFormContext),
        (status = 302, description = "Login required"),
        (status = 404, description = "No such note for this user", body = crate::domain::Error)
    )
)]
#[get("/edit/{slug}/")]
pub async fn edit_form(
    user: CurrentUser,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let note = state.notes.get_owned(user.id(), &slug).await?;
    Ok(render(&NoteFormContext {
        form: note.to_form(),
        note: Some(note),
    }))
}

/// Apply changes to a note.
#[utoipa::path(
    post,
    path = "/edit/{slug}/",
    tags = ["notes"],
    params(("slug" = String, Path, description = "Note slug")),
    request_body(content = NoteInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Form re-rendered with errors", body = NoteFormContext),
        (status = 302, description = "Saved, or login required"),
        (status = 404, description = "No such note for this user", body = crate::domain::Error)
    )
)]
#[post("/edit/{slug}/")]
pub async fn edit(
    user: CurrentUser,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
    input: web::Form<NoteInput>,
) -> ApiResult<HttpResponse> {
    let note = state.notes.get_owned(user.id(), &slug).await?;
    let outcome = state
        .notes
        .edit(user.id(), &slug, input.into_inner())
        .await?;
    Ok(form_page(outcome, Some(note)))
}

/// Delete confirmation page.
#[utoipa::path(
    get,
    path = "/delete/{slug}/",
    tags = ["notes"],
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, body = NoteContext),
        (status = 302, description = "Login required"),
        (status = 404, description = "No such note for this user", body = crate::domain::Error)
    )
)]
#[get("/delete/{slug}/")]
pub async fn delete_form(
    user: CurrentUser,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let note = state.notes.get_owned(user.id(), &slug).await?;
    Ok(render(&NoteContext { note }))
}

/// Delete a note.
#[utoipa::path(
    post,
    path = "/delete/{slug}/",
    tags = ["notes"],
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 302, description = "Deleted, or login required"),
        (status = 404, description = "No such note for this user", body = crate::domain::Error)
    )
)]
#[post("/delete/{slug}/")]
pub async fn delete(
    user: CurrentUser,
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.notes.delete(user.id(), &slug).await?;
    Ok(redirect(SUCCESS_URL))
}

/// Register the notes site pages.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(list)
        .service(add_form)
        .service(add)
        .service(success)
        .service(detail)
        .service(edit_form)
        .service(edit)
        .service(delete_form)
        .service(delete);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use pagination::PageSize;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{MockNewsService, MockNotesService};
    use crate::domain::{Error, NoteDraft, NoteId, Slug, UserId};
    use crate::inbound::http::error::form_config;
    use crate::test_support::{
        accounts_knowing_everyone, configure_force_login, force_login_request, session_cookie,
        test_session_middleware,
    };

    fn state(notes: MockNotesService) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(notes),
            Arc::new(MockNewsService::new()),
            Arc::new(accounts_knowing_everyone()),
            PageSize::new(10).expect("page size"),
        ))
    }

    fn note_for(author: UserId) -> Note {
        Note::new(
            NoteId::new(1),
            NoteDraft {
                title: "Заметка".to_owned(),
                text: "Текст".to_owned(),
                slug: Slug::new("zametka").expect("slug"),
                author,
            },
        )
    }

    macro_rules! logged_in_app {
        ($notes:expr, $user:expr) => {{
            let app = test::init_service(
                App::new()
                    .app_data(state($notes))
                    .app_data(form_config())
                    .wrap(test_session_middleware())
                    .configure(configure_force_login)
                    .configure(configure),
            )
            .await;
            let login = test::call_service(&app, force_login_request(&$user).to_request()).await;
            let cookie = session_cookie(&login).expect("session cookie");
            (app, cookie)
        }};
    }

    #[actix_web::test]
    async fn list_renders_the_callers_notes() {
        let user = UserId::random();
        let mut notes = MockNotesService::new();
        notes
            .expect_list()
            .with(eq(user))
            .times(1)
            .return_once(move |_| Ok(vec![note_for(user)]));
        let (app, cookie) = logged_in_app!(notes, user);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/notes/").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["object_list"][0]["slug"], "zametka");
    }

    #[actix_web::test]
    async fn valid_submission_redirects_to_success() {
        let user = UserId::random();
        let mut notes = MockNotesService::new();
        notes
            .expect_create()
            .withf(|_, input| input.title.as_deref() == Some("Заметка"))
            .times(1)
            .return_once(move |_, _| Ok(FormOutcome::Saved(note_for(user))));
        let (app, cookie) = logged_in_app!(notes, user);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/add/")
                .cookie(cookie)
                .set_form([("title", "Заметка"), ("text", "Текст"), ("slug", "")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(SUCCESS_URL)
        );
    }

    #[actix_web::test]
    async fn invalid_submission_rerenders_the_form() {
        let user = UserId::random();
        let mut notes = MockNotesService::new();
        notes.expect_create().return_once(|_, _| {
            Ok(FormOutcome::Invalid(
                BoundForm::empty()
                    .with_value("title", "Заметка")
                    .with_error("slug", "taken"),
            ))
        });
        let (app, cookie) = logged_in_app!(notes, user);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/add/")
                .cookie(cookie)
                .set_form([("title", "Заметка")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["form"]["data"]["title"], "Заметка");
        assert_eq!(body["form"]["errors"]["slug"][0], "taken");
        assert!(body.get("note").is_none());
    }

    #[actix_web::test]
    async fn foreign_note_is_not_found() {
        let user = UserId::random();
        let mut notes = MockNotesService::new();
        notes
            .expect_get_owned()
            .return_once(|_, _| Err(Error::not_found("note not found")));
        notes.expect_delete().never();
        let (app, cookie) = logged_in_app!(notes, user);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/delete/someone-elses/")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn anonymous_post_never_reaches_the_service() {
        let mut notes = MockNotesService::new();
        notes.expect_create().never();
        let app = test::init_service(
            App::new()
                .app_data(state(notes))
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/add/")
                .set_form([("title", "Заметка"), ("text", "Текст")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login/?next=/add/")
        );
    }
}
