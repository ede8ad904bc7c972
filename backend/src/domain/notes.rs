//! Personal notes and the service behind the notes site.
//!
//! Notes are private to their author. Each carries a slug that is unique
//! across every author; when the author leaves it blank it is derived from
//! the title.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::form::{REQUIRED, cleaned};
use super::ports::{NoteRepository, NoteRepositoryError, NotesService};
use super::{BoundForm, Error, FormErrors, FormOutcome, Principal, Slug, UserId, authorize_owner};

/// Maximum title length in characters.
pub const NOTE_TITLE_MAX: usize = 100;

/// Appended to a slug that is already taken.
pub const SLUG_TAKEN_WARNING: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

const SLUG_UNDERIVABLE: &str =
    "Не удалось составить slug из заголовка, укажите его вручную.";

/// Database identifier of a note, increasing in creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Note {
    id: NoteId,
    title: String,
    text: String,
    #[schema(value_type = String, example = "novaya-zametka")]
    slug: Slug,
    #[schema(value_type = String)]
    author: UserId,
}

impl Note {
    /// Assemble a note from stored parts.
    pub fn new(id: NoteId, draft: NoteDraft) -> Self {
        let NoteDraft {
            title,
            text,
            slug,
            author,
        } = draft;
        Self {
            id,
            title,
            text,
            slug,
            author,
        }
    }

    /// Identifier.
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// URL slug.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Owner.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Edit form pre-filled with this note's values.
    pub fn to_form(&self) -> BoundForm {
        BoundForm::empty()
            .with_value("title", self.title.clone())
            .with_value("text", self.text.clone())
            .with_value("slug", self.slug.to_string())
    }
}

/// Validated note content ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    /// Title, 1 to [`NOTE_TITLE_MAX`] characters.
    pub title: String,
    /// Non-empty body.
    pub text: String,
    /// Globally unique slug.
    pub slug: Slug,
    /// Owner.
    pub author: UserId,
}

/// Raw note form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NoteInput {
    /// Note title.
    pub title: Option<String>,
    /// Note body.
    pub text: Option<String>,
    /// Optional slug; derived from the title when blank.
    pub slug: Option<String>,
}

impl NoteInput {
    fn to_form(&self) -> BoundForm {
        let data: BTreeMap<String, String> = [
            ("title", &self.title),
            ("text", &self.text),
            ("slug", &self.slug),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field.to_owned(), v)))
        .collect();
        BoundForm::bound(data)
    }

    /// Field-level validation, independent of storage.
    fn validate(&self, author: UserId) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::new();

        let title = cleaned(self.title.as_deref());
        match title {
            None => errors.add("title", REQUIRED),
            Some(t) if t.chars().count() > NOTE_TITLE_MAX => errors.add(
                "title",
                format!(
                    "Ensure this value has at most {NOTE_TITLE_MAX} characters (it has {}).",
                    t.chars().count()
                ),
            ),
            Some(_) => {}
        }

        let text = cleaned(self.text.as_deref());
        if text.is_none() {
            errors.add("text", REQUIRED);
        }

        let slug = match cleaned(self.slug.as_deref()) {
            Some(raw) => Slug::new(raw).map_err(|err| err.to_string()).map(Some),
            None => match title {
                Some(t) => Slug::from_title(t)
                    .map(Some)
                    .ok_or_else(|| SLUG_UNDERIVABLE.to_owned()),
                None => Ok(None),
            },
        };
        let slug = slug.unwrap_or_else(|message| {
            errors.add("slug", message);
            None
        });

        match (title, text, slug) {
            (Some(title), Some(text), Some(slug)) if errors.is_empty() => Ok(NoteDraft {
                title: title.to_owned(),
                text: text.to_owned(),
                slug,
                author,
            }),
            _ => Err(errors),
        }
    }
}

fn map_repository_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note repository unavailable: {message}"))
        }
        NoteRepositoryError::Missing { .. } => Error::not_found("note not found"),
        other => Error::internal(format!("note repository error: {other}")),
    }
}

fn slug_taken(form: BoundForm, slug: &Slug) -> FormOutcome<Note> {
    FormOutcome::Invalid(form.with_error("slug", format!("{slug}{SLUG_TAKEN_WARNING}")))
}

/// Notes use-cases backed by a [`NoteRepository`].
#[derive(Clone)]
pub struct NotesServiceImpl<R: ?Sized> {
    notes: Arc<R>,
}

impl<R: ?Sized> NotesServiceImpl<R> {
    /// Create a service over the given repository.
    pub fn new(notes: Arc<R>) -> Self {
        Self { notes }
    }
}

impl<R> NotesServiceImpl<R>
where
    R: NoteRepository + ?Sized,
{
    async fn find_owned(&self, caller: &UserId, slug: &str) -> Result<Note, Error> {
        // A malformed slug cannot name any note.
        let Ok(slug) = Slug::new(slug) else {
            return Err(Error::not_found("note not found"));
        };
        let note = self
            .notes
            .find_by_slug(&slug)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("note not found"))?;
        authorize_owner(&Principal::User(*caller), note.author()).into_result("note")?;
        Ok(note)
    }

    async fn save(
        &self,
        form: BoundForm,
        draft: NoteDraft,
        existing: Option<NoteId>,
    ) -> Result<FormOutcome<Note>, Error> {
        let taken = self
            .notes
            .slug_exists(&draft.slug, existing)
            .await
            .map_err(map_repository_error)?;
        if taken {
            return Ok(slug_taken(form, &draft.slug));
        }

        let stored = match existing {
            Some(id) => self.notes.update(id, &draft).await,
            None => self.notes.insert(&draft).await,
        };
        match stored {
            Ok(note) => Ok(FormOutcome::Saved(note)),
            Err(NoteRepositoryError::DuplicateSlug { .. }) => Ok(slug_taken(form, &draft.slug)),
            Err(error) => Err(map_repository_error(error)),
        }
    }
}

#[async_trait]
impl<R> NotesService for NotesServiceImpl<R>
where
    R: NoteRepository + ?Sized,
{
    async fn list(&self, caller: &UserId) -> Result<Vec<Note>, Error> {
        self.notes
            .list_for_author(caller)
            .await
            .map_err(map_repository_error)
    }

    async fn get_owned(&self, caller: &UserId, slug: &str) -> Result<Note, Error> {
        self.find_owned(caller, slug).await
    }

    async fn create(&self, caller: &UserId, input: NoteInput) -> Result<FormOutcome<Note>, Error> {
        let form = input.to_form();
        let draft = match input.validate(*caller) {
            Ok(draft) => draft,
            Err(errors) => return Ok(FormOutcome::Invalid(form.with_errors(errors))),
        };
        let outcome = self.save(form, draft, None).await?;
        if let FormOutcome::Saved(note) = &outcome {
            info!(note_id = note.id().get(), slug = %note.slug(), "note created");
        }
        Ok(outcome)
    }

    async fn edit(
        &self,
        caller: &UserId,
        slug: &str,
        input: NoteInput,
    ) -> Result<FormOutcome<Note>, Error> {
        let note = self.find_owned(caller, slug).await?;
        let form = input.to_form();
        let draft = match input.validate(*caller) {
            Ok(draft) => draft,
            Err(errors) => return Ok(FormOutcome::Invalid(form.with_errors(errors))),
        };
        self.save(form, draft, Some(note.id())).await
    }

    async fn delete(&self, caller: &UserId, slug: &str) -> Result<(), Error> {
        let note = self.find_owned(caller, slug).await?;
        self.notes
            .delete(note.id())
            .await
            .map_err(map_repository_error)?;
        info!(note_id = note.id().get(), "note deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
