//! Process-local store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP test suites,
//! where each test builds its own store and so starts from empty tables.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, NewsRepository, NewsRepositoryError,
    NoteRepository, NoteRepositoryError, StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentDraft, CommentId, CommentText, News, NewsDraft, NewsId, Note, NoteDraft,
    NoteId, Slug, User, UserId, Username,
};

/// Hash that no password verifies against.
pub const UNUSABLE_PASSWORD: &str = "!";

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    notes: BTreeMap<NoteId, Note>,
    news: BTreeMap<NewsId, News>,
    comments: BTreeMap<CommentId, Comment>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn slug_taken(&self, slug: &Slug, excluding: Option<NoteId>) -> bool {
        self.notes
            .values()
            .any(|note| note.slug() == slug && Some(note.id()) != excluding)
    }
}

/// In-memory tables for users, notes, news and comments.
///
/// Identifiers come from one shared counter, so they increase in creation
/// order across every table.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds consistent tables.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user whose password can never match.
    pub fn seed_user(&self, username: Username) -> User {
        let user = User::new(UserId::random(), username);
        self.lock().users.push(StoredUser {
            user: user.clone(),
            password_hash: UNUSABLE_PASSWORD.to_owned(),
        });
        user
    }

    /// Number of stored notes.
    pub fn note_count(&self) -> usize {
        self.lock().notes.len()
    }

    /// Every note, in creation order.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.values().cloned().collect()
    }

    /// Number of stored comments.
    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    /// Every comment, in creation order.
    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.values().cloned().collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|stored| stored.user.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_str(),
            ));
        }
        tables.users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn list_for_author(&self, author: &UserId) -> Result<Vec<Note>, NoteRepositoryError> {
        Ok(self
            .lock()
            .notes
            .values()
            .filter(|note| note.author() == author)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(self
            .lock()
            .notes
            .values()
            .find(|note| note.slug() == slug)
            .cloned())
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        excluding: Option<NoteId>,
    ) -> Result<bool, NoteRepositoryError> {
        Ok(self.lock().slug_taken(slug, excluding))
    }

    async fn insert(&self, draft: &NoteDraft) -> Result<Note, NoteRepositoryError> {
        let mut tables = self.lock();
        if tables.slug_taken(&draft.slug, None) {
            return Err(NoteRepositoryError::duplicate_slug(draft.slug.as_str()));
        }
        let id = NoteId::new(tables.next_id());
        let note = Note::new(id, draft.clone());
        tables.notes.insert(id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, NoteRepositoryError> {
        let mut tables = self.lock();
        if !tables.notes.contains_key(&id) {
            return Err(NoteRepositoryError::missing(id.get()));
        }
        if tables.slug_taken(&draft.slug, Some(id)) {
            return Err(NoteRepositoryError::duplicate_slug(draft.slug.as_str()));
        }
        let note = Note::new(id, draft.clone());
        tables.notes.insert(id, note.clone());
        Ok(note)
    }

    async fn delete(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        self.lock()
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| NoteRepositoryError::missing(id.get()))
    }
}

#[async_trait]
impl NewsRepository for InMemoryStore {
    async fn list_latest(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<News>, NewsRepositoryError> {
        let mut items: Vec<News> = self.lock().news.values().cloned().collect();
        items.sort_by(|a, b| b.date().cmp(&a.date()).then(b.id().cmp(&a.id())));
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: NewsId) -> Result<Option<News>, NewsRepositoryError> {
        Ok(self.lock().news.get(&id).cloned())
    }

    async fn insert(&self, draft: &NewsDraft) -> Result<News, NewsRepositoryError> {
        let date = draft
            .date
            .ok_or_else(|| NewsRepositoryError::query("news date must be resolved before insert"))?;
        let mut tables = self.lock();
        let id = NewsId::new(tables.next_id());
        let news = News::new(id, draft.title.clone(), draft.text.clone(), date);
        tables.news.insert(id, news.clone());
        Ok(news)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_news(&self, news: NewsId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .values()
            .filter(|comment| comment.news() == news)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created(), comment.id()));
        Ok(comments)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(self.lock().comments.get(&id).cloned())
    }

    async fn insert(&self, draft: &CommentDraft) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.lock();
        let id = CommentId::new(tables.next_id());
        let comment = Comment::new(id, draft.clone());
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update_text(
        &self,
        id: CommentId,
        text: &CommentText,
    ) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.lock();
        let stored = tables
            .comments
            .remove(&id)
            .ok_or_else(|| CommentRepositoryError::missing(id.get()))?;
        let updated = stored.with_text(text.clone());
        tables.comments.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError> {
        self.lock()
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CommentRepositoryError::missing(id.get()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn draft(slug: &str, author: UserId) -> NoteDraft {
        NoteDraft {
            title: "Заголовок".to_owned(),
            text: "Текст".to_owned(),
            slug: Slug::new(slug).expect("valid slug"),
            author,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_slug_is_rejected_across_authors(store: InMemoryStore) {
        NoteRepository::insert(&store, &draft("shared", UserId::random()))
            .await
            .expect("first insert");

        let error = NoteRepository::insert(&store, &draft("shared", UserId::random()))
            .await
            .expect_err("slug is global");

        assert_eq!(error, NoteRepositoryError::duplicate_slug("shared"));
        assert_eq!(store.note_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_may_keep_its_own_slug(store: InMemoryStore) {
        let author = UserId::random();
        let note = NoteRepository::insert(&store, &draft("mine", author))
            .await
            .expect("insert");

        let updated = NoteRepository::update(&store, note.id(), &draft("mine", author))
            .await
            .expect("update keeps slug");

        assert_eq!(updated.id(), note.id());
    }

    #[rstest]
    #[tokio::test]
    async fn latest_news_is_newest_first_with_id_tiebreak(store: InMemoryStore) {
        for (title, day) in [("a", 1), ("b", 3), ("c", 3)] {
            NewsRepository::insert(
                &store,
                &NewsDraft {
                    title: title.to_owned(),
                    text: "Текст".to_owned(),
                    date: NaiveDate::from_ymd_opt(2026, 2, day),
                },
            )
            .await
            .expect("insert news");
        }

        let titles: Vec<String> = store
            .list_latest(0, 10)
            .await
            .expect("list")
            .iter()
            .map(|news| news.title().to_owned())
            .collect();

        assert_eq!(titles, ["c", "b", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn comments_are_listed_oldest_first(store: InMemoryStore) {
        let author = store.seed_user(Username::new("Автор комментария").expect("valid"));
        let base = Utc::now();
        for (offset, text) in [(2, "второй"), (1, "первый")] {
            CommentRepository::insert(
                &store,
                &CommentDraft {
                    news: NewsId::new(1),
                    author: *author.id(),
                    text: CommentText::new(text).expect("clean"),
                    created: base + chrono::Duration::minutes(offset),
                },
            )
            .await
            .expect("insert comment");
        }

        let texts: Vec<String> = store
            .list_for_news(NewsId::new(1))
            .await
            .expect("list")
            .iter()
            .map(|comment| comment.text().as_str().to_owned())
            .collect();

        assert_eq!(texts, ["первый", "второй"]);
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_users_are_found_by_name(store: InMemoryStore) {
        let username = Username::new("Username Username").expect("valid");
        let user = store.seed_user(username.clone());

        let stored = store
            .find_by_username(&username)
            .await
            .expect("lookup")
            .expect("user exists");

        assert_eq!(stored.user, user);
        assert_eq!(stored.password_hash, UNUSABLE_PASSWORD);
    }
}
