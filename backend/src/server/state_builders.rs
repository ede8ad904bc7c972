//! Assemble the HTTP state from repository adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use pagination::PageSize;

use crate::domain::ports::{CommentRepository, NewsRepository, NoteRepository, UserRepository};
use crate::domain::{AccountServiceImpl, NewsServiceImpl, NotesServiceImpl};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::Argon2PasswordHasher;
use crate::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselNewsRepository, DieselNoteRepository,
    DieselUserRepository,
};

/// Repository adapters behind the services.
pub struct Repositories<U: ?Sized, N: ?Sized, W: ?Sized, C: ?Sized> {
    /// Accounts.
    pub users: Arc<U>,
    /// Notes.
    pub notes: Arc<N>,
    /// News items.
    pub news: Arc<W>,
    /// Comments.
    pub comments: Arc<C>,
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    /// Every port served by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: Arc::clone(&store),
            notes: Arc::clone(&store),
            news: Arc::clone(&store),
            comments: store,
        }
    }
}

impl Repositories<DieselUserRepository, DieselNoteRepository, DieselNewsRepository, DieselCommentRepository> {
    /// PostgreSQL adapters sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            notes: Arc::new(DieselNoteRepository::new(pool.clone())),
            news: Arc::new(DieselNewsRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        }
    }
}

impl<U, N, W, C> Repositories<U, N, W, C>
where
    U: UserRepository + ?Sized + 'static,
    N: NoteRepository + ?Sized + 'static,
    W: NewsRepository + ?Sized + 'static,
    C: CommentRepository + ?Sized + 'static,
{
    /// Wrap the adapters in the domain services.
    pub fn into_http_state(self, news_per_page: PageSize) -> HttpState {
        HttpState::new(
            Arc::new(NotesServiceImpl::new(self.notes)),
            Arc::new(NewsServiceImpl::new(
                self.news,
                self.comments,
                Arc::new(DefaultClock),
            )),
            Arc::new(AccountServiceImpl::new(
                self.users,
                Arc::new(Argon2PasswordHasher::new()),
            )),
            news_per_page,
        )
    }
}

/// State backed by `pool`, or by a fresh in-memory store without one.
pub fn build_http_state(pool: Option<&DbPool>, news_per_page: PageSize) -> HttpState {
    match pool {
        Some(pool) => Repositories::postgres(pool).into_http_state(news_per_page),
        None => {
            Repositories::in_memory(Arc::new(InMemoryStore::new())).into_http_state(news_per_page)
        }
    }
}
