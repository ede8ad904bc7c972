//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so suites can swap in mocks or the in-memory store.

use std::sync::Arc;

use pagination::PageSize;

use crate::domain::ports::{AccountService, NewsService, NotesService};

/// Page size of the news home listing when none is configured.
pub const NEWS_COUNT_ON_HOME_PAGE: usize = 10;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Notes use-cases.
    pub notes: Arc<dyn NotesService>,
    /// News and comment use-cases.
    pub news: Arc<dyn NewsService>,
    /// Sign-up and login.
    pub accounts: Arc<dyn AccountService>,
    /// Items per page on the news home listing.
    pub news_per_page: PageSize,
}

impl HttpState {
    /// Bundle the ports with the given news page size.
    pub fn new(
        notes: Arc<dyn NotesService>,
        news: Arc<dyn NewsService>,
        accounts: Arc<dyn AccountService>,
        news_per_page: PageSize,
    ) -> Self {
        Self {
            notes,
            news,
            accounts,
            news_per_page,
        }
    }
}
