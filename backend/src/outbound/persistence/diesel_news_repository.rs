//! PostgreSQL-backed `NewsRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewsRepository, NewsRepositoryError};
use crate::domain::{News, NewsDraft, NewsId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNewsRow, NewsRow};
use super::pool::{DbPool, PoolError};
use super::schema::news;

/// Diesel-backed implementation of the [`NewsRepository`] port.
#[derive(Clone)]
pub struct DieselNewsRepository {
    pool: DbPool,
}

impl DieselNewsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NewsRepositoryError {
    map_basic_pool_error(error, NewsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NewsRepositoryError {
    map_basic_diesel_error(
        error,
        NewsRepositoryError::query,
        NewsRepositoryError::connection,
    )
}

fn row_to_news(row: NewsRow) -> News {
    News::new(NewsId::new(row.id), row.title, row.text, row.date)
}

fn to_sql_count(value: usize) -> Result<i64, NewsRepositoryError> {
    i64::try_from(value).map_err(|_| NewsRepositoryError::query("page bounds out of range"))
}

#[async_trait]
impl NewsRepository for DieselNewsRepository {
    async fn list_latest(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<News>, NewsRepositoryError> {
        let offset = to_sql_count(offset)?;
        let limit = to_sql_count(limit)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewsRow> = news::table
            .order((news::date.desc(), news::id.desc()))
            .offset(offset)
            .limit(limit)
            .select(NewsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_news).collect())
    }

    async fn find_by_id(&self, id: NewsId) -> Result<Option<News>, NewsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NewsRow> = news::table
            .find(id.get())
            .select(NewsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_news))
    }

    async fn insert(&self, draft: &NewsDraft) -> Result<News, NewsRepositoryError> {
        let date = draft
            .date
            .ok_or_else(|| NewsRepositoryError::query("news date must be resolved before insert"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: NewsRow = diesel::insert_into(news::table)
            .values(&NewNewsRow {
                title: &draft.title,
                text: &draft.text,
                date,
            })
            .returning(NewsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_news(row))
    }
}
