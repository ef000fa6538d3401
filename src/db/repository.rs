//! Item repository.
//!
//! Executes the CRUD operations against the `items` table. Every operation
//! provisions the schema first, runs a single parameterized statement bounded
//! by the query timeout, and releases its connection when the statement
//! completes. Writes use `RETURNING` so the affected row comes back in the
//! same round trip. The repository is the sole writer of item rows; nothing
//! here caches them.

use crate::db::pool::{DbPool, PoolManager};
use crate::db::schema::ensure_schema;
use crate::error::{ApiError, ApiResult};
use crate::models::Item;
use crate::validate::ItemDraft;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

const LIST_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM items ORDER BY id DESC";
const GET_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM items WHERE id = $1";
const INSERT_SQL: &str = "INSERT INTO items (name, description) VALUES ($1, $2) \
     RETURNING id, name, description, created_at, updated_at";
const UPDATE_RETURNING_SQL: &str = "UPDATE items SET name = $1, description = $2 WHERE id = $3 \
     RETURNING id, name, description, created_at, updated_at";
const UPDATE_SQL: &str = "UPDATE items SET name = $1, description = $2 WHERE id = $3";
const DELETE_SQL: &str = "DELETE FROM items WHERE id = $1";

pub struct ItemRepository {
    pools: Arc<PoolManager>,
    query_timeout: Duration,
}

impl ItemRepository {
    /// Create a repository over an injected pool manager.
    pub fn new(pools: Arc<PoolManager>, query_timeout: Duration) -> Self {
        Self {
            pools,
            query_timeout,
        }
    }

    /// All items, most recently created first. An empty table is an empty
    /// list, not an error.
    pub async fn list_all(&self) -> ApiResult<Vec<Item>> {
        let pool = self.prepare().await?;
        debug!("Listing items");
        self.timed("list items", async {
            match pool {
                DbPool::Postgres(p) => sqlx::query_as::<_, Item>(LIST_SQL).fetch_all(p).await,
                DbPool::Sqlite(p) => sqlx::query_as::<_, Item>(LIST_SQL).fetch_all(p).await,
            }
        })
        .await
    }

    /// The item with the given id, or [`ApiError::NotFound`].
    pub async fn get_by_id(&self, id: i64) -> ApiResult<Item> {
        let pool = self.prepare().await?;
        debug!(id, "Fetching item");
        let row = self
            .timed("get item", async {
                match pool {
                    DbPool::Postgres(p) => {
                        sqlx::query_as::<_, Item>(GET_SQL)
                            .bind(id)
                            .fetch_optional(p)
                            .await
                    }
                    DbPool::Sqlite(p) => {
                        sqlx::query_as::<_, Item>(GET_SQL)
                            .bind(id)
                            .fetch_optional(p)
                            .await
                    }
                }
            })
            .await?;
        row.ok_or_else(|| ApiError::not_found(id))
    }

    /// Insert a new item and return the persisted row, including the
    /// generated id and timestamps.
    pub async fn create(&self, draft: &ItemDraft) -> ApiResult<Item> {
        let pool = self.prepare().await?;
        let item = self
            .timed("create item", async {
                match pool {
                    DbPool::Postgres(p) => {
                        sqlx::query_as::<_, Item>(INSERT_SQL)
                            .bind(&draft.name)
                            .bind(&draft.description)
                            .fetch_one(p)
                            .await
                    }
                    DbPool::Sqlite(p) => {
                        sqlx::query_as::<_, Item>(INSERT_SQL)
                            .bind(&draft.name)
                            .bind(&draft.description)
                            .fetch_one(p)
                            .await
                    }
                }
            })
            .await?;
        info!(id = item.id, "Created item");
        Ok(item)
    }

    /// Replace `name`/`description` on an existing row and return the row
    /// with its trigger-refreshed `updated_at`, or [`ApiError::NotFound`].
    pub async fn update_by_id(&self, id: i64, draft: &ItemDraft) -> ApiResult<Item> {
        let pool = self.prepare().await?;
        let row = self
            .timed("update item", async {
                match pool {
                    DbPool::Postgres(p) => {
                        sqlx::query_as::<_, Item>(UPDATE_RETURNING_SQL)
                            .bind(&draft.name)
                            .bind(&draft.description)
                            .bind(id)
                            .fetch_optional(p)
                            .await
                    }
                    DbPool::Sqlite(p) => {
                        // SQLite's RETURNING reports the row before after-triggers
                        // run, so re-read to pick up the refreshed updated_at.
                        let result = sqlx::query(UPDATE_SQL)
                            .bind(&draft.name)
                            .bind(&draft.description)
                            .bind(id)
                            .execute(p)
                            .await?;
                        if result.rows_affected() == 0 {
                            Ok(None)
                        } else {
                            sqlx::query_as::<_, Item>(GET_SQL)
                                .bind(id)
                                .fetch_optional(p)
                                .await
                        }
                    }
                }
            })
            .await?;
        let item = row.ok_or_else(|| ApiError::not_found(id))?;
        info!(id, "Updated item");
        Ok(item)
    }

    /// Delete the row permanently, or [`ApiError::NotFound`] when no row
    /// matched. The id is never reassigned.
    pub async fn delete_by_id(&self, id: i64) -> ApiResult<()> {
        let pool = self.prepare().await?;
        let rows_affected = self
            .timed("delete item", async {
                match pool {
                    DbPool::Postgres(p) => sqlx::query(DELETE_SQL)
                        .bind(id)
                        .execute(p)
                        .await
                        .map(|r| r.rows_affected()),
                    DbPool::Sqlite(p) => sqlx::query(DELETE_SQL)
                        .bind(id)
                        .execute(p)
                        .await
                        .map(|r| r.rows_affected()),
                }
            })
            .await?;
        if rows_affected == 0 {
            return Err(ApiError::not_found(id));
        }
        info!(id, "Deleted item");
        Ok(())
    }

    /// Get the shared pool and make sure the schema exists.
    async fn prepare(&self) -> ApiResult<&DbPool> {
        let pool = self.pools.get().await?;
        ensure_schema(pool, self.query_timeout).await?;
        Ok(pool)
    }

    /// Bound a store operation by the configured query timeout.
    async fn timed<T, F>(&self, operation: &str, fut: F) -> ApiResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::timeout(operation, self.query_timeout.as_secs())),
        }
    }
}
